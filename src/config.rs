use std::time::Duration;

use clap::Parser;

use crate::resp::RespConfig;

/// Startup configuration. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "qbroker")]
#[command(about = "Ephemeral in-memory FIFO queue broker", long_about = None)]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "QBROKER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port for the RESP listener
    #[arg(short, long, env = "QBROKER_PORT", default_value_t = 6380)]
    pub port: u16,

    /// Seconds a GET waits when the request gives no timeout (or 0)
    #[arg(
        long,
        env = "QBROKER_DEFAULT_TIMEOUT",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub default_timeout: u64,
}

impl Config {
    pub fn resp(&self) -> RespConfig {
        RespConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout)
    }
}
