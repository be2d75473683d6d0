use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use qbroker::{BrokerService, Config, QueueStore, RespServer};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    let config = Config::parse();

    let store = Arc::new(QueueStore::new());
    let broker = BrokerService::with_default_timeout(store, config.default_timeout());

    let resp = config.resp();
    let server = RespServer::bind(&resp, broker)
        .await
        .with_context(|| format!("failed to bind {}", resp.addr()))?;

    tracing::info!(default_timeout = ?config.default_timeout(), "qbroker starting");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
