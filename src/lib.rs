// qbroker - Ephemeral in-memory FIFO queue broker
//
// The core is `queue::QueueStore` (push never blocks, pop waits up to a
// timeout) and `broker::BrokerService`, which maps commands to results.
// `resp` is the TCP transport; the binary entry point is in src/main.rs.

pub mod broker;
pub mod config;
pub mod error;
pub mod queue;
pub mod resp;

pub use broker::{BrokerResult, BrokerService, Command, PopCommand, PushCommand};
pub use config::Config;
pub use error::ParseError;
pub use queue::{Payload, Queue, QueueStats, QueueStore};
pub use resp::{RespConfig, RespServer};
