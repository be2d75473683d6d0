// Broker module exports

pub mod command;
pub mod service;

pub use command::{Command, PopCommand, PushCommand};
pub use service::{BrokerResult, BrokerService, DEFAULT_POP_TIMEOUT};
