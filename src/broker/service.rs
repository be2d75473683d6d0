use std::sync::Arc;
use std::time::Duration;

use super::command::{Command, PopCommand, PushCommand};
use crate::error::ParseError;
use crate::queue::{Payload, QueueStore};

/// Pop timeout used when a request asks for `0` seconds.
pub const DEFAULT_POP_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one command, mapped to a reply by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerResult {
    Ack,
    Ok(Payload),
    NotFound,
    BadRequest(String),
    InternalError(String),
}

impl From<ParseError> for BrokerResult {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidTimeout(_) => BrokerResult::InternalError(err.to_string()),
            _ => BrokerResult::BadRequest(err.to_string()),
        }
    }
}

/// Runs parsed commands against a shared [`QueueStore`].
#[derive(Clone)]
pub struct BrokerService {
    store: Arc<QueueStore>,
    default_timeout: Duration,
}

impl BrokerService {
    pub fn new(store: Arc<QueueStore>) -> Self {
        Self::with_default_timeout(store, DEFAULT_POP_TIMEOUT)
    }

    pub fn with_default_timeout(store: Arc<QueueStore>, default_timeout: Duration) -> Self {
        Self {
            store,
            default_timeout,
        }
    }

    pub fn store(&self) -> &Arc<QueueStore> {
        &self.store
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    pub async fn execute(&self, command: Command) -> BrokerResult {
        match command {
            Command::Push(cmd) => self.push(cmd),
            Command::Pop(cmd) => self.pop(cmd).await,
        }
    }

    fn push(&self, cmd: PushCommand) -> BrokerResult {
        if cmd.queue.is_empty() {
            return BrokerResult::BadRequest("queue name is empty".to_string());
        }
        if cmd.payload.is_empty() {
            return BrokerResult::BadRequest("payload is empty".to_string());
        }

        tracing::debug!(queue = %cmd.queue, bytes = cmd.payload.len(), "push");
        self.store.push(&cmd.queue, cmd.payload);
        BrokerResult::Ack
    }

    async fn pop(&self, cmd: PopCommand) -> BrokerResult {
        if cmd.queue.is_empty() {
            return BrokerResult::BadRequest("queue name is empty".to_string());
        }
        let timeout = match self.resolve_timeout(cmd.timeout_seconds) {
            Ok(timeout) => timeout,
            Err(result) => return result,
        };

        tracing::debug!(queue = %cmd.queue, ?timeout, "pop");
        match self.store.pop(&cmd.queue, timeout).await {
            Some(payload) => BrokerResult::Ok(payload),
            None => {
                tracing::debug!(queue = %cmd.queue, ?timeout, "pop timed out");
                BrokerResult::NotFound
            }
        }
    }

    fn resolve_timeout(&self, seconds: i64) -> Result<Duration, BrokerResult> {
        match seconds {
            0 => Ok(self.default_timeout),
            n if n < 0 => Err(BrokerResult::InternalError(format!(
                "timeout must be non-negative, got {n}"
            ))),
            n => Ok(Duration::from_secs(n.unsigned_abs())),
        }
    }
}
