use crate::queue::Payload;

/// Append `payload` to `queue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCommand {
    pub queue: String,
    pub payload: Payload,
}

/// Take the head of `queue`, waiting up to `timeout_seconds`.
///
/// `0` means "use the broker default"; a missing timeout is normalized to
/// `0` before it gets here. Negative values are rejected by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopCommand {
    pub queue: String,
    pub timeout_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push(PushCommand),
    Pop(PopCommand),
}

impl Command {
    pub fn push(queue: impl Into<String>, payload: impl Into<Payload>) -> Self {
        Command::Push(PushCommand {
            queue: queue.into(),
            payload: payload.into(),
        })
    }

    pub fn pop(queue: impl Into<String>, timeout_seconds: i64) -> Self {
        Command::Pop(PopCommand {
            queue: queue.into(),
            timeout_seconds,
        })
    }

    pub fn queue(&self) -> &str {
        match self {
            Command::Push(cmd) => &cmd.queue,
            Command::Pop(cmd) => &cmd.queue,
        }
    }
}
