// Queue module exports

pub mod fifo;
pub mod store;

pub use fifo::{Queue, QueueStats};
pub use store::QueueStore;

/// Opaque message body. The broker never looks inside it, so any bytes
/// round-trip unchanged.
pub type Payload = bytes::Bytes;
