use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use super::fifo::Queue;
use super::Payload;

/// Process-wide mapping from queue name to [`Queue`].
///
/// The map is sharded, so operations on different names never contend on
/// the same lock, and no map lock is held while a pop is parked.
pub struct QueueStore {
    queues: DashMap<String, Arc<Queue>>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self {
            queues: DashMap::new(),
        }
    }

    /// Returns the queue for `name`, creating it if this is the first time
    /// the name is seen. Concurrent first-time callers all get the same
    /// instance.
    pub fn get_or_create(&self, name: &str) -> Arc<Queue> {
        if let Some(queue) = self.queues.get(name) {
            return queue.clone();
        }

        self.queues
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(queue = name, "created queue");
                Arc::new(Queue::new(name))
            })
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Queue>> {
        self.queues.get(name).map(|queue| queue.clone())
    }

    /// Appends `payload` to `name`, waking the oldest parked pop if any.
    pub fn push(&self, name: &str, payload: impl Into<Payload>) {
        self.get_or_create(name).push(payload.into());
    }

    /// Takes the head of `name`, waiting up to `timeout` for one to arrive.
    ///
    /// A name that has never been pushed to is created and waited on like
    /// any other empty queue, so a pop may be issued before its push.
    pub async fn pop(&self, name: &str, timeout: Duration) -> Option<Payload> {
        let queue = self.get_or_create(name);
        queue.pop(timeout).await
    }

    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    pub fn queue_names(&self) -> Vec<String> {
        self.queues.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new()
    }
}
