use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;

use super::Payload;

/// A single named FIFO queue.
///
/// Payloads that arrive while a consumer is parked are handed straight to
/// that consumer; everything else lands in an unbounded buffer. The buffer
/// and the waiter list share one lock, and `waiters` only holds live
/// entries while `buffer` is empty.
pub struct Queue {
    name: String,
    state: Mutex<State>,
    stats: QueueStats,
}

#[derive(Default)]
struct State {
    buffer: VecDeque<Payload>,
    waiters: VecDeque<oneshot::Sender<Payload>>,
}

impl State {
    /// Gives `payload` to the oldest waiter that is still listening.
    /// Returns the payload back when nobody took it.
    fn hand_off(&mut self, mut payload: Payload) -> Option<Payload> {
        while let Some(waiter) = self.waiters.pop_front() {
            match waiter.send(payload) {
                Ok(()) => return None,
                Err(rejected) => payload = rejected,
            }
        }
        Some(payload)
    }
}

pub struct QueueStats {
    pushed_total: AtomicU64,
    popped_total: AtomicU64,
    timed_out_total: AtomicU64,
}

impl QueueStats {
    pub fn new() -> Self {
        Self {
            pushed_total: AtomicU64::new(0),
            popped_total: AtomicU64::new(0),
            timed_out_total: AtomicU64::new(0),
        }
    }

    pub fn pushed_total(&self) -> u64 {
        self.pushed_total.load(Ordering::Relaxed)
    }

    pub fn popped_total(&self) -> u64 {
        self.popped_total.load(Ordering::Relaxed)
    }

    /// Pops that gave up without receiving anything.
    pub fn timed_out_total(&self) -> u64 {
        self.timed_out_total.load(Ordering::Relaxed)
    }
}

impl Default for QueueStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(State::default()),
            stats: QueueStats::new(),
        }
    }

    // Nothing inside the critical section can panic halfway through a
    // mutation, so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `payload`, or hands it to the longest-parked consumer.
    /// Never blocks on anything but the queue's own short critical section.
    pub fn push(&self, payload: impl Into<Payload>) {
        let mut state = self.lock();
        if let Some(payload) = state.hand_off(payload.into()) {
            state.buffer.push_back(payload);
        }
        self.stats.pushed_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Removes the head payload, parking for at most `timeout` when the
    /// queue is empty. A zero timeout makes a single attempt.
    ///
    /// On timeout the queue is left exactly as it was found.
    ///
    /// Dropping the returned future is also safe: a payload already handed
    /// to it is put back at the front of the buffer (or given to the next
    /// waiter). Order then holds only against what is still queued. If two
    /// waiters were handed p1 and p2 and the first is dropped after the
    /// second returned p2, p1 is delivered after p2.
    pub async fn pop(&self, timeout: Duration) -> Option<Payload> {
        // Measured from the call, not from lock acquisition.
        let deadline = Instant::now().checked_add(timeout);

        let rx = {
            let mut state = self.lock();
            if let Some(payload) = state.buffer.pop_front() {
                drop(state);
                self.stats.popped_total.fetch_add(1, Ordering::Relaxed);
                return Some(payload);
            }
            if timeout.is_zero() {
                drop(state);
                self.stats.timed_out_total.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            rx
        };

        let mut waiter = Waiter::new(self, rx);
        let received = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, &mut waiter.rx)
                .await
                .ok(),
            // Deadline beyond what the clock can represent: wait for a push.
            None => Some((&mut waiter.rx).await),
        };

        let payload = match received {
            Some(Ok(payload)) => Some(payload),
            // The sender is only ever dropped after a failed send, which
            // means our receiver was already closed. Treat as a timeout.
            Some(Err(_)) => None,
            None => waiter.close(),
        };

        match payload {
            Some(payload) => {
                waiter.delivered = true;
                self.stats.popped_total.fetch_add(1, Ordering::Relaxed);
                Some(payload)
            }
            None => {
                self.stats.timed_out_total.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Puts back a payload that was handed to a consumer which went away
    /// before reading it. It goes to the next waiter or the front of the
    /// buffer, ahead of anything pushed after it.
    fn restore(&self, payload: Payload) {
        let mut state = self.lock();
        if let Some(payload) = state.hand_off(payload) {
            state.buffer.push_front(payload);
        }
    }

    fn prune_waiters(&self) {
        self.lock().waiters.retain(|tx| !tx.is_closed());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of buffered payloads.
    pub fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of consumers currently parked on this queue.
    pub fn waiting(&self) -> usize {
        self.lock().waiters.iter().filter(|tx| !tx.is_closed()).count()
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

/// A parked pop. Dropping it before delivery (timeout or cancellation of
/// the pop future) withdraws from the waiter list and returns any payload
/// that was handed over in the meantime.
struct Waiter<'a> {
    queue: &'a Queue,
    rx: oneshot::Receiver<Payload>,
    delivered: bool,
}

impl<'a> Waiter<'a> {
    fn new(queue: &'a Queue, rx: oneshot::Receiver<Payload>) -> Self {
        Self {
            queue,
            rx,
            delivered: false,
        }
    }

    /// Stops accepting hand-offs. A payload sent before the close is
    /// still returned.
    fn close(&mut self) -> Option<Payload> {
        self.rx.close();
        self.rx.try_recv().ok()
    }
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        if self.delivered {
            return;
        }
        if let Some(payload) = self.close() {
            self.queue.restore(payload);
        }
        self.queue.prune_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn cancelled_pop_withdraws_from_waiters() {
        let queue = Arc::new(Queue::new("cancel"));

        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop(Duration::from_secs(30)).await })
        };
        while queue.waiting() == 0 {
            tokio::task::yield_now().await;
        }

        waiter.abort();
        let _ = waiter.await;

        queue.push("kept");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.waiting(), 0);
        assert_eq!(queue.pop(Duration::ZERO).await.as_deref(), Some(&b"kept"[..]));
    }

    #[tokio::test]
    async fn restore_goes_to_front_of_buffer() {
        let queue = Queue::new("restore");
        queue.push("second");
        queue.restore(Payload::from("first"));

        assert_eq!(queue.pop(Duration::ZERO).await.as_deref(), Some(&b"first"[..]));
        assert_eq!(queue.pop(Duration::ZERO).await.as_deref(), Some(&b"second"[..]));
    }

    #[tokio::test]
    async fn cancelled_waiter_payload_follows_later_hand_off() {
        let queue = Arc::new(Queue::new("inversion"));

        let first = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop(Duration::from_secs(30)).await })
        };
        while queue.waiting() < 1 {
            tokio::task::yield_now().await;
        }
        let second = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop(Duration::from_secs(30)).await })
        };
        while queue.waiting() < 2 {
            tokio::task::yield_now().await;
        }

        // Both hand-offs happen before either consumer runs again.
        queue.push("p1");
        queue.push("p2");
        first.abort();
        assert!(first.await.is_err());

        assert_eq!(second.await.unwrap().as_deref(), Some(&b"p2"[..]));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(Duration::ZERO).await.as_deref(), Some(&b"p1"[..]));
    }

    #[tokio::test]
    async fn timed_out_waiter_is_pruned() {
        let queue = Queue::new("prune");

        assert!(queue.pop(Duration::from_millis(20)).await.is_none());

        assert_eq!(queue.lock().waiters.len(), 0);
        assert_eq!(queue.stats().timed_out_total(), 1);
    }
}
