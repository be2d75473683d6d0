use std::sync::Arc;
use std::time::{Duration, Instant};
use qbroker::{Payload, Queue};

#[tokio::test]
async fn test_queue_creation() {
    let queue = Queue::new("orders");

    assert_eq!(queue.name(), "orders");
    assert_eq!(queue.len(), 0);
    assert!(queue.is_empty());
    assert_eq!(queue.waiting(), 0);
}

#[tokio::test]
async fn test_push_then_pop_returns_same_payload() {
    let queue = Queue::new("orders");

    queue.push("hello".to_string());
    assert_eq!(queue.len(), 1);

    let payload = queue.pop(Duration::from_secs(1)).await;

    assert_eq!(payload.as_deref(), Some(&b"hello"[..]));
    assert!(queue.is_empty());
    assert_eq!(queue.stats().pushed_total(), 1);
    assert_eq!(queue.stats().popped_total(), 1);
}

#[tokio::test]
async fn test_pop_preserves_fifo_order() {
    let queue = Queue::new("orders");

    for i in 0..10 {
        queue.push(format!("msg-{i}"));
    }

    for i in 0..10 {
        let payload = queue.pop(Duration::ZERO).await;
        assert_eq!(payload, Some(Payload::from(format!("msg-{i}"))));
    }
}

#[tokio::test]
async fn test_zero_timeout_on_empty_queue_returns_immediately() {
    let queue = Queue::new("orders");

    let start = Instant::now();
    let result = queue.pop(Duration::ZERO).await;

    assert!(result.is_none());
    assert!(start.elapsed() < Duration::from_millis(20));
    assert_eq!(queue.waiting(), 0);
}

#[tokio::test]
async fn test_pop_timeout_expires() {
    let queue = Queue::new("orders");

    let start = Instant::now();
    let result = queue.pop(Duration::from_millis(100)).await;
    let elapsed = start.elapsed();

    assert!(result.is_none());
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(200));
    assert_eq!(queue.stats().timed_out_total(), 1);
}

#[tokio::test]
async fn test_timed_out_pop_leaves_queue_unchanged() {
    let queue = Arc::new(Queue::new("orders"));

    let waiter = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.pop(Duration::from_millis(50)).await })
    };
    assert!(waiter.await.unwrap().is_none());

    assert_eq!(queue.waiting(), 0);
    queue.push("later".to_string());
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.pop(Duration::ZERO).await.as_deref(), Some(&b"later"[..]));
}

#[tokio::test]
async fn test_waiting_pop_is_woken_by_push() {
    let queue = Arc::new(Queue::new("orders"));

    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move {
            let start = Instant::now();
            let result = queue.pop(Duration::from_secs(2)).await;
            (result, start.elapsed())
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    queue.push("x".to_string());

    let (result, elapsed) = consumer.await.unwrap();

    assert_eq!(result.as_deref(), Some(&b"x"[..]));
    assert!(elapsed >= Duration::from_millis(80));
    assert!(elapsed < Duration::from_millis(500));
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_waiters_are_served_in_arrival_order() {
    let queue = Arc::new(Queue::new("orders"));
    let mut consumers = vec![];

    for i in 0..5 {
        let queue_clone = queue.clone();
        consumers.push(tokio::spawn(async move {
            queue_clone.pop(Duration::from_secs(2)).await
        }));
        // Let consumer `i` park before the next one arrives.
        while queue.waiting() < i + 1 {
            tokio::task::yield_now().await;
        }
    }

    for i in 0..5 {
        queue.push(format!("msg-{i}"));
    }

    for (i, consumer) in consumers.into_iter().enumerate() {
        assert_eq!(consumer.await.unwrap(), Some(Payload::from(format!("msg-{i}"))));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pops_deliver_each_payload_once() {
    let queue = Arc::new(Queue::new("orders"));
    let mut consumers = vec![];

    for _ in 0..20 {
        let queue_clone = queue.clone();
        consumers.push(tokio::spawn(async move {
            let mut got = vec![];
            while let Some(payload) = queue_clone.pop(Duration::from_millis(200)).await {
                got.push(payload);
            }
            got
        }));
    }

    for i in 0..500 {
        queue.push(format!("{i}"));
    }

    let mut delivered = vec![];
    for consumer in consumers {
        delivered.extend(consumer.await.unwrap());
    }
    delivered.sort_by_key(|p| std::str::from_utf8(p).unwrap().parse::<u32>().unwrap());

    let expected: Vec<Payload> = (0..500).map(|i| Payload::from(i.to_string())).collect();
    assert_eq!(delivered, expected);
    assert_eq!(queue.stats().popped_total(), 500);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_buffer_grows_without_backpressure() {
    let queue = Queue::new("burst");

    for i in 0..100_000 {
        queue.push(i.to_string());
    }

    assert_eq!(queue.len(), 100_000);
    assert_eq!(queue.pop(Duration::ZERO).await.as_deref(), Some(&b"0"[..]));
}

#[tokio::test]
async fn test_huge_timeout_does_not_overflow() {
    let queue = Arc::new(Queue::new("forever"));

    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.pop(Duration::from_secs(u64::MAX)).await })
    };
    while queue.waiting() == 0 {
        tokio::task::yield_now().await;
    }
    queue.push("eventually".to_string());

    assert_eq!(consumer.await.unwrap().as_deref(), Some(&b"eventually"[..]));
}
