use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use qbroker::{Queue, QueueStore};

/// Benchmark: Single-threaded pushes into a growing buffer
fn bench_push_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_single_thread");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("1000_pushes", |b| {
        b.iter(|| {
            let queue = Queue::new("bench");
            for _ in 0..1000 {
                queue.push(black_box("payload".to_string()));
            }
        });
    });
    group.finish();
}

/// Benchmark: Push then immediate pop
fn bench_roundtrip_latency(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("roundtrip_latency");

    group.bench_function("push_then_pop", |b| {
        let store = QueueStore::new();
        b.iter(|| {
            rt.block_on(async {
                store.push("bench", black_box("payload"));
                let _ = black_box(store.pop("bench", Duration::ZERO).await);
            });
        });
    });
    group.finish();
}

/// Benchmark: Parked consumers woken by a producer (hand-off path)
fn bench_parked_handoff(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("parked_handoff");

    for num_consumers in [1usize, 4, 16].iter() {
        group.throughput(Throughput::Elements(*num_consumers as u64 * 100));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_consumers),
            num_consumers,
            |b, &num_consumers| {
                b.iter(|| {
                    rt.block_on(async {
                        let store = Arc::new(QueueStore::new());

                        let mut handles = vec![];
                        for _ in 0..num_consumers {
                            let store = store.clone();
                            handles.push(tokio::spawn(async move {
                                for _ in 0..100 {
                                    let _ = black_box(
                                        store.pop("bench", Duration::from_secs(5)).await,
                                    );
                                }
                            }));
                        }

                        for _ in 0..(num_consumers * 100) {
                            store.push("bench", "payload");
                            tokio::task::yield_now().await;
                        }

                        for handle in handles {
                            handle.await.unwrap();
                        }
                    });
                });
            },
        );
    }
    group.finish();
}

/// Benchmark: Producers spread over independent queue names
fn bench_independent_queues(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("independent_queues");

    for num_queues in [2usize, 8, 32].iter() {
        group.throughput(Throughput::Elements(*num_queues as u64 * 1000));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_queues),
            num_queues,
            |b, &num_queues| {
                b.iter(|| {
                    rt.block_on(async {
                        let store = Arc::new(QueueStore::new());

                        let mut handles = vec![];
                        for q in 0..num_queues {
                            let store = store.clone();
                            handles.push(tokio::spawn(async move {
                                let name = format!("queue-{q}");
                                for _ in 0..1000 {
                                    store.push(&name, black_box("payload"));
                                }
                            }));
                        }

                        for handle in handles {
                            handle.await.unwrap();
                        }
                    });
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_push_single_thread,
    bench_roundtrip_latency,
    bench_parked_handoff,
    bench_independent_queues,
);

criterion_main!(benches);
