//! Benchmarks for signal submission through a running coordinator.

use ackwatch_watchdog::prelude::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

fn bench_arrival_then_ack(c: &mut Criterion) {
    let runtime = runtime();
    let mut coordinator =
        WatchdogCoordinator::new(TimeoutPolicy::default(), |_: &TimeoutReport| {}).unwrap();
    let handle = runtime.block_on(async { coordinator.start() }).unwrap();
    let next = AtomicU64::new(0);

    c.bench_function("arrival_then_ack", |b| {
        b.to_async(&runtime).iter(|| async {
            let token = format!("tok-{}", next.fetch_add(1, Ordering::Relaxed));
            handle.arrive(token.clone()).await.unwrap();
            black_box(handle.submit_ack(token).await.unwrap());
        });
    });

    runtime
        .block_on(coordinator.stop(ShutdownMode::Discard))
        .unwrap();
}

fn bench_burst_by_capacity(c: &mut Criterion) {
    let runtime = runtime();
    let mut group = c.benchmark_group("burst_by_capacity");

    for capacity in [16usize, 128, 1024] {
        let policy = TimeoutPolicy::builder()
            .channel_capacity(capacity)
            .build()
            .unwrap();
        let mut coordinator = WatchdogCoordinator::new(policy, |_: &TimeoutReport| {}).unwrap();
        let handle = runtime.block_on(async { coordinator.start() }).unwrap();
        let next = AtomicU64::new(0);

        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, _| {
            b.to_async(&runtime).iter(|| async {
                for _ in 0..256 {
                    let token = format!("tok-{}", next.fetch_add(1, Ordering::Relaxed));
                    handle.arrive(token.clone()).await.unwrap();
                    handle.submit_ack(token).await.unwrap();
                }
            });
        });

        runtime
            .block_on(coordinator.stop(ShutdownMode::Discard))
            .unwrap();
    }

    group.finish();
}

criterion_group!(benches, bench_arrival_then_ack, bench_burst_by_capacity);
criterion_main!(benches);
