//! Replay benchmarks for epubsub.
//!
//! These measure the cost of joining a namespace with existing history.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use epubsub_bench::{populated, Payload};
use epubsub_core::{Callback, ObserverOptions, Registry};

/// Benchmark full-history replay for growing logs.
fn bench_previous_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_previous_events");

    for size in [10, 100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let registry = Registry::new();
            let pubsub = populated(&registry, "history", 0, size);
            let callback = Callback::<Payload>::new(|event| {
                black_box(event);
            });
            let options = ObserverOptions::new().once().collect_previous_events();

            // `once` retires the observer after replay, so the list stays empty
            b.iter(|| pubsub.subscribe(&callback, options));
        });
    }

    group.finish();
}

/// Benchmark last-event replay, which should not depend on log length.
fn bench_last_event(c: &mut Criterion) {
    let registry = Registry::new();
    let pubsub = populated(&registry, "last", 0, 10000);
    let callback = Callback::<Payload>::new(|event| {
        black_box(event);
    });
    let options = ObserverOptions::new().once().collect_last_event();

    c.bench_function("collect_last_event_10000", |b| {
        b.iter(|| pubsub.subscribe(&callback, options));
    });
}

criterion_group!(benches, bench_previous_events, bench_last_event);
criterion_main!(benches);
