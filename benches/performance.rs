//! Performance benchmarks for the event queue.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fanout::EventQueue;

/// Benchmark push throughput with varying subscriber counts.
fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");

    for subscribers in [1, 4, 16, 64] {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &subscribers| {
                let queue = EventQueue::new();
                let cursors: Vec<_> = (0..subscribers).map(|_| queue.subscribe()).collect();

                b.iter(|| {
                    queue.push(black_box(1u64));
                    // Drain through every cursor so the buffer stays flat.
                    for cursor in &cursors {
                        black_box(queue.next(cursor));
                    }
                });
            },
        );
    }

    group.finish();
}

/// Benchmark bulk drains of varying sizes.
fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain");

    for batch in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("batch", batch), &batch, |b, &batch| {
            let queue = EventQueue::new();
            let cursor = queue.subscribe();

            b.iter(|| {
                for i in 0..batch {
                    queue.push(i);
                }
                for event in queue.read(&cursor) {
                    black_box(event);
                }
            });
        });
    }

    group.finish();
}

/// Benchmark compaction behind a lagging cursor.
fn bench_shrink_with_laggard(c: &mut Criterion) {
    let mut group = c.benchmark_group("shrink");

    for backlog in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("backlog", backlog),
            &backlog,
            |b, &backlog| {
                b.iter(|| {
                    let queue = EventQueue::new();
                    let laggard = queue.subscribe();
                    let active = queue.subscribe();

                    for i in 0..backlog {
                        queue.push(i);
                    }
                    for event in queue.read(&active) {
                        black_box(event);
                    }

                    // Dropping the laggard trims the whole backlog at once.
                    queue.unsubscribe(laggard);
                    black_box(queue.len())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_push, bench_drain, bench_shrink_with_laggard);
criterion_main!(benches);
