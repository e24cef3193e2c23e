//! Benchmarks for the interval index.
//!
//! Run with: cargo bench --package alopex-timeline
//!
//! ## Benchmark Categories
//!
//! - **Build**: Partition tree construction
//! - **Query**: Tree query vs. linear scan
//! - **Mutation**: Add and bulk prune

use alopex_timeline::{Busytime, IndexConfig, IntervalIndex, Timespan, Timestamp};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const MINUTE_MS: Timestamp = 60 * 1000;

/// Generate calendar-like busytimes: back-to-back meetings of varying length.
fn generate_busytimes(count: usize) -> Vec<Busytime> {
    (0..count as Timestamp)
        .map(|i| {
            let start = i * 20 * MINUTE_MS;
            let length = (15 + (i * 7) % 90) * MINUTE_MS;
            Busytime::new(
                format!("bt-{i}"),
                format!("event-{}", i % 50),
                if i % 2 == 0 { "work" } else { "home" },
                start,
                start + length,
            )
        })
        .collect()
}

fn load(count: usize) -> IntervalIndex<Busytime> {
    IntervalIndex::from_intervals(IndexConfig::default(), generate_busytimes(count))
        .expect("generated busytimes are well formed")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for count in [1_000, 10_000, 100_000] {
        let items = generate_busytimes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &items, |b, items| {
            b.iter_with_setup(
                || IntervalIndex::from_intervals(IndexConfig::default(), items.clone()).unwrap(),
                |mut index| {
                    black_box(index.build().generation());
                },
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_one_hour");
    for count in [1_000, 10_000, 100_000] {
        let mut index = load(count);
        index.build();
        let mid = (count as Timestamp / 2) * 20 * MINUTE_MS;
        let span = Timespan::new(mid, mid + 60 * MINUTE_MS);

        group.bench_with_input(BenchmarkId::new("tree", count), &span, |b, span| {
            b.iter(|| black_box(index.query_built(*span).unwrap().len()))
        });
        group.bench_with_input(BenchmarkId::new("linear", count), &span, |b, span| {
            b.iter(|| {
                black_box(
                    index
                        .iter()
                        .filter(|item| span.overlaps_interval(*item))
                        .count(),
                )
            })
        });
    }
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let items = generate_busytimes(10_000);

    c.bench_function("add_10k_shuffled", |b| {
        b.iter(|| {
            let mut index = IntervalIndex::new();
            // stride through the list so inserts land all over the index
            for offset in 0..7 {
                for item in items.iter().skip(offset).step_by(7) {
                    index.add(item.clone()).unwrap();
                }
            }
            black_box(index.len())
        })
    });
}

fn bench_prune(c: &mut Criterion) {
    let count = 10_000;
    let cutoff = (count as Timestamp / 2) * 20 * MINUTE_MS;

    c.bench_function("remove_past_intervals_10k", |b| {
        b.iter_with_setup(
            || load(count),
            |mut index| black_box(index.remove_past_intervals(cutoff)),
        )
    });

    c.bench_function("remove_future_intervals_10k", |b| {
        b.iter_with_setup(
            || load(count),
            |mut index| black_box(index.remove_future_intervals(cutoff)),
        )
    });
}

criterion_group!(benches, bench_build, bench_query, bench_add, bench_prune);
criterion_main!(benches);
