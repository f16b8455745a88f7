//! Benchmark for OrderedMap vs standard BTreeMap.
//!
//! Compares the AVL-backed OrderedMap against Rust's standard BTreeMap
//! for point writes, point reads and inclusive range reads, and measures
//! mutable range reads against shared ones.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sparse_raster::map::OrderedMap;
use std::collections::BTreeMap;

// =============================================================================
// upsert Benchmark
// =============================================================================

fn benchmark_upsert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("upsert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("OrderedMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = OrderedMap::new();
                    for index in 0..size {
                        map.upsert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for index in 0..size {
                        map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let ordered_map: OrderedMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("OrderedMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = ordered_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = standard_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in [100, 1000, 10000] {
        let ordered_map: OrderedMap<i32, i32> = (0..size).map(|index| (index, index)).collect();

        group.bench_with_input(
            BenchmarkId::new("OrderedMap", size),
            &size,
            |bencher, &size| {
                bencher.iter_batched(
                    || ordered_map.clone(),
                    |mut map| {
                        for key in (0..size).step_by(2) {
                            map.remove(&black_box(key));
                        }
                        black_box(map)
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// =============================================================================
// get_range Benchmark
// =============================================================================

fn benchmark_get_range(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get_range");

    let size = 10000;
    let ordered_map: OrderedMap<i32, i32> = (0..size).map(|index| (index, index)).collect();
    let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index)).collect();

    for width in [10, 100, 1000] {
        let lower = size / 2;
        let upper = lower + width - 1;

        group.bench_with_input(
            BenchmarkId::new("OrderedMap", width),
            &width,
            |bencher, _| {
                bencher.iter(|| black_box(ordered_map.get_range(&black_box(lower), &black_box(upper))));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", width),
            &width,
            |bencher, _| {
                bencher.iter(|| {
                    black_box(
                        standard_map
                            .range(black_box(lower)..=black_box(upper))
                            .collect::<Vec<_>>(),
                    )
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get_range_mut Benchmark
// =============================================================================

fn benchmark_get_range_mut(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get_range_mut");

    for size in [1000, 100_000, 1_000_000] {
        // The largest key is allocated last, so it sits in the final arena slot.
        let mut ordered_map: OrderedMap<i32, i32> = (0..size).map(|index| (index, index)).collect();
        let last = size - 1;

        group.bench_with_input(
            BenchmarkId::new("get_range", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(ordered_map.get_range(&black_box(last), &black_box(last)).len()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("get_range_mut", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    for (_, value) in ordered_map.get_range_mut(&black_box(last), &black_box(last)) {
                        *value = value.wrapping_add(1);
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_upsert,
    benchmark_get,
    benchmark_remove,
    benchmark_get_range,
    benchmark_get_range_mut
);

criterion_main!(benches);
