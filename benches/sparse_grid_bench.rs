//! Benchmark for SparseGrid.
//!
//! Measures brush-stroke style writes, viewport reads and erasure on a
//! layer compared with a flat `BTreeMap<(x, y), Color>`.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sparse_raster::grid::{BoundingBox, Color, Point, SparseGrid};
use std::collections::BTreeMap;

fn filled_layer(side: i32) -> SparseGrid {
    (0..side)
        .flat_map(|x| (0..side).map(move |y| (Point::new(x, y), Color::BLACK)))
        .collect()
}

// =============================================================================
// upsert Benchmark
// =============================================================================

fn benchmark_upsert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("grid_upsert");

    for side in [16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("SparseGrid", side), &side, |bencher, &side| {
            bencher.iter(|| {
                let mut layer = SparseGrid::new();
                for x in 0..side {
                    for y in 0..side {
                        layer.upsert(black_box(Point::new(x, y)), Color::RED);
                    }
                }
                black_box(layer)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", side), &side, |bencher, &side| {
            bencher.iter(|| {
                let mut layer = BTreeMap::new();
                for x in 0..side {
                    for y in 0..side {
                        layer.insert(black_box((x, y)), Color::RED);
                    }
                }
                black_box(layer)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Viewport Benchmark
// =============================================================================

fn benchmark_viewport(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("grid_viewport");
    let layer = filled_layer(512);

    for view in [16, 64, 256] {
        let area = BoundingBox::new(128, 128, view, view);
        group.bench_with_input(BenchmarkId::new("get_box", view), &area, |bencher, &area| {
            bencher.iter(|| black_box(layer.get_box(black_box(area))));
        });
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("grid_remove");

    for side in [16, 64] {
        let layer = filled_layer(side);
        group.bench_with_input(BenchmarkId::new("SparseGrid", side), &side, |bencher, &side| {
            bencher.iter_batched(
                || layer.clone(),
                |mut layer| {
                    for x in 0..side {
                        for y in 0..side {
                            layer.remove(black_box(Point::new(x, y)));
                        }
                    }
                    black_box(layer)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_upsert, benchmark_viewport, benchmark_remove);

criterion_main!(benches);
