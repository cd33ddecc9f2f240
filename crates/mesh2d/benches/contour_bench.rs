//! Criterion benchmarks for contour resolution on random scribbles.
//! Focus sizes: n in {8, 32, 64}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use mesh2d::prelude::*;

fn bench_contour(c: &mut Criterion) {
    let mut group = c.benchmark_group("contour");
    for &n in &[8usize, 32, 64] {
        group.bench_with_input(BenchmarkId::new("resolve_scribble", n), &n, |b, &n| {
            b.iter_batched(
                || draw_scribble(n, 1.0, ReplayToken { seed: 7, index: n as u64 }),
                |pts| {
                    let _poly = resolve_contour(&pts, &GeomCfg::default()).unwrap();
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("thin_then_resolve", n), &n, |b, &n| {
            b.iter_batched(
                || draw_scribble(n, 1.0, ReplayToken { seed: 8, index: n as u64 }),
                |pts| {
                    let pts = thin(&pts, 0.05);
                    let _ = resolve_contour(&pts, &GeomCfg::default());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_contour);
criterion_main!(benches);
