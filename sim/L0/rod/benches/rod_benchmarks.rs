//! Benchmarks for the internal force pipeline.
//!
//! Run with: cargo bench -p sim-rod

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::{Point3, Vector3};
use sim_rod::{CosseratRod, RodConfig, compute_strains};

fn bent_rod(n: usize) -> CosseratRod {
    let mut rod = CosseratRod::straight(
        "bench",
        Point3::origin(),
        Point3::new(0.0, 0.0, 1.0),
        Vector3::x(),
        n,
        &RodConfig::soft_filament(0.01),
    )
    .unwrap();
    for (i, p) in rod.state_mut().positions.iter_mut().enumerate() {
        p.x += 0.01 * (i as f64 * 0.3).sin();
    }
    rod
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("internal_forces");

    for n in [10, 50, 100, 500] {
        let mut rod = bent_rod(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(BenchmarkId::new("full_pipeline", n), |b| {
            b.iter(|| {
                rod.compute_internal_forces_and_torques().unwrap();
                black_box(rod.internal_forces()[0])
            });
        });

        let rod = bent_rod(n);
        group.bench_function(BenchmarkId::new("strains_only", n), |b| {
            b.iter(|| black_box(compute_strains(rod.state(), rod.properties()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
