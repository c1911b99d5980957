//! Benchmarks for rod contact.
//!
//! Run with: cargo bench -p sim-contact

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::{Point3, Vector3};
use sim_contact::{
    AnisotropicFrictionPlane, DirectionalFriction, Plane, RodRodContact, RodSelfContact,
    closest_points,
};
use sim_rod::{CosseratRod, RodConfig};

fn rod_at(z: f64, n: usize) -> CosseratRod {
    CosseratRod::straight(
        "bench",
        Point3::new(0.0, 0.0, z),
        Point3::new(1.0, 0.0, z),
        Vector3::z(),
        n,
        &RodConfig::soft_filament(0.01),
    )
    .unwrap()
}

fn bench_segments(c: &mut Criterion) {
    let x1 = Vector3::new(0.0, 0.0, 0.0);
    let e1 = Vector3::new(1.0, 0.2, 0.0);
    let x2 = Vector3::new(0.3, -0.5, 0.4);
    let e2 = Vector3::new(0.1, 1.0, -0.2);

    c.bench_function("closest_points", |b| {
        b.iter(|| black_box(closest_points(&x1, &e1, &x2, &e2)));
    });
}

fn bench_rod_contact(c: &mut Criterion) {
    let mut group = c.benchmark_group("rod_contact");

    for n in [10, 50, 100] {
        group.throughput(Throughput::Elements((n * n) as u64));

        let mut one = rod_at(0.0, n);
        let mut two = rod_at(0.015, n);
        let law = RodRodContact::new(1e4, 10.0);
        group.bench_function(BenchmarkId::new("rod_rod", n), |b| {
            b.iter(|| {
                law.apply(&mut one, &mut two);
                black_box(two.external_forces()[0])
            });
        });

        let mut rod = rod_at(0.0, n);
        let law = RodSelfContact::new(1e4, 10.0);
        group.bench_function(BenchmarkId::new("self", n), |b| {
            b.iter(|| {
                law.apply(&mut rod);
                black_box(rod.external_forces()[0])
            });
        });

        let mut rod = rod_at(0.01, n);
        let plane = Plane::ground();
        let law = AnisotropicFrictionPlane::new(
            1e4,
            10.0,
            1e-4,
            DirectionalFriction::new(0.4, 0.2, 0.6),
            DirectionalFriction::new(0.3, 0.15, 0.5),
        );
        group.bench_function(BenchmarkId::new("anisotropic_plane", n), |b| {
            b.iter(|| black_box(law.apply(&mut rod, &plane)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segments, bench_rod_contact);
criterion_main!(benches);
