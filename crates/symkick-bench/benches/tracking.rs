//! Criterion benchmarks for whole-element tracking.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use symkick_bench::{particle_ensemble, reference_sextupole};
use symkick_core::{PassConfig, PhaseSpace, TpsDescriptor};
use symkick_element::{Element, TransportMatrix};

/// Benchmark: Track 1000 particles through the reference element.
fn bench_track_1k_particles(c: &mut Criterion) {
    let kick = reference_sextupole().unwrap();
    let config = PassConfig::default();
    let particles = particle_ensemble(1000, 42, 1e-3);

    c.bench_function("track_1k_particles", |b| {
        b.iter(|| {
            for p in &particles {
                let mut ps = *p;
                kick.pass(&config, &mut ps).unwrap();
                black_box(&ps);
            }
        });
    });
}

/// Benchmark: Same ensemble with the exact Hamiltonian and Cartesian faces.
fn bench_track_exact_cartesian(c: &mut Criterion) {
    let kick = reference_sextupole().unwrap();
    let config = PassConfig::default()
        .with_exact_hamiltonian(true)
        .with_cartesian_bend(true);
    let particles = particle_ensemble(1000, 42, 1e-3);

    c.bench_function("track_1k_particles_exact_cartesian", |b| {
        b.iter(|| {
            for p in &particles {
                let mut ps = *p;
                kick.pass(&config, &mut ps).unwrap();
                black_box(&ps);
            }
        });
    });
}

/// Benchmark: Extract maps of increasing order around the design orbit.
fn bench_map_extraction(c: &mut Criterion) {
    let kick = reference_sextupole().unwrap();
    let config = PassConfig::default();

    let mut group = c.benchmark_group("map_extraction");
    for order in [1u32, 2, 3] {
        let desc = TpsDescriptor::new(order).unwrap();
        group.bench_function(format!("order_{order}"), |b| {
            b.iter(|| {
                let mut map = PhaseSpace::identity(&desc);
                kick.pass_map(&config, &mut map).unwrap();
                black_box(TransportMatrix::from_map(&map));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_track_1k_particles,
    bench_track_exact_cartesian,
    bench_map_extraction
);
criterion_main!(benches);
