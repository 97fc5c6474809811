//! Benchmark profiles and utilities for symkick.
//!
//! - [`reference_sextupole`]: a curved combined-function magnet with a
//!   sextupole component, sliced finely enough to exercise the integrator
//! - [`particle_ensemble`]: deterministic Gaussian particle sets via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use symkick_core::{ConfigError, PhaseSpace};
use symkick_elements::{FieldKick, TwoDimensionalMultipoles};

/// Build the reference element: `L = 1 m`, `h = 0.05 /m`, `b2 = 0.4`,
/// `b3 = 12`, 3° edges, 20 slices.
pub fn reference_sextupole() -> Result<FieldKick<TwoDimensionalMultipoles>, ConfigError> {
    let field = TwoDimensionalMultipoles::new()
        .with_normal(2, 0.4)?
        .with_normal(3, 12.0)?;
    FieldKick::builder(Arc::new(field))
        .name("BENCH")
        .length(1.0)
        .curvature(0.05)
        .edge_angles(3.0, 3.0)
        .gap(0.04)
        .slices(20)
        .build()
}

/// Generate `n` particles with every coordinate drawn from a centred
/// Gaussian of width `sigma`.
pub fn particle_ensemble(n: usize, seed: u64, sigma: f64) -> Vec<PhaseSpace<f64>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut coords = [0.0; 6];
            for c in &mut coords {
                *c = sigma * box_muller(&mut rng);
            }
            PhaseSpace::from_array(coords)
        })
        .collect()
}

fn box_muller(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300);
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
