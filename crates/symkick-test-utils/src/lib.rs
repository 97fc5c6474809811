//! Test utilities and mock types for symkick development.
//!
//! Provides mock [`FieldInterpolation`](symkick_element::FieldInterpolation)
//! implementations and fixture elements (see [`fixtures`]), tolerance
//! assertions, and a one-time tracing subscriber for tests that want to
//! see diagnostics (`RUST_LOG=symkick=trace`).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::OnceLock;

use symkick_core::{PhaseSpace, Scalar, Tps, TpsDescriptor, PHASE_DIM};
use tracing_subscriber::EnvFilter;

pub use fixtures::{FailingElement, GradientField, ZeroField};

/// Install a test-friendly `fmt` subscriber once per process.
///
/// Honours `RUST_LOG`; defaults to `warn`. Output goes through the test
/// harness writer so it is captured per test.
pub fn init_test_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Panic unless `|actual − expected| <= tol`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (|diff| = {:e} > {tol:e})",
        (actual - expected).abs()
    );
}

/// Component-wise [`assert_close`] on the constant parts of two states.
#[track_caller]
pub fn assert_phase_close<T: Scalar, U: Scalar>(
    actual: &PhaseSpace<T>,
    expected: &PhaseSpace<U>,
    tol: f64,
) {
    let (a, e) = (actual.values(), expected.values());
    for i in 0..PHASE_DIM {
        assert!(
            (a[i] - e[i]).abs() <= tol,
            "component {i}: expected {}, got {} (tol {tol:e})",
            e[i],
            a[i]
        );
    }
}

/// Identity map of the given order expanded around `orbit`.
pub fn identity_map(order: u32, orbit: [f64; PHASE_DIM]) -> PhaseSpace<Tps> {
    let desc = TpsDescriptor::new(order).expect("test map order out of range");
    PhaseSpace::identity_at(&desc, orbit)
}
