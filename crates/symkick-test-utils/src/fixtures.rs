//! Reusable field and element fixtures.
//!
//! - [`ZeroField`]: a field-free body.
//! - [`GradientField`]: dipole plus normal quadrupole, linear in position.
//! - [`FailingElement`]: fails with a physics violation after N passes.

use std::sync::atomic::{AtomicUsize, Ordering};

use symkick_core::{PassConfig, PassError, PhaseSpace, Scalar, Tps};
use symkick_element::{Element, FieldInterpolation};

/// No field anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZeroField;

impl FieldInterpolation for ZeroField {
    fn field<T: Scalar>(&self, _x: &T, _y: &T) -> (T, T) {
        (T::from(0.0), T::from(0.0))
    }

    fn highest_order(&self) -> usize {
        0
    }

    fn normal(&self, _n: usize) -> f64 {
        0.0
    }

    fn skew(&self, _n: usize) -> f64 {
        0.0
    }
}

/// `By = b1 + b2·x`, `Bx = b2·y`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GradientField {
    pub dipole: f64,
    pub gradient: f64,
}

impl GradientField {
    pub fn quadrupole(gradient: f64) -> Self {
        Self {
            dipole: 0.0,
            gradient,
        }
    }

    pub fn dipole(dipole: f64) -> Self {
        Self {
            dipole,
            gradient: 0.0,
        }
    }
}

impl FieldInterpolation for GradientField {
    fn field<T: Scalar>(&self, x: &T, y: &T) -> (T, T) {
        (
            y.clone() * self.gradient,
            x.clone() * self.gradient + self.dipole,
        )
    }

    fn highest_order(&self) -> usize {
        if self.gradient != 0.0 {
            2
        } else if self.dipole != 0.0 {
            1
        } else {
            0
        }
    }

    fn normal(&self, n: usize) -> f64 {
        match n {
            1 => self.dipole,
            2 => self.gradient,
            _ => 0.0,
        }
    }

    fn skew(&self, _n: usize) -> f64 {
        0.0
    }
}

/// Passes states unchanged, then fails deterministically from pass
/// number `succeed_count + 1` on, filling the state with NaN first.
#[derive(Debug)]
pub struct FailingElement {
    name: String,
    call_count: AtomicUsize,
    succeed_count: usize,
}

impl FailingElement {
    pub fn new(name: impl Into<String>, succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            call_count: AtomicUsize::new(0),
            succeed_count,
        }
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    fn run<T: Scalar>(&self, state: &mut PhaseSpace<T>) -> Result<(), PassError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            state.fill(T::nan());
            return Err(PassError::PhysicsViolation {
                reason: format!("{} failed on pass {}", self.name, n + 1),
                value: n as f64,
            });
        }
        Ok(())
    }
}

impl Element for FailingElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn length(&self) -> f64 {
        0.0
    }

    fn pass(&self, _: &PassConfig, state: &mut PhaseSpace<f64>) -> Result<(), PassError> {
        self.run(state)
    }

    fn pass_map(&self, _: &PassConfig, state: &mut PhaseSpace<Tps>) -> Result<(), PassError> {
        self.run(state)
    }
}
