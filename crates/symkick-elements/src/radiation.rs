//! Synchrotron radiation integrals accumulated while tracking.
//!
//! The integrals are owned by the caller and passed into
//! [`FieldKick::pass_with_radiation`](crate::FieldKick::pass_with_radiation),
//! so an element never carries per-run state and stays shareable between
//! threads. Dispersion is read from the tracked orbit: `η = x`,
//! `η' = px`.

use std::fmt;

use symkick_core::{ConfigError, PhaseSpace, Scalar};

/// Running sums of the radiation integrals `I1..I5`.
#[derive(Clone, Debug, PartialEq)]
pub struct SynchrotronIntegrals {
    alpha_x: f64,
    beta_x: f64,
    sums: [f64; 5],
    curly_h: f64,
}

/// Weighted samples collected across the slices of one element body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct BodySamples {
    curly_h: f64,
    eta: f64,
}

impl SynchrotronIntegrals {
    /// Start accumulating with horizontal Twiss parameters `alpha_x`,
    /// `beta_x` at the elements being tracked.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] unless `beta_x > 0` and `alpha_x`
    /// is finite.
    pub fn new(alpha_x: f64, beta_x: f64) -> Result<Self, ConfigError> {
        if !(beta_x > 0.0) || !beta_x.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "beta_x".to_string(),
                reason: format!("must be finite and > 0, got {beta_x}"),
            });
        }
        if !alpha_x.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "alpha_x".to_string(),
                reason: format!("must be finite, got {alpha_x}"),
            });
        }
        Ok(Self {
            alpha_x,
            beta_x,
            sums: [0.0; 5],
            curly_h: 0.0,
        })
    }

    /// Twiss alpha.
    pub fn alpha_x(&self) -> f64 {
        self.alpha_x
    }

    /// Twiss beta [m].
    pub fn beta_x(&self) -> f64 {
        self.beta_x
    }

    /// Twiss gamma, `(1 + α²)/β`.
    pub fn gamma_x(&self) -> f64 {
        (1.0 + self.alpha_x * self.alpha_x) / self.beta_x
    }

    /// Dispersion invariant `H = γη² + 2αηη' + βη'²`.
    pub fn dispersion_invariant(&self, eta: f64, eta_prime: f64) -> f64 {
        self.gamma_x() * eta * eta
            + 2.0 * self.alpha_x * eta * eta_prime
            + self.beta_x * eta_prime * eta_prime
    }

    /// `I1 = ∫ η·h ds`.
    pub fn i1(&self) -> f64 {
        self.sums[0]
    }

    /// `I2 = ∫ h² ds`.
    pub fn i2(&self) -> f64 {
        self.sums[1]
    }

    /// `I3 = ∫ |h|³ ds`.
    pub fn i3(&self) -> f64 {
        self.sums[2]
    }

    /// `I4 = ∫ η·h·(h² + 2·b2) ds`.
    pub fn i4(&self) -> f64 {
        self.sums[3]
    }

    /// `I5 = ∫ |h|³·H ds`.
    pub fn i5(&self) -> f64 {
        self.sums[4]
    }

    /// Body average of `H` from the most recent element.
    pub fn curly_h(&self) -> f64 {
        self.curly_h
    }

    /// Clear all sums, keeping the Twiss parameters.
    pub fn reset(&mut self) {
        self.sums = [0.0; 5];
        self.curly_h = 0.0;
    }

    /// Add one weighted sample of the orbit.
    pub(crate) fn sample<T: Scalar>(
        &self,
        samples: &mut BodySamples,
        weight: f64,
        ps: &PhaseSpace<T>,
    ) {
        let (eta, eta_prime) = (ps.x.value(), ps.px.value());
        samples.curly_h += weight * self.dispersion_invariant(eta, eta_prime);
        samples.eta += weight * eta;
    }

    /// Fold the samples of a body of length `length`, `slices` slices,
    /// curvature `h` and quadrupole strength `b2` into the sums. `eta_exit`
    /// is the dispersion at the body exit.
    pub(crate) fn add_body(
        &mut self,
        samples: &BodySamples,
        length: f64,
        slices: usize,
        h: f64,
        b2: f64,
        eta_exit: f64,
    ) {
        // Each slice contributes weights 1 + 4 + 1.
        let norm = 6.0 * slices as f64;
        self.curly_h = samples.curly_h / norm;
        let h3 = h.abs().powi(3);
        self.sums[0] += length * eta_exit * h;
        self.sums[1] += length * h * h;
        self.sums[2] += length * h3;
        self.sums[3] += samples.eta * length * h * (h * h + 2.0 * b2) / norm;
        self.sums[4] += length * h3 * self.curly_h;
    }
}

impl Default for SynchrotronIntegrals {
    fn default() -> Self {
        Self {
            alpha_x: 0.0,
            beta_x: 1.0,
            sums: [0.0; 5],
            curly_h: 0.0,
        }
    }
}

impl fmt::Display for SynchrotronIntegrals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "I1 = {:e}, I2 = {:e}, I3 = {:e}, I4 = {:e}, I5 = {:e}",
            self.i1(),
            self.i2(),
            self.i3(),
            self.i4(),
            self.i5()
        )
    }
}
