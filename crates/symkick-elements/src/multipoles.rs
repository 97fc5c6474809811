//! Two-dimensional multipole expansion of a magnet body field.

use std::fmt;

use smallvec::SmallVec;
use symkick_core::{ConfigError, Scalar};
use symkick_element::FieldInterpolation;

/// Highest multipole order an expansion may hold.
pub const MAX_MULTIPOLE_ORDER: usize = 21;

/// Order of the quadrupole term.
pub const QUADRUPOLE: usize = 2;

/// Multipole coefficients `(b_n, a_n)` for `n = 1..=N`:
///
/// ```text
///   By + i·Bx = Σ (b_n + i·a_n)·(x + i·y)^(n−1)
/// ```
///
/// `n = 1` is the dipole, `n = 2` the quadrupole, and so on. Values are
/// normalised to the beam rigidity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TwoDimensionalMultipoles {
    /// `(normal, skew)` pairs; index `n − 1` holds order `n`.
    coeffs: SmallVec<[(f64, f64); 6]>,
}

impl TwoDimensionalMultipoles {
    /// An expansion with no field content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normal coefficient `b_n`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if `n` is outside
    /// `1..=MAX_MULTIPOLE_ORDER` or `value` is not finite.
    pub fn with_normal(mut self, n: usize, value: f64) -> Result<Self, ConfigError> {
        self.slot(n, value)?.0 = value;
        Ok(self)
    }

    /// Set the skew coefficient `a_n`.
    ///
    /// # Errors
    ///
    /// As for [`with_normal`](Self::with_normal).
    pub fn with_skew(mut self, n: usize, value: f64) -> Result<Self, ConfigError> {
        self.slot(n, value)?.1 = value;
        Ok(self)
    }

    /// Multiply every coefficient by `factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        for (b, a) in &mut self.coeffs {
            *b *= factor;
            *a *= factor;
        }
        self
    }

    fn slot(&mut self, n: usize, value: f64) -> Result<&mut (f64, f64), ConfigError> {
        if n == 0 || n > MAX_MULTIPOLE_ORDER {
            return Err(ConfigError::InvalidParameter {
                name: "multipole order".to_string(),
                reason: format!("must be in 1..={MAX_MULTIPOLE_ORDER}, got {n}"),
            });
        }
        if !value.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: format!("multipole coefficient {n}"),
                reason: format!("must be finite, got {value}"),
            });
        }
        if self.coeffs.len() < n {
            self.coeffs.resize(n, (0.0, 0.0));
        }
        Ok(&mut self.coeffs[n - 1])
    }
}

impl FieldInterpolation for TwoDimensionalMultipoles {
    fn field<T: Scalar>(&self, x: &T, y: &T) -> (T, T) {
        let Some(&(b, a)) = self.coeffs.last() else {
            return (T::from(0.0), T::from(0.0));
        };
        // Horner's rule in the complex variable x + iy.
        let mut re = T::from(b);
        let mut im = T::from(a);
        for &(b, a) in self.coeffs.iter().rev().skip(1) {
            let next_re = re.clone() * x.clone() - im.clone() * y.clone() + b;
            im = re * y.clone() + im * x.clone() + a;
            re = next_re;
        }
        (im, re)
    }

    fn highest_order(&self) -> usize {
        self.coeffs
            .iter()
            .rposition(|&(b, a)| b != 0.0 || a != 0.0)
            .map_or(0, |i| i + 1)
    }

    fn normal(&self, n: usize) -> f64 {
        n.checked_sub(1)
            .and_then(|i| self.coeffs.get(i))
            .map_or(0.0, |c| c.0)
    }

    fn skew(&self, n: usize) -> f64 {
        n.checked_sub(1)
            .and_then(|i| self.coeffs.get(i))
            .map_or(0.0, |c| c.1)
    }
}

impl fmt::Display for TwoDimensionalMultipoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "multipoles(")?;
        let mut first = true;
        for (i, &(b, a)) in self.coeffs.iter().enumerate() {
            if b == 0.0 && a == 0.0 {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}: {b:+e}{a:+e}i", i + 1)?;
        }
        write!(f, ")")
    }
}
