//! The [`Scalar`] capability trait.
//!
//! Every kernel in the workspace is written once, generic over `T: Scalar`,
//! and instantiated for plain `f64` (single trajectories) and for
//! [`Tps`](crate::Tps) (transfer-map extraction). Both instantiations run
//! the same formulas; only the arithmetic differs.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Numeric capability required by the tracking kernels.
///
/// Arithmetic is by value. Implementations that own heap data should make
/// `Clone` cheap relative to a multiplication, since the kernels clone
/// operands freely to keep the formulas readable.
///
/// Branch decisions (e.g. the sign of a discriminant) are taken on
/// [`value()`](Scalar::value), the constant part. For `f64` this is the
/// number itself; for a power series it is the orbit the map is expanded
/// around.
pub trait Scalar:
    Clone
    + fmt::Debug
    + From<f64>
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Sub<f64, Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + AddAssign<f64>
    + SubAssign<f64>
    + MulAssign<f64>
    + DivAssign<f64>
{
    /// The constant part of the scalar.
    fn value(&self) -> f64;

    /// Square root.
    fn sqrt(&self) -> Self;

    /// Natural exponential.
    fn exp(&self) -> Self;

    /// Sine (argument in radians).
    fn sin(&self) -> Self;

    /// Cosine (argument in radians).
    fn cos(&self) -> Self;

    /// Tangent (argument in radians).
    fn tan(&self) -> Self {
        self.sin() / self.cos()
    }

    /// The invalid sentinel written into a state that must not be used.
    fn nan() -> Self {
        Self::from(f64::NAN)
    }

    /// `true` if every component of the scalar is finite.
    fn is_finite(&self) -> bool;

    /// `self * self`.
    fn sqr(&self) -> Self {
        self.clone() * self.clone()
    }

    /// `self * self * self`.
    fn cube(&self) -> Self {
        self.sqr() * self.clone()
    }
}

impl Scalar for f64 {
    fn value(&self) -> f64 {
        *self
    }

    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }

    fn exp(&self) -> Self {
        f64::exp(*self)
    }

    fn sin(&self) -> Self {
        f64::sin(*self)
    }

    fn cos(&self) -> Self {
        f64::cos(*self)
    }

    fn tan(&self) -> Self {
        f64::tan(*self)
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    fn sqr(&self) -> Self {
        *self * *self
    }

    fn cube(&self) -> Self {
        *self * *self * *self
    }
}
