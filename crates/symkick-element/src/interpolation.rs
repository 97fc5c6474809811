//! The [`FieldInterpolation`] collaborator consumed by the kick.

use std::fmt;

use symkick_core::Scalar;

/// Magnetic field of an element body as a function of transverse position.
///
/// Values are normalised to the beam rigidity `Bρ`, so a kick of weight
/// `w` changes the momenta by `w · B/Bρ`. An interpolation is consulted
/// read-only; a single instance may back many elements.
pub trait FieldInterpolation: fmt::Debug + Send + Sync {
    /// `(Bx/Bρ, By/Bρ)` at `(x, y)`.
    fn field<T: Scalar>(&self, x: &T, y: &T) -> (T, T);

    /// Highest multipole order with non-zero content (1 = dipole,
    /// 2 = quadrupole, ...); 0 for a field-free body.
    fn highest_order(&self) -> usize;

    /// Normal coefficient `b_n` of multipole order `n` (0 if absent).
    fn normal(&self, n: usize) -> f64;

    /// Skew coefficient `a_n` of multipole order `n` (0 if absent).
    fn skew(&self, n: usize) -> f64;
}
