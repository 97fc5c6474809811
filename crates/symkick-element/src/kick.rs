//! The thin multipole kick.

use symkick_core::{PhaseSpace, Scalar};

use crate::interpolation::FieldInterpolation;

/// Apply an integrated field kick of weight `weight`.
///
/// `h_bend` is the curvature of the dipole field, `h_ref` that of the
/// reference trajectory: equal to `h_bend` in a polar sector bend, zero in
/// Cartesian geometry. The field is evaluated once at the entry position.
///
/// Polar (`h_ref ≠ 0`):
///
/// ```text
///   px −= w·(By + (h_bend − h_ref)/2 + h_ref·h_bend·x − h_ref·δ)
///   ct += w·h_ref·x
///   py += w·Bx
/// ```
///
/// Neither momentum kick scales the field by `(1 + h_ref·x)`;
/// `∂Δpx/∂y = ∂Δpy/∂x` holds for any field derived from a potential.
///
/// Cartesian: `px −= w·(h_bend + By)`, `py += w·Bx`.
///
/// Nothing happens for a field-free body (`order == 0`) without bending.
pub fn thin_kick<T: Scalar, I: FieldInterpolation>(
    order: usize,
    field: &I,
    weight: f64,
    h_bend: f64,
    h_ref: f64,
    ps: &mut PhaseSpace<T>,
) {
    if h_bend == 0.0 && order == 0 {
        return;
    }
    let x0 = ps.x.clone();
    let (bx, by) = field.field(&ps.x, &ps.y);

    if h_ref != 0.0 {
        ps.px -= (by + (h_bend - h_ref) / 2.0 + x0.clone() * (h_ref * h_bend)
            - ps.delta.clone() * h_ref)
            * weight;
        ps.ct += x0 * (weight * h_ref);
        ps.py += bx * weight;
    } else {
        ps.px -= (by + h_bend) * weight;
        ps.py += bx * weight;
    }
}
