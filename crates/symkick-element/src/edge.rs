//! Dipole pole-face kernels.
//!
//! Polar bends treat the pole face as a thin edge-focusing lens
//! ([`edge_focus`]). Cartesian bends instead rotate the reference frame
//! onto the face ([`bend_rotate`]) and add the vertical fringe kick
//! separately (see [`bend_fringe`](crate::fringe::bend_fringe)).
//!
//! Angles are in degrees throughout.

use symkick_core::{PassConfig, PassError, PhaseSpace, Scalar};

use crate::drift::longitudinal_momentum;

/// Fringe-field integral factor.
const K1: f64 = 0.5;
/// Second-order fringe correction factor (0.4 is typical for a bend; the
/// correction is disabled).
const K2: f64 = 0.0;

/// Gap correction `psi` of the vertical edge kick.
///
/// ```text
///          K1·gap·h·(1 + sin²φ)
///   psi = ─────────────────────── · (1 − K1·K2·gap·h·tan φ)
///                 cos φ
/// ```
///
/// Zero for a face perpendicular to the reference trajectory.
pub fn gap_correction(curvature: f64, angle_deg: f64, gap: f64) -> f64 {
    if angle_deg == 0.0 {
        return 0.0;
    }
    let phi = angle_deg.to_radians();
    K1 * gap * curvature * (1.0 + phi.sin().powi(2)) / phi.cos()
        * (1.0 - K1 * K2 * gap * curvature * phi.tan())
}

/// Linear edge focusing of a polar bend's pole face.
///
/// ```text
///   px += h·tan(φ)·x
///   py −= h·tan(φ − psi)·y·(1 − δ)      dipole_edge_fudge on
///   py −= h·tan(φ − psi)·y/(1 + δ)      dipole_edge_fudge off
/// ```
///
/// The exact `1/(1 + δ)` form leads to a diverging Taylor map for some
/// gap/curvature combinations; the fudge flag selects its leading-order
/// expansion instead. Both forms are kept.
pub fn edge_focus<T: Scalar>(
    config: &PassConfig,
    curvature: f64,
    angle_deg: f64,
    gap: f64,
    ps: &mut PhaseSpace<T>,
) {
    let phi = angle_deg.to_radians();
    let psi = gap_correction(curvature, angle_deg, gap);
    let k_x = curvature * phi.tan();
    let k_y = curvature * (phi - psi).tan();

    ps.px += ps.x.clone() * k_x;
    if config.dipole_edge_fudge {
        let scale = -ps.delta.clone() + 1.0;
        ps.py -= ps.y.clone() * scale * k_y;
    } else {
        let scale = ps.delta.clone() + 1.0;
        ps.py -= ps.y.clone() * k_y / scale;
    }
}

/// Rotate the state about the vertical axis onto a pole face inclined by
/// `angle_deg`.
///
/// In the paraxial polar model only the horizontal momentum changes:
/// `px = sin φ·p_s + cos φ·px`. With the exact Hamiltonian or Cartesian
/// bends, x, y and ct are solved self-consistently:
///
/// ```text
///   val = 1 − px·tan φ / p_s
///   x'  = x / (cos φ · val)
///   px' = px·cos φ + sin φ·p_s
///   y'  = y + tan φ·x·py / (p_s·val)
///   ct' = ct + x·(1 + δ)·tan φ / (p_s·val)
/// ```
///
/// # Errors
///
/// [`PassError::PhysicsViolation`] if `p_s` is inadmissible or `val`
/// vanishes (trajectory parallel to the face).
pub fn bend_rotate<T: Scalar>(
    config: &PassConfig,
    angle_deg: f64,
    ps: &mut PhaseSpace<T>,
) -> Result<(), PassError> {
    let phi = angle_deg.to_radians();
    let (c, s, t) = (phi.cos(), phi.sin(), phi.tan());
    let p_s = longitudinal_momentum(config, ps)?;

    if !config.exact_hamiltonian && !config.cartesian_bend {
        ps.px = p_s * s + ps.px.clone() * c;
        return Ok(());
    }

    let ps1 = ps.clone();
    let val = -(ps1.px.clone() * t / p_s.clone()) + 1.0;
    if val.value() == 0.0 {
        return Err(PassError::PhysicsViolation {
            reason: "trajectory parallel to pole face".to_string(),
            value: val.value(),
        });
    }
    let p_s_val = p_s.clone() * val.clone();

    ps.x = ps1.x.clone() / (val * c);
    ps.px = ps1.px.clone() * c + p_s * s;
    ps.y = ps1.y + ps1.x.clone() * ps1.py * t / p_s_val.clone();
    ps.ct = ps1.ct + ps1.x * (ps1.delta + 1.0) * t / p_s_val;
    Ok(())
}
