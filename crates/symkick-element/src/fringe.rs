//! Fringe-field corrections at magnet faces.

use symkick_core::{PassConfig, PassError, PhaseSpace, Scalar};
use tracing::warn;

use crate::drift::longitudinal_momentum;

/// Second-order vertical focusing of a Cartesian bend's fringe field.
///
/// With `coeff = −h/2` and `u = 1 + 4·coeff·px·y·py / p_s³`:
///
/// ```text
///   y'  = 2y / (1 + √u)
///   x'  = x − coeff·y'²·(p_s² + px²) / p_s³
///   py' = py + 2·coeff·px·y' / p_s
///   ct' = ct − coeff·px·y'²·(1 + δ) / p_s³
/// ```
///
/// The exit face is passed with negated curvature.
///
/// # Errors
///
/// `u < 0` has no physical solution (it would need a longitudinal
/// velocity above the speed of light). All six components are set to NaN
/// and [`PassError::PhysicsViolation`] carrying `u` is returned; the
/// state is unusable afterwards.
pub fn bend_fringe<T: Scalar>(
    config: &PassConfig,
    curvature: f64,
    ps: &mut PhaseSpace<T>,
) -> Result<(), PassError> {
    let coeff = -curvature / 2.0;
    let ps1 = ps.clone();
    let p_s = longitudinal_momentum(config, ps)?;
    let p_s2 = p_s.sqr();
    let p_s3 = p_s2.clone() * p_s.clone();
    let u = ps1.px.clone() * ps1.y.clone() * ps1.py.clone() * (4.0 * coeff) / p_s3.clone() + 1.0;

    if u.value() < 0.0 {
        warn!(
            u = u.value(),
            curvature, "bend fringe: speed of light exceeded"
        );
        ps.fill(T::nan());
        return Err(PassError::PhysicsViolation {
            reason: "speed of light exceeded in bend fringe".to_string(),
            value: u.value(),
        });
    }

    let y = ps1.y.clone() * 2.0 / (u.sqrt() + 1.0);
    let y2 = y.sqr();
    ps.x = ps1.x - y2.clone() * (p_s2 + ps1.px.sqr()) * coeff / p_s3.clone();
    ps.py = ps1.py + ps1.px.clone() * y.clone() * (2.0 * coeff) / p_s;
    ps.ct = ps1.ct - ps1.px * y2 * (ps1.delta + 1.0) * coeff / p_s3;
    ps.y = y;
    Ok(())
}

/// Leading-order hard-edge quadrupole fringe correction.
///
/// `b2` is the quadrupole strength; the entrance face is passed with
/// `+b2`, the exit face with `−b2`. With `u = b2 / (12(1 + δ))` the
/// correction applies cubic terms in each plane followed by exponential
/// cross-plane terms. The `ct` updates are path-length corrections that
/// only apply when the cavity defines the reference time.
pub fn quad_fringe<T: Scalar>(config: &PassConfig, b2: f64, ps: &mut PhaseSpace<T>) {
    let one_plus_delta = ps.delta.clone() + 1.0;
    let mut u = T::from(b2) / (one_plus_delta.clone() * 12.0);
    let mut p_s = u.clone() / one_plus_delta;

    // cubic terms, vertical then horizontal
    ps.py /= -(u.clone() * ps.y.sqr() * 3.0) + 1.0;
    ps.y -= u.clone() * ps.y.cube();
    if config.cavity_on {
        ps.ct -= p_s.clone() * ps.y.cube() * ps.py.clone();
    }
    ps.px /= u.clone() * ps.x.sqr() * 3.0 + 1.0;
    if config.cavity_on {
        ps.ct += p_s.clone() * ps.x.cube() * ps.px.clone();
    }
    ps.x += u.clone() * ps.x.cube();

    u *= 3.0;
    p_s *= 3.0;

    // cross terms driven by x²
    let x2 = ps.x.sqr();
    ps.y = (-(u.clone() * x2.clone())).exp() * ps.y.clone();
    ps.py = (u.clone() * x2).exp() * ps.py.clone();
    ps.px += u.clone() * ps.x.clone() * ps.y.clone() * ps.py.clone() * 2.0;
    if config.cavity_on {
        ps.ct -= p_s.clone() * ps.x.sqr() * ps.y.clone() * ps.py.clone();
    }

    // cross terms driven by y²
    let y2 = ps.y.sqr();
    ps.x = (u.clone() * y2.clone()).exp() * ps.x.clone();
    ps.px = (-(u.clone() * y2)).exp() * ps.px.clone();
    ps.py -= u * ps.y.clone() * ps.x.clone() * ps.px.clone() * 2.0;
    if config.cavity_on {
        ps.ct += p_s * ps.y.sqr() * ps.x.clone() * ps.px.clone();
    }
}
