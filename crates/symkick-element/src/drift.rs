//! Longitudinal momentum and field-free propagation.

use symkick_core::{PassConfig, PassError, PhaseSpace, Scalar};

/// Longitudinal momentum `p_s` normalised to the reference momentum.
///
/// Paraxial model: `1 + delta`. Exact model:
/// `sqrt((1 + delta)² − px² − py²)`.
///
/// # Errors
///
/// [`PassError::PhysicsViolation`] if `p_s` would be zero or imaginary;
/// every kernel divides by it.
pub fn longitudinal_momentum<T: Scalar>(
    config: &PassConfig,
    ps: &PhaseSpace<T>,
) -> Result<T, PassError> {
    if !config.exact_hamiltonian {
        let p_s = ps.delta.clone() + 1.0;
        if !(p_s.value() > 0.0) {
            return Err(PassError::PhysicsViolation {
                reason: "non-positive total momentum".to_string(),
                value: p_s.value(),
            });
        }
        return Ok(p_s);
    }

    let p_s2 = (ps.delta.clone() + 1.0).sqr() - ps.px.sqr() - ps.py.sqr();
    if !(p_s2.value() > 0.0) {
        return Err(PassError::PhysicsViolation {
            reason: "speed of light exceeded: longitudinal momentum squared".to_string(),
            value: p_s2.value(),
        });
    }
    Ok(p_s2.sqrt())
}

/// Propagate through a field-free region of length `length`.
///
/// Paraxial: `u = L/(1+δ)`, `x += u·px`, `y += u·py`,
/// `ct += u·(px² + py²)/(2(1+δ))`.
/// Exact: `u = L/p_s`, `x += u·px`, `y += u·py`, `ct += u·(1+δ) − L`.
///
/// `length` may be negative (the inner step of the 4th-order composition).
pub fn drift<T: Scalar>(
    config: &PassConfig,
    length: f64,
    ps: &mut PhaseSpace<T>,
) -> Result<(), PassError> {
    let one_plus_delta = ps.delta.clone() + 1.0;
    if !config.exact_hamiltonian {
        let p_s = longitudinal_momentum(config, ps)?;
        let u = T::from(length) / p_s;
        ps.x += u.clone() * ps.px.clone();
        ps.y += u.clone() * ps.py.clone();
        ps.ct += u * (ps.px.sqr() + ps.py.sqr()) / (one_plus_delta * 2.0);
    } else {
        let u = T::from(length) / longitudinal_momentum(config, ps)?;
        ps.x += u.clone() * ps.px.clone();
        ps.y += u.clone() * ps.py.clone();
        ps.ct += u * one_plus_delta - length;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(x: f64, px: f64, y: f64, py: f64, delta: f64) -> PhaseSpace<f64> {
        PhaseSpace::from_array([x, px, y, py, delta, 0.0])
    }

    #[test]
    fn paraxial_momentum_is_one_plus_delta() {
        let ps = state(0.0, 0.3, 0.0, 0.1, 0.01);
        let p = longitudinal_momentum(&PassConfig::default(), &ps).unwrap();
        assert!((p - 1.01).abs() < 1e-15);
    }

    #[test]
    fn exact_momentum_subtracts_transverse() {
        let ps = state(0.0, 0.6, 0.0, 0.0, 0.0);
        let c = PassConfig::default().with_exact_hamiltonian(true);
        let p = longitudinal_momentum(&c, &ps).unwrap();
        assert!((p - 0.8).abs() < 1e-15);
    }

    #[test]
    fn exact_momentum_rejects_superluminal() {
        let ps = state(0.0, 0.8, 0.0, 0.8, 0.0);
        let c = PassConfig::default().with_exact_hamiltonian(true);
        let err = longitudinal_momentum(&c, &ps).unwrap_err();
        assert!(matches!(err, PassError::PhysicsViolation { .. }));
    }

    #[test]
    fn zero_total_momentum_rejected() {
        let ps = state(0.0, 0.0, 0.0, 0.0, -1.0);
        assert!(longitudinal_momentum(&PassConfig::default(), &ps).is_err());
    }

    #[test]
    fn exact_drift_path_length() {
        // px = 0.6 → p_s = 0.8, dx/ds = 0.75, ct grows by L/0.8 − L.
        let c = PassConfig::default().with_exact_hamiltonian(true);
        let mut ps = state(0.0, 0.6, 0.0, 0.0, 0.0);
        drift(&c, 2.0, &mut ps).unwrap();
        assert!((ps.x - 1.5).abs() < 1e-14);
        assert!((ps.ct - 0.5).abs() < 1e-14);
    }

    #[test]
    fn paraxial_drift_on_axis_momentum() {
        let mut ps = state(0.001, 0.002, -0.001, 0.001, 0.0);
        drift(&PassConfig::default(), 1.0, &mut ps).unwrap();
        assert!((ps.x - 0.003).abs() < 1e-15);
        assert!(ps.y.abs() < 1e-15);
        let expected_ct = (0.002f64.powi(2) + 0.001f64.powi(2)) / 2.0;
        assert!((ps.ct - expected_ct).abs() < 1e-18);
    }

    proptest! {
        #[test]
        fn drift_then_reverse_drift_is_identity(
            x in -0.01f64..0.01,
            px in -0.01f64..0.01,
            py in -0.01f64..0.01,
            delta in -0.02f64..0.02,
            len in 0.0f64..5.0,
            exact in any::<bool>(),
        ) {
            let c = PassConfig::default().with_exact_hamiltonian(exact);
            let mut ps = state(x, px, 0.0, py, delta);
            let start = ps;
            drift(&c, len, &mut ps).unwrap();
            drift(&c, -len, &mut ps).unwrap();
            for (a, b) in ps.values().iter().zip(start.values()) {
                prop_assert!((a - b).abs() < 1e-14);
            }
        }
    }
}
