//! Property tests for the field-kick element.

use std::sync::Arc;

use proptest::prelude::*;
use symkick_core::{PassConfig, PhaseSpace};
use symkick_element::{Element, TransportMatrix};
use symkick_elements::{FieldKick, TwoDimensionalMultipoles};
use symkick_test_utils::{identity_map, ZeroField};

fn multipole_kick(
    length: f64,
    slices: usize,
    curvature: f64,
    b2: f64,
    b3: f64,
) -> FieldKick<TwoDimensionalMultipoles> {
    multipole_body(length, slices, curvature, b2, b3, (3.0, 5.0))
}

fn multipole_body(
    length: f64,
    slices: usize,
    curvature: f64,
    b2: f64,
    b3: f64,
    (entrance, exit): (f64, f64),
) -> FieldKick<TwoDimensionalMultipoles> {
    let field = TwoDimensionalMultipoles::new()
        .with_normal(2, b2)
        .unwrap()
        .with_normal(3, b3)
        .unwrap();
    FieldKick::builder(Arc::new(field))
        .length(length)
        .slices(slices)
        .curvature(curvature)
        .edge_angles(entrance, exit)
        .gap(0.03)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn field_free_body_is_a_drift(
        x in -0.01f64..0.01,
        px in -0.01f64..0.01,
        y in -0.01f64..0.01,
        py in -0.01f64..0.01,
        length in 0.01f64..5.0,
        slices in 1usize..32,
    ) {
        let k = FieldKick::builder(Arc::new(ZeroField))
            .length(length)
            .slices(slices)
            .build()
            .unwrap();
        let mut ps = PhaseSpace::from_array([x, px, y, py, 0.0, 0.0]);
        k.pass(&PassConfig::default(), &mut ps).unwrap();
        prop_assert!((ps.x - (x + px * length)).abs() < 1e-14);
        prop_assert!((ps.y - (y + py * length)).abs() < 1e-14);
        prop_assert_eq!(ps.px, px);
        prop_assert_eq!(ps.py, py);
    }

    #[test]
    fn extracted_linear_map_is_symplectic(
        length in 0.05f64..2.0,
        slices in 1usize..12,
        curvature in -0.5f64..0.5,
        b2 in -2.0f64..2.0,
        b3 in -20.0f64..20.0,
        x0 in -0.002f64..0.002,
        delta in -0.01f64..0.01,
        exact in any::<bool>(),
    ) {
        let k = multipole_kick(length, slices, curvature, b2, b3);
        let c = PassConfig::default()
            .with_exact_hamiltonian(exact)
            .with_dipole_edge_fudge(false);
        let mut map = identity_map(1, [x0, 0.0, 0.0, 0.0, delta, 0.0]);
        k.pass_map(&c, &mut map).unwrap();
        let m = TransportMatrix::from_map(&map);
        prop_assert!(m.symplectic_defect() < 1e-10, "defect {}", m.symplectic_defect());
        prop_assert!((m.determinant() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn body_map_is_symplectic_off_midplane(
        length in 0.05f64..2.0,
        slices in 1usize..12,
        curvature in -0.5f64..0.5,
        b2 in -2.0f64..2.0,
        b3 in -20.0f64..20.0,
        x0 in -0.002f64..0.002,
        y0 in -0.05f64..0.05,
        py0 in -0.002f64..0.002,
        delta in -0.01f64..0.01,
        exact in any::<bool>(),
    ) {
        // Square faces: the edge kick has no ct term, so only the body is
        // symplectic away from y = 0.
        let k = multipole_body(length, slices, curvature, b2, b3, (0.0, 0.0));
        let c = PassConfig::default().with_exact_hamiltonian(exact);
        let mut map = identity_map(1, [x0, 0.0, y0, py0, delta, 0.0]);
        k.pass_map(&c, &mut map).unwrap();
        let m = TransportMatrix::from_map(&map);
        prop_assert!(m.symplectic_defect() < 1e-10, "defect {}", m.symplectic_defect());
    }

    #[test]
    fn map_constant_part_tracks_the_orbit(
        x0 in -0.002f64..0.002,
        px0 in -0.001f64..0.001,
        delta in -0.01f64..0.01,
        b3 in -20.0f64..20.0,
    ) {
        let k = multipole_kick(0.6, 4, 0.2, 1.0, b3);
        let orbit = [x0, px0, 0.0005, 0.0, delta, 0.0];
        let c = PassConfig::default();
        let mut map = identity_map(3, orbit);
        let mut ps = PhaseSpace::from_array(orbit);
        k.pass_map(&c, &mut map).unwrap();
        k.pass(&c, &mut ps).unwrap();
        for (a, b) in map.values().iter().zip(ps.values()) {
            prop_assert!((a - b).abs() < 1e-14, "{} vs {}", a, b);
        }
    }
}
