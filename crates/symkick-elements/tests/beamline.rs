//! Field kicks composed into short beam lines.

use std::sync::Arc;
use std::thread;

use symkick_core::{ElementConfig, PassConfig, PassError, PhaseSpace, Tps};
use symkick_element::{Element, TrackScalar, TransportMatrix};
use symkick_elements::{FieldKick, SynchrotronIntegrals, TwoDimensionalMultipoles};
use symkick_test_utils::{
    assert_close, assert_phase_close, identity_map, init_test_tracing, FailingElement,
    GradientField, ZeroField,
};

fn track<T: TrackScalar>(
    line: &[Box<dyn Element>],
    config: &PassConfig,
    state: &mut PhaseSpace<T>,
) -> Result<(), PassError> {
    for element in line {
        T::pass_through(element.as_ref(), config, state)?;
    }
    Ok(())
}

fn quad(name: &str, length: f64, gradient: f64) -> Box<dyn Element> {
    let field = TwoDimensionalMultipoles::new().with_normal(2, gradient).unwrap();
    Box::new(
        FieldKick::builder(Arc::new(field))
            .name(name)
            .length(length)
            .slices(10)
            .build()
            .unwrap(),
    )
}

fn drift(length: f64) -> Box<dyn Element> {
    let cfg = ElementConfig::new()
        .with("name", "D")
        .with("length", length)
        .with("slices", 1.0);
    Box::new(FieldKick::from_config(&cfg, Arc::new(ZeroField)).unwrap())
}

fn fodo() -> Vec<Box<dyn Element>> {
    vec![
        quad("QF", 0.2, 1.2),
        drift(1.0),
        quad("QD", 0.2, -1.2),
        drift(1.0),
    ]
}

#[test]
fn fodo_cell_is_stable_and_symplectic() {
    init_test_tracing();
    let line = fodo();
    let mut map = identity_map(1, [0.0; 6]);
    track(&line, &PassConfig::default(), &mut map).unwrap();
    let m = TransportMatrix::from_map(&map);
    assert!(m.symplectic_defect() < 1e-12);

    let lin = m.linear();
    let trace_x = lin[0][0] + lin[1][1];
    let trace_y = lin[2][2] + lin[3][3];
    assert!(trace_x.abs() < 2.0, "horizontal trace {trace_x}");
    assert!(trace_y.abs() < 2.0, "vertical trace {trace_y}");
}

#[test]
fn map_and_particle_tracking_agree_along_a_line() {
    let line = fodo();
    let orbit = [0.001, -0.0002, 0.0005, 0.0001, 0.002, 0.0];
    let mut map = identity_map(2, orbit);
    let mut ps = PhaseSpace::from_array(orbit);
    let c = PassConfig::default();
    track(&line, &c, &mut map).unwrap();
    track(&line, &c, &mut ps).unwrap();
    assert_phase_close(&map, &ps, 1e-15);
}

#[test]
fn error_stops_the_line() {
    let mut line = fodo();
    line.insert(2, Box::new(FailingElement::new("BAD", 0)));
    let mut ps = PhaseSpace::from_array([0.001, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let err = track(&line, &PassConfig::default(), &mut ps).unwrap_err();
    assert!(matches!(err, PassError::PhysicsViolation { .. }));
    assert!(!ps.is_finite());
}

#[test]
fn shared_element_tracks_in_parallel() {
    let k = Arc::new(
        FieldKick::builder(Arc::new(GradientField::quadrupole(0.8)))
            .length(0.5)
            .slices(8)
            .build()
            .unwrap(),
    );
    let config = PassConfig::default();
    let results: Vec<PhaseSpace<f64>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let k = Arc::clone(&k);
                s.spawn(move || {
                    let x = 0.001 * i as f64;
                    let mut ps = PhaseSpace::from_array([x, 0.0, 0.0, 0.0, 0.0, 0.0]);
                    k.pass(&config, &mut ps).unwrap();
                    ps
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, ps) in results.iter().enumerate() {
        let x = 0.001 * i as f64;
        let mut expected = PhaseSpace::from_array([x, 0.0, 0.0, 0.0, 0.0, 0.0]);
        k.pass(&config, &mut expected).unwrap();
        assert_eq!(*ps, expected);
    }
}

#[test]
fn radiation_integrals_of_a_bend() {
    let (h, l) = (0.1, 2.0);
    let bend = FieldKick::builder(Arc::new(ZeroField))
        .length(l)
        .curvature(h)
        .slices(6)
        .build()
        .unwrap();
    let c = PassConfig::default().with_emittance(true);
    let mut integrals = SynchrotronIntegrals::new(0.0, 5.0).unwrap();

    // Orbit with dispersion-like offset.
    let mut ps = PhaseSpace::from_array([0.01, 0.0, 0.0, 0.0, 0.0, 0.0]);
    bend.pass_with_radiation(&c, &mut ps, &mut integrals).unwrap();

    assert_close(integrals.i2(), l * h * h, 1e-15);
    assert_close(integrals.i3(), l * h.powi(3), 1e-15);
    assert_close(integrals.i1(), l * ps.x * h, 1e-15);
    assert!(integrals.i4() > 0.0);
    assert!(integrals.i5() > 0.0);
    assert!(integrals.curly_h() > 0.0);

    let before = integrals.clone();
    let mut ps = PhaseSpace::from_array([0.01, 0.0, 0.0, 0.0, 0.0, 0.0]);
    bend.pass_with_radiation(&c, &mut ps, &mut integrals).unwrap();
    assert_close(integrals.i2(), 2.0 * before.i2(), 1e-15);
}

#[test]
fn map_pass_through_dyn_element() {
    let line: Vec<Box<dyn Element>> = vec![drift(2.0)];
    let mut map: PhaseSpace<Tps> = identity_map(1, [0.0; 6]);
    track(&line, &PassConfig::default(), &mut map).unwrap();
    let j = map.jacobian();
    assert_close(j[0][1], 2.0, 1e-15);
    assert_close(j[2][3], 2.0, 1e-15);
    assert_eq!(j[0][0], 1.0);
    assert_eq!(line[0].name(), "D");
}
