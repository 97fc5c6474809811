//! The [`Element`] pass contract.
//!
//! Elements are configured once and then passed many times, once per
//! particle or per map extraction. A pass mutates the state in place and
//! either succeeds or aborts with a [`PassError`].

use std::fmt;

use symkick_core::{PassConfig, PassError, PhaseSpace, Tps};

/// A lattice element that a phase-space state can be passed through.
///
/// # Contract
///
/// - `pass()` and `pass_map()` MUST run the same generic algorithm; the
///   map instantiation differs only in the scalar kind.
/// - `&self`: passing never mutates the element, so one instance may be
///   shared by threads tracking independent particles. Per-run
///   accumulators (e.g. radiation integrals) are owned by the caller.
/// - A reversed element swaps the roles of its entrance and exit faces.
///
/// # Object safety
///
/// This trait is object-safe; a beam line can be stored as
/// `Vec<Box<dyn Element>>`.
pub trait Element: fmt::Debug + Send + Sync {
    /// Element name for diagnostics.
    fn name(&self) -> &str;

    /// Length [m]. Zero for thin elements.
    fn length(&self) -> f64;

    /// `true` if the element is traversed exit face first.
    fn is_reversed(&self) -> bool {
        false
    }

    /// Track a single trajectory.
    fn pass(&self, config: &PassConfig, state: &mut PhaseSpace<f64>) -> Result<(), PassError>;

    /// Track a truncated power-series map.
    fn pass_map(&self, config: &PassConfig, state: &mut PhaseSpace<Tps>)
        -> Result<(), PassError>;
}

/// Scalar kinds an [`Element`] can be passed with.
///
/// Bridges generic caller code to the two object-safe entry points of
/// the trait.
pub trait TrackScalar: symkick_core::Scalar {
    /// Dispatch to the matching `Element` method.
    fn pass_through(
        element: &dyn Element,
        config: &PassConfig,
        state: &mut PhaseSpace<Self>,
    ) -> Result<(), PassError>;
}

impl TrackScalar for f64 {
    fn pass_through(
        element: &dyn Element,
        config: &PassConfig,
        state: &mut PhaseSpace<f64>,
    ) -> Result<(), PassError> {
        element.pass(config, state)
    }
}

impl TrackScalar for Tps {
    fn pass_through(
        element: &dyn Element,
        config: &PassConfig,
        state: &mut PhaseSpace<Tps>,
    ) -> Result<(), PassError> {
        element.pass_map(config, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symkick_core::{Scalar, TpsDescriptor};

    /// Shifts `x` by a fixed offset.
    #[derive(Debug)]
    struct Offset {
        dx: f64,
    }

    impl Offset {
        fn apply<T: Scalar>(&self, state: &mut PhaseSpace<T>) {
            state.x += self.dx;
        }
    }

    impl Element for Offset {
        fn name(&self) -> &str {
            "offset"
        }

        fn length(&self) -> f64 {
            0.0
        }

        fn pass(&self, _: &PassConfig, state: &mut PhaseSpace<f64>) -> Result<(), PassError> {
            self.apply(state);
            Ok(())
        }

        fn pass_map(&self, _: &PassConfig, state: &mut PhaseSpace<Tps>) -> Result<(), PassError> {
            self.apply(state);
            Ok(())
        }
    }

    fn track<T: TrackScalar>(line: &[Box<dyn Element>], state: &mut PhaseSpace<T>) {
        let config = PassConfig::default();
        for e in line {
            T::pass_through(e.as_ref(), &config, state).unwrap();
        }
    }

    #[test]
    fn object_safe_line_tracks_both_kinds() {
        let line: Vec<Box<dyn Element>> =
            vec![Box::new(Offset { dx: 1.0 }), Box::new(Offset { dx: 0.5 })];

        let mut ps = PhaseSpace::<f64>::zeros();
        track(&line, &mut ps);
        assert_eq!(ps.x, 1.5);

        let desc = TpsDescriptor::new(1).unwrap();
        let mut map = PhaseSpace::identity(&desc);
        track(&line, &mut map);
        assert_eq!(map.x.value(), 1.5);
        assert_eq!(map.jacobian()[0][0], 1.0);
    }

    #[test]
    fn default_is_not_reversed() {
        let e = Offset { dx: 0.0 };
        assert!(!e.is_reversed());
        assert_eq!(e.name(), "offset");
        assert_eq!(e.length(), 0.0);
    }
}
