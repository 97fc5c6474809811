//! The field-kick element: a magnet body integrated by symplectic
//! drift–kick slicing between two pole faces.
//!
//! A pass runs
//!
//! ```text
//! quad fringe (+b2)
//! entrance face      polar: edge focus      Cartesian: rotate, bend fringe
//! body               thick: PN slices of the 4th-order composition
//!                    thin:  one kick
//! exit face          polar: edge focus      Cartesian: bend fringe (−h), rotate
//! quad fringe (−b2)
//! ```
//!
//! unless the linear shortcut applies, in which case the precomputed
//! [`TransportMatrix`] replaces all of it.
//!
//! Constructed via the builder pattern: [`FieldKick::builder`], or from an
//! [`ElementConfig`] record with [`FieldKick::from_config`].

use std::fmt;
use std::sync::Arc;

use symkick_core::{
    ConfigError, ElementConfig, PassConfig, PassError, PhaseSpace, Scalar, Tps, TpsDescriptor,
};
use symkick_element::{
    bend_fringe, bend_rotate, drift, edge_focus, quad_fringe, thin_kick, Element,
    FieldInterpolation, IntegrationMethod, SubStep, TransportMatrix, Yoshida4,
};
use tracing::{debug, trace};

use crate::multipoles::QUADRUPOLE;
use crate::radiation::{BodySamples, SynchrotronIntegrals};

/// A magnet element tracked by kicks from a [`FieldInterpolation`].
///
/// Geometry: length `PL` [m], curvature `h` [1/m], entrance and exit
/// pole-face angles [degrees] and full gap [m]. The body is cut into `PN`
/// slices, each integrated with the symmetric 4th-order composition.
///
/// # Integral representation
///
/// When the field values are already integrated over the length, the
/// element is *integral*: thin kicks apply them with unit weight, and a
/// thick body spreads them evenly over `PL`. Setting the length to zero
/// switches integral representation on; nothing switches it off except
/// [`as_integral(false)`](Self::as_integral).
///
/// # Sharing
///
/// Passing takes `&self`; one element may serve many threads.
///
/// # Linear shortcut
///
/// The linear transport matrix is cached. [`build`](FieldKickBuilder::build)
/// computes it for the default [`PassConfig`]; every geometry setter marks
/// it stale, and a stale matrix is never applied: the pass takes the full
/// path until [`update_transport_matrix`](Self::update_transport_matrix)
/// is called again.
#[derive(Debug)]
pub struct FieldKick<I> {
    name: String,
    length: f64,
    reversed: bool,
    curvature: f64,
    entrance_angle: f64,
    exit_angle: f64,
    gap: f64,
    method: IntegrationMethod,
    order: usize,
    slices: usize,
    thick: bool,
    integral: bool,
    coefficients: Yoshida4,
    /// `None` while stale.
    transport: Option<TransportMatrix>,
    field: Arc<I>,
}

/// Builder for [`FieldKick`].
///
/// Only the field interpolation is required. The length defaults to zero
/// (a thin, integral element), the method to 4th order and the slice
/// count to one.
#[derive(Debug)]
pub struct FieldKickBuilder<I> {
    field: Arc<I>,
    name: String,
    length: f64,
    reversed: bool,
    curvature: f64,
    entrance_angle: f64,
    exit_angle: f64,
    gap: f64,
    method: IntegrationMethod,
    order: Option<usize>,
    slices: usize,
    thick: Option<bool>,
    integral: bool,
}

/// The interpolated field scaled by a constant factor.
#[derive(Debug)]
struct ScaledField<'a, I> {
    inner: &'a I,
    factor: f64,
}

impl<I: FieldInterpolation> FieldInterpolation for ScaledField<'_, I> {
    fn field<T: Scalar>(&self, x: &T, y: &T) -> (T, T) {
        let (bx, by) = self.inner.field(x, y);
        if self.factor == 1.0 {
            (bx, by)
        } else {
            (bx * self.factor, by * self.factor)
        }
    }

    fn highest_order(&self) -> usize {
        self.inner.highest_order()
    }

    fn normal(&self, n: usize) -> f64 {
        self.inner.normal(n) * self.factor
    }

    fn skew(&self, n: usize) -> f64 {
        self.inner.skew(n) * self.factor
    }
}

fn require_finite(name: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn require_length(length: f64) -> Result<f64, ConfigError> {
    if !(length >= 0.0) || !length.is_finite() {
        return Err(ConfigError::InvalidParameter {
            name: "length".to_string(),
            reason: format!("must be finite and >= 0, got {length}"),
        });
    }
    Ok(length)
}

fn require_slices(slices: usize) -> Result<usize, ConfigError> {
    if slices == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "slices".to_string(),
            reason: "must be >= 1".to_string(),
        });
    }
    Ok(slices)
}

/// A configuration number that must be whole.
fn whole_number(name: &str, value: f64) -> Result<i64, ConfigError> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(ConfigError::InvalidParameter {
            name: name.to_string(),
            reason: format!("must be a whole number, got {value}"),
        });
    }
    Ok(value as i64)
}

impl<I: FieldInterpolation> FieldKick<I> {
    /// Create a builder around the body field `field`.
    pub fn builder(field: Arc<I>) -> FieldKickBuilder<I> {
        FieldKickBuilder {
            field,
            name: "FieldKick".to_string(),
            length: 0.0,
            reversed: false,
            curvature: 0.0,
            entrance_angle: 0.0,
            exit_angle: 0.0,
            gap: 0.0,
            method: IntegrationMethod::Fourth,
            order: None,
            slices: 1,
            thick: None,
            integral: false,
        }
    }

    /// Build from a configuration record.
    ///
    /// Recognised keys: `"name"` (text), `"length"` (number, default 0),
    /// `"method"` (number, default 4) and `"slices"` (number, default 1).
    /// A non-zero length makes the element thick.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedMethod`] for any method but 4th order,
    /// [`ConfigError::WrongValueKind`] for mistyped entries and
    /// [`ConfigError::InvalidParameter`] for out-of-range numbers.
    pub fn from_config(config: &ElementConfig, field: Arc<I>) -> Result<Self, ConfigError> {
        let name = config.get_str("name", "FieldKick")?;
        let length = config.get_f64("length", 0.0)?;
        let method = whole_number("method", config.get_f64("method", 4.0)?)?;
        let slices = whole_number("slices", config.get_f64("slices", 1.0)?)?;
        if slices < 1 {
            return Err(ConfigError::InvalidParameter {
                name: "slices".to_string(),
                reason: format!("must be >= 1, got {slices}"),
            });
        }

        Self::builder(field)
            .name(name)
            .length(length)
            .method(IntegrationMethod::from_code(method)?)
            .slices(slices as usize)
            .build()
    }

    /// Selected integration method.
    pub fn integration_method(&self) -> IntegrationMethod {
        self.method
    }

    /// Select the integration method.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedMethod`] for any method but
    /// [`IntegrationMethod::Fourth`]; the current method is kept.
    pub fn set_integration_method(&mut self, method: IntegrationMethod) -> Result<(), ConfigError> {
        self.method = method.validate()?;
        Ok(())
    }

    /// Set the length. A zero length switches integral representation on.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] for a negative or non-finite
    /// length; nothing changes.
    pub fn set_length(&mut self, length: f64) -> Result<(), ConfigError> {
        self.length = require_length(length)?;
        if length == 0.0 {
            self.integral = true;
        }
        self.transport = None;
        Ok(())
    }

    /// Set the number of body slices.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] for zero slices.
    pub fn set_slices(&mut self, slices: usize) -> Result<(), ConfigError> {
        self.slices = require_slices(slices)?;
        self.transport = None;
        Ok(())
    }

    /// Set the reference curvature [1/m].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if `curvature` is not finite.
    pub fn set_curvature(&mut self, curvature: f64) -> Result<(), ConfigError> {
        self.curvature = require_finite("curvature", curvature)?;
        self.transport = None;
        Ok(())
    }

    /// Set the entrance and exit pole-face angles [degrees].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if either angle is not finite.
    pub fn set_edge_angles(&mut self, entrance: f64, exit: f64) -> Result<(), ConfigError> {
        let entrance = require_finite("entrance_angle", entrance)?;
        self.exit_angle = require_finite("exit_angle", exit)?;
        self.entrance_angle = entrance;
        self.transport = None;
        Ok(())
    }

    /// Set the full magnet gap [m].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if `gap` is not finite.
    pub fn set_gap(&mut self, gap: f64) -> Result<(), ConfigError> {
        self.gap = require_finite("gap", gap)?;
        self.transport = None;
        Ok(())
    }

    /// Traverse exit face first.
    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
        self.transport = None;
    }

    /// Override the highest active multipole order.
    pub fn set_order(&mut self, order: usize) {
        self.order = order;
        self.transport = None;
    }

    /// Slice the body (`true`) or apply a single kick (`false`).
    pub fn as_thick(&mut self, thick: bool) {
        self.thick = thick;
        self.transport = None;
    }

    /// `true` if the body is sliced.
    pub fn is_thick(&self) -> bool {
        self.thick
    }

    /// Declare the field values length-integrated.
    pub fn as_integral(&mut self, integral: bool) {
        self.integral = integral;
        self.transport = None;
    }

    /// `true` if the field values are length-integrated.
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Reference curvature [1/m].
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Entrance pole-face angle [degrees].
    pub fn entrance_angle(&self) -> f64 {
        self.entrance_angle
    }

    /// Exit pole-face angle [degrees].
    pub fn exit_angle(&self) -> f64 {
        self.exit_angle
    }

    /// Full gap [m].
    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Number of body slices.
    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Highest active multipole order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The body field.
    pub fn field(&self) -> &I {
        &self.field
    }

    /// The cached linear transport matrix, `None` while stale.
    pub fn transport_matrix(&self) -> Option<&TransportMatrix> {
        self.transport.as_ref()
    }

    /// Recompute the cached transport matrix by passing a first-order map
    /// through the full nonlinear path.
    ///
    /// # Errors
    ///
    /// Any [`PassError`] raised on the way; the cached matrix is left as
    /// it was.
    pub fn update_transport_matrix(&mut self, config: &PassConfig) -> Result<(), PassError> {
        let config = config.with_linear_matrix(false);
        let mut map = PhaseSpace::identity(&TpsDescriptor::first_order());
        self.propagate(&config, &mut map, None)?;
        self.transport = Some(TransportMatrix::from_map(&map));
        debug!(element = %self.name, "transport matrix updated");
        Ok(())
    }

    /// Track like [`Element::pass`], accumulating radiation integrals when
    /// `config` enables bookkeeping (emittance on, cavity off).
    ///
    /// Only thick bodies contribute. On error the integrals are left
    /// untouched.
    pub fn pass_with_radiation<T: Scalar>(
        &self,
        config: &PassConfig,
        state: &mut PhaseSpace<T>,
        integrals: &mut SynchrotronIntegrals,
    ) -> Result<(), PassError> {
        self.propagate(config, state, Some(integrals))
    }

    /// Factor turning the stored field into a per-metre field: `1/PL` for
    /// an integral element of non-zero length, else 1.
    fn field_factor(&self) -> f64 {
        if self.integral && self.length != 0.0 {
            1.0 / self.length
        } else {
            1.0
        }
    }

    /// `(entrance, exit)` angles in traversal order.
    fn face_angles(&self) -> (f64, f64) {
        if self.reversed {
            (self.exit_angle, self.entrance_angle)
        } else {
            (self.entrance_angle, self.exit_angle)
        }
    }

    fn propagate<T: Scalar>(
        &self,
        config: &PassConfig,
        ps: &mut PhaseSpace<T>,
        radiation: Option<&mut SynchrotronIntegrals>,
    ) -> Result<(), PassError> {
        trace!(element = %self.name, method = %self.method, "pass");
        if self.method != IntegrationMethod::Fourth {
            return Err(PassError::UnsupportedMethod {
                method: self.method.code(),
            });
        }

        if config.linear_matrix && self.order <= QUADRUPOLE {
            if let Some(transport) = &self.transport {
                transport.apply(ps);
                return Ok(());
            }
            trace!(element = %self.name, "transport matrix stale, full pass");
        }

        let (entrance, exit) = self.face_angles();
        let b2 = self.field.normal(QUADRUPOLE) * self.field_factor();
        let quad_fringe_on = config.quad_fringe && b2 != 0.0;

        if quad_fringe_on {
            quad_fringe(config, b2, ps);
        }
        if !config.cartesian_bend {
            if self.curvature != 0.0 {
                edge_focus(config, self.curvature, entrance, self.gap, ps);
            }
        } else {
            bend_rotate(config, entrance, ps)?;
            bend_fringe(config, self.curvature, ps)?;
        }

        if self.thick {
            self.body(config, ps, radiation)?;
        } else {
            let weight = if self.integral { 1.0 } else { self.length };
            thin_kick(self.order, self.field.as_ref(), weight, 0.0, 0.0, ps);
        }

        if !config.cartesian_bend {
            if self.curvature != 0.0 {
                edge_focus(config, self.curvature, exit, self.gap, ps);
            }
        } else {
            bend_fringe(config, -self.curvature, ps)?;
            bend_rotate(config, exit, ps)?;
        }
        if quad_fringe_on {
            quad_fringe(config, -b2, ps);
        }
        Ok(())
    }

    /// The sliced body.
    fn body<T: Scalar>(
        &self,
        config: &PassConfig,
        ps: &mut PhaseSpace<T>,
        radiation: Option<&mut SynchrotronIntegrals>,
    ) -> Result<(), PassError> {
        let h = self.curvature;
        let per_slice = self.length / self.slices as f64;
        let (step, h_ref) = if !config.cartesian_bend {
            (per_slice, h)
        } else if h == 0.0 {
            (per_slice, 0.0)
        } else {
            // chord of the arc
            (2.0 / h * (self.length * h / 2.0).sin() / self.slices as f64, 0.0)
        };

        let field = ScaledField {
            inner: self.field.as_ref(),
            factor: self.field_factor(),
        };

        let mut radiation = radiation.filter(|_| config.radiation_bookkeeping());
        let mut samples = BodySamples::default();

        let steps = self.coefficients.slice(step);
        for _ in 0..self.slices {
            if let Some(r) = radiation.as_deref() {
                r.sample(&mut samples, 1.0, ps);
            }
            for (i, sub) in steps.iter().enumerate() {
                match *sub {
                    SubStep::Drift(l) => drift(config, l, ps)?,
                    SubStep::Kick(w) => thin_kick(self.order, &field, w, h, h_ref, ps),
                }
                // centre of the slice
                if i == 3 {
                    if let Some(r) = radiation.as_deref() {
                        r.sample(&mut samples, 4.0, ps);
                    }
                }
            }
            if let Some(r) = radiation.as_deref() {
                r.sample(&mut samples, 1.0, ps);
            }
        }

        if let Some(r) = radiation.as_deref_mut() {
            let b2 = field.normal(QUADRUPOLE);
            r.add_body(&samples, self.length, self.slices, h, b2, ps.x.value());
        }
        Ok(())
    }
}

impl<I> FieldKickBuilder<I> {
    /// Element name (default `"FieldKick"`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Length [m] (default 0). Must be finite and >= 0.
    pub fn length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Traverse exit face first (default `false`).
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Reference curvature [1/m] (default 0).
    pub fn curvature(mut self, curvature: f64) -> Self {
        self.curvature = curvature;
        self
    }

    /// Entrance and exit pole-face angles [degrees] (default 0).
    pub fn edge_angles(mut self, entrance: f64, exit: f64) -> Self {
        self.entrance_angle = entrance;
        self.exit_angle = exit;
        self
    }

    /// Full gap [m] (default 0).
    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Integration method (default 4th order).
    pub fn method(mut self, method: IntegrationMethod) -> Self {
        self.method = method;
        self
    }

    /// Highest active multipole order (default: taken from the field).
    pub fn order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    /// Number of body slices (default 1). Must be >= 1.
    pub fn slices(mut self, slices: usize) -> Self {
        self.slices = slices;
        self
    }

    /// Slice the body (default: thick exactly when the length is non-zero).
    pub fn thick(mut self, thick: bool) -> Self {
        self.thick = Some(thick);
        self
    }

    /// Field values are length-integrated (default `false`; forced on for
    /// zero length).
    pub fn integral(mut self, integral: bool) -> Self {
        self.integral = integral;
        self
    }
}

impl<I: FieldInterpolation> FieldKickBuilder<I> {
    /// Build the element, validating all configuration.
    ///
    /// The transport matrix is computed for the default [`PassConfig`]; if
    /// that fails it starts stale and the linear shortcut is not taken.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - the method is not 4th order
    /// - `length` is negative or not finite
    /// - `slices` is zero
    /// - curvature, angles or gap are not finite
    pub fn build(self) -> Result<FieldKick<I>, ConfigError> {
        let method = self.method.validate()?;
        let length = require_length(self.length)?;
        let slices = require_slices(self.slices)?;
        let curvature = require_finite("curvature", self.curvature)?;
        let entrance_angle = require_finite("entrance_angle", self.entrance_angle)?;
        let exit_angle = require_finite("exit_angle", self.exit_angle)?;
        let gap = require_finite("gap", self.gap)?;

        let mut kick = FieldKick {
            order: self.order.unwrap_or_else(|| self.field.highest_order()),
            thick: self.thick.unwrap_or(length != 0.0),
            integral: self.integral || length == 0.0,
            name: self.name,
            length,
            reversed: self.reversed,
            curvature,
            entrance_angle,
            exit_angle,
            gap,
            method,
            slices,
            coefficients: Yoshida4::new(),
            transport: None,
            field: self.field,
        };
        debug!(
            element = %kick.name,
            length = kick.length,
            slices = kick.slices,
            order = kick.order,
            thick = kick.thick,
            integral = kick.integral,
            "field kick built"
        );
        if let Err(err) = kick.update_transport_matrix(&PassConfig::default()) {
            debug!(element = %kick.name, %err, "transport matrix left stale");
        }
        Ok(kick)
    }
}

impl<I: FieldInterpolation> Element for FieldKick<I> {
    fn name(&self) -> &str {
        &self.name
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn pass(&self, config: &PassConfig, state: &mut PhaseSpace<f64>) -> Result<(), PassError> {
        self.propagate(config, state, None)
    }

    fn pass_map(&self, config: &PassConfig, state: &mut PhaseSpace<Tps>) -> Result<(), PassError> {
        self.propagate(config, state, None)
    }
}

impl<I: FieldInterpolation> fmt::Display for FieldKick<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: FieldKick(L = {}, h = {}, angles = ({}, {}), gap = {}, {}, N = {}, \
             order = {}, thick = {}, integrated = {}{})",
            self.name,
            self.length,
            self.curvature,
            self.entrance_angle,
            self.exit_angle,
            self.gap,
            self.method,
            self.slices,
            self.order,
            self.thick,
            self.integral,
            if self.reversed { ", reversed" } else { "" }
        )
    }
}
