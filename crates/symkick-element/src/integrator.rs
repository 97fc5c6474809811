//! Integration method selection and the 4th-order composition.

use std::fmt;

use symkick_core::ConfigError;

/// Integration method of a sliced element body.
///
/// The discriminant is the code used in element configuration records.
/// Only [`Fourth`](Self::Fourth) has an implementation; the others are
/// named so that configurations asking for them can be rejected with a
/// precise error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IntegrationMethod {
    /// Linear transfer matrix.
    Linear = 0,
    /// First-order (Euler) splitting.
    First = 1,
    /// Second-order leapfrog splitting.
    Second = 2,
    /// Fourth-order symmetric composition.
    #[default]
    Fourth = 4,
}

impl IntegrationMethod {
    /// Look up a method by configuration code.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedMethod`] for a code naming no method.
    pub fn from_code(code: i64) -> Result<Self, ConfigError> {
        match code {
            0 => Ok(Self::Linear),
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            4 => Ok(Self::Fourth),
            _ => Err(ConfigError::UnsupportedMethod { method: code }),
        }
    }

    /// Configuration code of this method.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// `true` if elements can integrate with this method.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Fourth)
    }

    /// Return `self` if supported.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedMethod`] otherwise.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(ConfigError::UnsupportedMethod { method: self.code() })
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::First => "first order",
            Self::Second => "second order",
            Self::Fourth => "fourth order",
        };
        write!(f, "{name}")
    }
}

/// One sub-step of a composed slice, with its length (drift) or weight
/// (kick) already scaled by the slice length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SubStep {
    /// Field-free propagation over the given length.
    Drift(f64),
    /// Thin kick with the given weight.
    Kick(f64),
}

/// Coefficients of the symmetric 4th-order (Forest–Ruth/Yoshida)
/// drift–kick composition.
///
/// One slice of length `dL` runs
///
/// ```text
///   D(a₁) K(b₁) D(a₂) K(b₂) D(a₂) K(b₁) D(a₁)
/// ```
///
/// with `a₁ = 1/(2(2 − ∛2))`, `a₂ = 1/2 − a₁`, `b₁ = 2a₁`, `b₂ = 1 − 2b₁`,
/// so that `2a₁ + 2a₂ = 1` and `2b₁ + b₂ = 1`. `a₂` and `b₂` are negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Yoshida4 {
    /// Outer drift coefficient `a₁`.
    pub drift_outer: f64,
    /// Inner drift coefficient `a₂` (negative).
    pub drift_inner: f64,
    /// Outer kick coefficient `b₁`.
    pub kick_outer: f64,
    /// Central kick coefficient `b₂` (negative).
    pub kick_inner: f64,
}

impl Yoshida4 {
    /// The standard coefficient set.
    pub fn new() -> Self {
        let drift_outer = 1.0 / (2.0 * (2.0 - 2f64.cbrt()));
        let kick_outer = 2.0 * drift_outer;
        Self {
            drift_outer,
            drift_inner: 0.5 - drift_outer,
            kick_outer,
            kick_inner: 1.0 - 2.0 * kick_outer,
        }
    }

    /// The seven sub-steps of one slice of length `slice_length`.
    pub fn slice(&self, slice_length: f64) -> [SubStep; 7] {
        let drift = |c: f64| SubStep::Drift(c * slice_length);
        let kick = |c: f64| SubStep::Kick(c * slice_length);
        [
            drift(self.drift_outer),
            kick(self.kick_outer),
            drift(self.drift_inner),
            kick(self.kick_inner),
            drift(self.drift_inner),
            kick(self.kick_outer),
            drift(self.drift_outer),
        ]
    }
}

impl Default for Yoshida4 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── method codes ────────────────────────────────────────────

    #[test]
    fn codes_round_trip() {
        for m in [
            IntegrationMethod::Linear,
            IntegrationMethod::First,
            IntegrationMethod::Second,
            IntegrationMethod::Fourth,
        ] {
            assert_eq!(IntegrationMethod::from_code(m.code()).unwrap(), m);
        }
    }

    #[test]
    fn unknown_code_rejected() {
        for code in [-1, 3, 5, 42] {
            assert_eq!(
                IntegrationMethod::from_code(code),
                Err(ConfigError::UnsupportedMethod { method: code })
            );
        }
    }

    #[test]
    fn only_fourth_order_validates() {
        assert!(IntegrationMethod::Fourth.validate().is_ok());
        assert_eq!(IntegrationMethod::default(), IntegrationMethod::Fourth);
        for m in [
            IntegrationMethod::Linear,
            IntegrationMethod::First,
            IntegrationMethod::Second,
        ] {
            assert_eq!(
                m.validate(),
                Err(ConfigError::UnsupportedMethod { method: m.code() })
            );
        }
    }

    // ── coefficients ────────────────────────────────────────────

    #[test]
    fn coefficients_sum_to_one() {
        let c = Yoshida4::new();
        assert!((2.0 * c.drift_outer + 2.0 * c.drift_inner - 1.0).abs() < 1e-15);
        assert!((2.0 * c.kick_outer + c.kick_inner - 1.0).abs() < 1e-15);
        assert!(c.drift_inner < 0.0);
        assert!(c.kick_inner < 0.0);
    }

    #[test]
    fn coefficient_values() {
        let c = Yoshida4::new();
        assert!((c.drift_outer - 0.675_603_595_979_828_8).abs() < 1e-15);
        assert!((c.kick_inner + 1.702_414_383_919_315_3).abs() < 1e-14);
    }

    #[test]
    fn slice_is_symmetric_and_complete() {
        let steps = Yoshida4::new().slice(0.2);
        for i in 0..3 {
            assert_eq!(steps[i], steps[6 - i]);
        }
        let (mut drift, mut kick) = (0.0, 0.0);
        for s in steps {
            match s {
                SubStep::Drift(l) => drift += l,
                SubStep::Kick(w) => kick += w,
            }
        }
        assert!((drift - 0.2).abs() < 1e-15);
        assert!((kick - 0.2).abs() < 1e-15);
    }

    #[test]
    fn middle_kick_is_negative() {
        let steps = Yoshida4::new().slice(0.5);
        assert!(matches!(steps[3], SubStep::Kick(w) if w < 0.0));
        assert!(matches!(steps[2], SubStep::Drift(l) if l < 0.0));
        assert!(matches!(steps[1], SubStep::Kick(w) if w > 0.5));
    }
}
