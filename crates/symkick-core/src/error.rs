//! Error types for element construction and tracking.
//!
//! Split by when the failure can occur: [`ConfigError`] while an element
//! is being configured, [`PassError`] while a state is being tracked.

use std::error::Error;
use std::fmt;

/// Errors detected while building or reconfiguring an element.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The requested integration method is not implemented.
    UnsupportedMethod {
        /// The rejected method code.
        method: i64,
    },
    /// A numeric or structural parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A configuration record entry holds the wrong kind of value.
    WrongValueKind {
        /// The record key.
        key: String,
        /// The kind that was expected.
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMethod { method } => {
                write!(f, "integration method {method} is not supported")
            }
            Self::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
            Self::WrongValueKind { key, expected } => {
                write!(f, "config key '{key}' must hold a {expected}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors that abort a single pass through an element.
///
/// Neither kind is retried. After either error the state vector must not
/// be inspected; when the bend fringe detects a superluminal solution it
/// overwrites every component with NaN before returning
/// [`PhysicsViolation`](Self::PhysicsViolation).
#[derive(Clone, Debug, PartialEq)]
pub enum PassError {
    /// The element's integration method is not implemented.
    UnsupportedMethod {
        /// The offending method code.
        method: i64,
    },
    /// A physically inadmissible intermediate result, e.g. a solution
    /// requiring a longitudinal velocity above the speed of light.
    PhysicsViolation {
        /// Which computation failed.
        reason: String,
        /// The offending computed value.
        value: f64,
    },
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMethod { method } => {
                write!(f, "integration method {method} is not supported")
            }
            Self::PhysicsViolation { reason, value } => {
                write!(f, "physics violation: {reason} (value = {value})")
            }
        }
    }
}

impl Error for PassError {}
