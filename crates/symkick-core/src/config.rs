//! Run-time model flags and construction-time configuration records.
//!
//! [`PassConfig`] is read on every pass and selects between physical
//! models. [`ElementConfig`] is the key/value record elements are built
//! from, e.g. as produced by a lattice parser.

use indexmap::IndexMap;

use crate::error::ConfigError;

// ── PassConfig ─────────────────────────────────────────────────────

/// Model-selection flags consumed by every pass.
///
/// All flags default to `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassConfig {
    /// Use the exact Hamiltonian (square-root longitudinal momentum)
    /// instead of the paraxial expansion.
    pub exact_hamiltonian: bool,
    /// Treat bends in Cartesian rather than polar (sector) coordinates.
    pub cartesian_bend: bool,
    /// Apply the leading-order quadrupole fringe correction at both faces.
    pub quad_fringe: bool,
    /// Use the stabilised `(1 − delta)` vertical edge-focus kick instead
    /// of the exact `1/(1 + delta)` form.
    pub dipole_edge_fudge: bool,
    /// An accelerating cavity defines the reference time; enables the
    /// path-length corrections in the fringe kernels.
    pub cavity_on: bool,
    /// Accumulate synchrotron radiation integrals.
    pub emittance: bool,
    /// Use the precomputed linear transport matrix where it is valid.
    pub linear_matrix: bool,
}

impl PassConfig {
    /// Set [`exact_hamiltonian`](Self::exact_hamiltonian).
    pub fn with_exact_hamiltonian(mut self, on: bool) -> Self {
        self.exact_hamiltonian = on;
        self
    }

    /// Set [`cartesian_bend`](Self::cartesian_bend).
    pub fn with_cartesian_bend(mut self, on: bool) -> Self {
        self.cartesian_bend = on;
        self
    }

    /// Set [`quad_fringe`](Self::quad_fringe).
    pub fn with_quad_fringe(mut self, on: bool) -> Self {
        self.quad_fringe = on;
        self
    }

    /// Set [`dipole_edge_fudge`](Self::dipole_edge_fudge).
    pub fn with_dipole_edge_fudge(mut self, on: bool) -> Self {
        self.dipole_edge_fudge = on;
        self
    }

    /// Set [`cavity_on`](Self::cavity_on).
    pub fn with_cavity(mut self, on: bool) -> Self {
        self.cavity_on = on;
        self
    }

    /// Set [`emittance`](Self::emittance).
    pub fn with_emittance(mut self, on: bool) -> Self {
        self.emittance = on;
        self
    }

    /// Set [`linear_matrix`](Self::linear_matrix).
    pub fn with_linear_matrix(mut self, on: bool) -> Self {
        self.linear_matrix = on;
        self
    }

    /// Radiation integrals are only accumulated with the cavity off.
    pub fn radiation_bookkeeping(&self) -> bool {
        self.emittance && !self.cavity_on
    }
}

// ── ElementConfig ──────────────────────────────────────────────────

/// A single entry of an [`ElementConfig`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// A real number.
    Number(f64),
    /// A string, e.g. the element name.
    Text(String),
    /// A switch.
    Flag(bool),
}

impl ConfigValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<u32> for ConfigValue {
    fn from(v: u32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Insertion-ordered key/value record describing one element.
///
/// Missing keys fall back to the caller's default; present keys holding
/// the wrong kind of value are an error rather than silently ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementConfig {
    entries: IndexMap<String, ConfigValue>,
}

impl ElementConfig {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Raw entry lookup.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// `true` if the record holds `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Numeric entry, or `default` when absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::WrongValueKind`] if the entry is not a number.
    pub fn get_f64(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(ConfigValue::Number(v)) => Ok(*v),
            Some(_) => Err(self.wrong_kind(key, "number")),
        }
    }

    /// Text entry, or `default` when absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::WrongValueKind`] if the entry is not text.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, ConfigError> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(ConfigValue::Text(s)) => Ok(s.as_str()),
            Some(_) => Err(self.wrong_kind(key, "text")),
        }
    }

    /// Flag entry, or `default` when absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::WrongValueKind`] if the entry is not a flag.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.entries.get(key) {
            None => Ok(default),
            Some(ConfigValue::Flag(b)) => Ok(*b),
            Some(_) => Err(self.wrong_kind(key, "flag")),
        }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn wrong_kind(&self, key: &str, expected: &'static str) -> ConfigError {
        debug_assert!(self.entries.get(key).is_some_and(|v| v.kind() != expected));
        ConfigError::WrongValueKind {
            key: key.to_string(),
            expected,
        }
    }
}
