//! Core types and traits for symplectic element tracking.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the numeric abstractions shared by every element: the [`Scalar`]
//! capability trait, the truncated power series [`Tps`] used for map
//! extraction, the canonical [`PhaseSpace`] vector, configuration flags
//! and records, and the error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod phase_space;
pub mod scalar;
pub mod tps;

pub use config::{ConfigValue, ElementConfig, PassConfig};
pub use error::{ConfigError, PassError};
pub use phase_space::{PhaseCoord, PhaseSpace, PHASE_DIM};
pub use scalar::Scalar;
pub use tps::{Tps, TpsDescriptor};
