//! symkick: symplectic field-kick tracking for accelerator lattices.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the symkick sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use symkick::prelude::*;
//!
//! // A 0.5 m focusing quadrupole, sliced four times.
//! let field = TwoDimensionalMultipoles::new().with_normal(2, 1.2).unwrap();
//! let quad = FieldKick::builder(Arc::new(field))
//!     .name("QF")
//!     .length(0.5)
//!     .slices(4)
//!     .build()
//!     .unwrap();
//!
//! let config = PassConfig::default();
//!
//! // Track one particle.
//! let mut ps = PhaseSpace::from_array([1e-3, 0.0, 0.0, 0.0, 0.0, 0.0]);
//! quad.pass(&config, &mut ps).unwrap();
//! assert!(ps.px < 0.0);
//!
//! // Extract the linear map.
//! let desc = TpsDescriptor::new(1).unwrap();
//! let mut map = PhaseSpace::identity(&desc);
//! quad.pass_map(&config, &mut map).unwrap();
//! let m = TransportMatrix::from_map(&map);
//! assert!(m.symplectic_defect() < 1e-12);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `symkick-core` | Scalars, DA vectors, phase space, configuration, errors |
//! | [`element`] | `symkick-element` | Element trait, integration kernels, transport matrices |
//! | [`elements`] | `symkick-elements` | `FieldKick`, multipole fields, radiation integrals |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Scalars, truncated power series, phase space and configuration
/// (`symkick-core`).
pub use symkick_core as types;

/// The element trait and the integration kernels shared by elements
/// (`symkick-element`).
///
/// The kernels ([`element::drift`], [`element::thin_kick`],
/// [`element::bend_fringe`], ...) are public for building new element
/// types.
pub use symkick_element as element;

/// Concrete elements (`symkick-elements`).
pub use symkick_elements as elements;

/// Common imports for typical symkick usage.
///
/// ```rust
/// use symkick::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use symkick_core::{
        ConfigValue, ElementConfig, PassConfig, PhaseCoord, PhaseSpace, Scalar, Tps,
        TpsDescriptor, PHASE_DIM,
    };

    // Errors
    pub use symkick_core::{ConfigError, PassError};

    // Element
    pub use symkick_element::{
        Element, FieldInterpolation, IntegrationMethod, TrackScalar, TransportMatrix,
    };

    // Elements
    pub use symkick_elements::{FieldKick, SynchrotronIntegrals, TwoDimensionalMultipoles};
}
