//! Element pass contract and tracking kernels.
//!
//! The [`Element`] trait is the single operation every lattice element
//! exposes. The kernel modules hold the pure, scalar-generic building
//! blocks elements are composed from:
//!
//! - [`drift`](mod@drift): longitudinal momentum and field-free propagation
//! - [`kick`]: the thin multipole kick
//! - [`edge`]: dipole edge focusing and Cartesian-bend frame rotation
//! - [`fringe`]: vertical bend fringe and quadrupole fringe corrections
//! - [`integrator`]: integration method selection and 4th-order
//!   composition coefficients
//! - [`matrix`]: the linear transport matrix shortcut

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod drift;
pub mod edge;
pub mod element;
pub mod fringe;
pub mod integrator;
pub mod interpolation;
pub mod kick;
pub mod matrix;

pub use drift::{drift, longitudinal_momentum};
pub use edge::{bend_rotate, edge_focus, gap_correction};
pub use element::{Element, TrackScalar};
pub use fringe::{bend_fringe, quad_fringe};
pub use integrator::{IntegrationMethod, SubStep, Yoshida4};
pub use interpolation::FieldInterpolation;
pub use kick::thin_kick;
pub use matrix::TransportMatrix;
