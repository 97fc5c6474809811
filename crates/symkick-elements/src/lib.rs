//! Concrete lattice elements.
//!
//! - [`FieldKick`]: a magnet body between two pole faces, integrated by
//!   4th-order symplectic drift–kick slicing
//! - [`TwoDimensionalMultipoles`]: the multipole field expansion that
//!   usually backs it
//! - [`SynchrotronIntegrals`]: caller-owned radiation-integral sums filled
//!   by [`FieldKick::pass_with_radiation`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod field_kick;
pub mod multipoles;
pub mod radiation;

pub use field_kick::{FieldKick, FieldKickBuilder};
pub use multipoles::{TwoDimensionalMultipoles, MAX_MULTIPOLE_ORDER, QUADRUPOLE};
pub use radiation::SynchrotronIntegrals;
