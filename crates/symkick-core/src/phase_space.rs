//! The canonical six-component phase-space vector.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::scalar::Scalar;
use crate::tps::{Tps, TpsDescriptor};

/// Number of canonical phase-space coordinates.
pub const PHASE_DIM: usize = 6;

/// Names the components of a [`PhaseSpace`] in their fixed order.
///
/// The discriminant is the component's position in the external layout
/// `(x, px, y, py, delta, ct)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseCoord {
    /// Horizontal position [m].
    X = 0,
    /// Horizontal canonical momentum, normalised to the reference momentum.
    Px = 1,
    /// Vertical position [m].
    Y = 2,
    /// Vertical canonical momentum, normalised to the reference momentum.
    Py = 3,
    /// Relative momentum deviation.
    Delta = 4,
    /// Path-length-like time coordinate [m].
    Ct = 5,
}

impl PhaseCoord {
    /// All coordinates in layout order.
    pub const ALL: [PhaseCoord; PHASE_DIM] = [
        PhaseCoord::X,
        PhaseCoord::Px,
        PhaseCoord::Y,
        PhaseCoord::Py,
        PhaseCoord::Delta,
        PhaseCoord::Ct,
    ];

    /// Position in the layout.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A particle state `(x, px, y, py, delta, ct)` over scalar kind `T`.
///
/// All six components always share the same `T`. With `T = f64` the vector
/// is a single trajectory; with `T = Tps` it is a truncated map from the
/// initial coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSpace<T> {
    /// Horizontal position.
    pub x: T,
    /// Horizontal canonical momentum.
    pub px: T,
    /// Vertical position.
    pub y: T,
    /// Vertical canonical momentum.
    pub py: T,
    /// Relative momentum deviation.
    pub delta: T,
    /// Time-like longitudinal coordinate.
    pub ct: T,
}

impl<T> PhaseSpace<T> {
    /// Build from components in layout order.
    pub fn from_array([x, px, y, py, delta, ct]: [T; PHASE_DIM]) -> Self {
        Self {
            x,
            px,
            y,
            py,
            delta,
            ct,
        }
    }

    /// Components in layout order.
    pub fn into_array(self) -> [T; PHASE_DIM] {
        [self.x, self.px, self.y, self.py, self.delta, self.ct]
    }

    /// Apply `f` to every component.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PhaseSpace<U> {
        PhaseSpace {
            x: f(self.x),
            px: f(self.px),
            y: f(self.y),
            py: f(self.py),
            delta: f(self.delta),
            ct: f(self.ct),
        }
    }
}

impl<T: Scalar> PhaseSpace<T> {
    /// The reference particle: all components zero.
    pub fn zeros() -> Self {
        Self::from_array(std::array::from_fn(|_| T::from(0.0)))
    }

    /// Overwrite every component with `value`.
    pub fn fill(&mut self, value: T) {
        for c in PhaseCoord::ALL {
            self[c] = value.clone();
        }
    }

    /// Constant parts of all components.
    pub fn values(&self) -> [f64; PHASE_DIM] {
        std::array::from_fn(|i| self[PhaseCoord::ALL[i]].value())
    }

    /// `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        PhaseCoord::ALL.iter().all(|&c| self[c].is_finite())
    }
}

impl PhaseSpace<Tps> {
    /// The identity map expanded around the origin.
    pub fn identity(desc: &Arc<TpsDescriptor>) -> Self {
        Self::identity_at(desc, [0.0; PHASE_DIM])
    }

    /// The identity map expanded around `orbit`.
    pub fn identity_at(desc: &Arc<TpsDescriptor>, orbit: [f64; PHASE_DIM]) -> Self {
        Self::from_array(std::array::from_fn(|i| Tps::variable(desc, i, orbit[i])))
    }

    /// First-order part of the map: `jacobian[i][j] = ∂z_i/∂z_j`.
    pub fn jacobian(&self) -> [[f64; PHASE_DIM]; PHASE_DIM] {
        std::array::from_fn(|i| self[PhaseCoord::ALL[i]].linear_part())
    }
}

impl<T> Index<PhaseCoord> for PhaseSpace<T> {
    type Output = T;

    fn index(&self, c: PhaseCoord) -> &T {
        match c {
            PhaseCoord::X => &self.x,
            PhaseCoord::Px => &self.px,
            PhaseCoord::Y => &self.y,
            PhaseCoord::Py => &self.py,
            PhaseCoord::Delta => &self.delta,
            PhaseCoord::Ct => &self.ct,
        }
    }
}

impl<T> IndexMut<PhaseCoord> for PhaseSpace<T> {
    fn index_mut(&mut self, c: PhaseCoord) -> &mut T {
        match c {
            PhaseCoord::X => &mut self.x,
            PhaseCoord::Px => &mut self.px,
            PhaseCoord::Y => &mut self.y,
            PhaseCoord::Py => &mut self.py,
            PhaseCoord::Delta => &mut self.delta,
            PhaseCoord::Ct => &mut self.ct,
        }
    }
}

impl<T: Scalar> Default for PhaseSpace<T> {
    fn default() -> Self {
        Self::zeros()
    }
}
