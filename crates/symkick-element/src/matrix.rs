//! Linear transport matrix used by the fast linear pass.

use symkick_core::{PhaseCoord, PhaseSpace, Scalar, Tps, PHASE_DIM};

type Matrix = [[f64; PHASE_DIM]; PHASE_DIM];

/// Affine linear map `z ↦ M·z + orbit` over the six phase-space
/// coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportMatrix {
    linear: Matrix,
    orbit: [f64; PHASE_DIM],
}

impl TransportMatrix {
    /// The identity map.
    pub fn identity() -> Self {
        let mut linear = [[0.0; PHASE_DIM]; PHASE_DIM];
        for (i, row) in linear.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self {
            linear,
            orbit: [0.0; PHASE_DIM],
        }
    }

    /// Build from a linear part and an orbit offset.
    pub fn new(linear: Matrix, orbit: [f64; PHASE_DIM]) -> Self {
        Self { linear, orbit }
    }

    /// Truncate a map to first order: Jacobian plus constant part.
    pub fn from_map(map: &PhaseSpace<Tps>) -> Self {
        Self {
            linear: map.jacobian(),
            orbit: map.values(),
        }
    }

    /// The 6×6 linear part.
    pub fn linear(&self) -> &Matrix {
        &self.linear
    }

    /// The constant offset.
    pub fn orbit(&self) -> &[f64; PHASE_DIM] {
        &self.orbit
    }

    /// `state ← M·state + orbit`.
    pub fn apply<T: Scalar>(&self, state: &mut PhaseSpace<T>) {
        let input = state.clone();
        for (i, c) in PhaseCoord::ALL.into_iter().enumerate() {
            let mut acc = T::from(self.orbit[i]);
            for (k, ck) in PhaseCoord::ALL.into_iter().enumerate() {
                let m = self.linear[i][k];
                if m != 0.0 {
                    acc += input[ck].clone() * m;
                }
            }
            state[c] = acc;
        }
    }

    /// Determinant of the linear part (1 for a symplectic map).
    pub fn determinant(&self) -> f64 {
        let mut a = self.linear;
        let mut det = 1.0;
        for col in 0..PHASE_DIM {
            let pivot = (col..PHASE_DIM)
                .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                .unwrap_or(col);
            if a[pivot][col] == 0.0 {
                return 0.0;
            }
            if pivot != col {
                a.swap(pivot, col);
                det = -det;
            }
            det *= a[col][col];
            for row in col + 1..PHASE_DIM {
                let f = a[row][col] / a[col][col];
                for k in col..PHASE_DIM {
                    a[row][k] -= f * a[col][k];
                }
            }
        }
        det
    }

    /// Largest absolute entry of `Mᵀ·J·M − J`, where `J` is the
    /// symplectic form over the pairs `(x, px)`, `(y, py)`, `(δ, ct)`.
    pub fn symplectic_defect(&self) -> f64 {
        let j = symplectic_form();
        let m = &self.linear;
        let mut defect: f64 = 0.0;
        for r in 0..PHASE_DIM {
            for c in 0..PHASE_DIM {
                let mut s = 0.0;
                for a in 0..PHASE_DIM {
                    for b in 0..PHASE_DIM {
                        s += m[a][r] * j[a][b] * m[b][c];
                    }
                }
                defect = defect.max((s - j[r][c]).abs());
            }
        }
        defect
    }
}

impl Default for TransportMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

fn symplectic_form() -> Matrix {
    let mut j = [[0.0; PHASE_DIM]; PHASE_DIM];
    for k in (0..PHASE_DIM).step_by(2) {
        j[k][k + 1] = 1.0;
        j[k + 1][k] = -1.0;
    }
    j
}
