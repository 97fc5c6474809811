//! Truncated power series in the six phase-space variables.
//!
//! A [`Tps`] carries a value plus all partial derivatives up to a fixed
//! order with respect to `(x, px, y, py, delta, ct)`, stored as Taylor
//! coefficients over a graded monomial basis. Tracking a
//! [`PhaseSpace<Tps>`](crate::PhaseSpace) initialised to the identity map
//! through an element yields the element's transfer map truncated at that
//! order.
//!
//! The basis, the exponent lookup and the multiplication table are built
//! once per order in a [`TpsDescriptor`] and shared by reference count.
//! A constant may be created without a descriptor (this is what
//! `Tps::from(1.0)` does); it is promoted when combined with a full series.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::{smallvec, SmallVec};

use crate::error::ConfigError;
use crate::phase_space::PHASE_DIM;
use crate::scalar::Scalar;

/// Exponents of one monomial, one entry per phase-space variable.
pub type Exponents = [u8; PHASE_DIM];

/// Inline storage covers a first-order series (1 + 6 coefficients).
type Coeffs = SmallVec<[f64; 1 + PHASE_DIM]>;

/// Monomial basis and multiplication table for one truncation order.
#[derive(Debug)]
pub struct TpsDescriptor {
    order: u32,
    monomials: Vec<Exponents>,
    index: IndexMap<Exponents, usize>,
    /// `(i, j, k)`: monomial `i` times monomial `j` is monomial `k`.
    mul_table: Vec<(usize, usize, usize)>,
}

impl TpsDescriptor {
    /// Highest supported truncation order.
    pub const MAX_ORDER: u32 = 8;

    /// Build the descriptor for series truncated after `order`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] if `order` is zero or
    /// exceeds [`MAX_ORDER`](Self::MAX_ORDER).
    pub fn new(order: u32) -> Result<Arc<Self>, ConfigError> {
        if order == 0 || order > Self::MAX_ORDER {
            return Err(ConfigError::InvalidParameter {
                name: "order".to_string(),
                reason: format!("must be in 1..={}, got {order}", Self::MAX_ORDER),
            });
        }
        Ok(Arc::new(Self::build(order)))
    }

    /// Descriptor for linear maps. Always valid.
    pub fn first_order() -> Arc<Self> {
        Arc::new(Self::build(1))
    }

    fn build(order: u32) -> Self {
        let mut monomials = Vec::new();
        for degree in 0..=order {
            let mut current = [0u8; PHASE_DIM];
            push_monomials(0, degree as u8, &mut current, &mut monomials);
        }

        let index: IndexMap<Exponents, usize> = monomials
            .iter()
            .enumerate()
            .map(|(i, e)| (*e, i))
            .collect();

        let mut mul_table = Vec::new();
        for (i, a) in monomials.iter().enumerate() {
            for (j, b) in monomials.iter().enumerate() {
                if degree(a) + degree(b) > order {
                    continue;
                }
                let mut sum = [0u8; PHASE_DIM];
                for v in 0..PHASE_DIM {
                    sum[v] = a[v] + b[v];
                }
                mul_table.push((i, j, index[&sum]));
            }
        }

        Self {
            order,
            monomials,
            index,
            mul_table,
        }
    }

    /// Truncation order.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Number of coefficients in a full series.
    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    /// Always `false`: the basis contains at least the constant monomial.
    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    /// Position of a monomial in the basis, if it is within the order.
    pub fn index_of(&self, exponents: &Exponents) -> Option<usize> {
        self.index.get(exponents).copied()
    }

    /// Exponents of the monomial at `index`.
    pub fn monomial(&self, index: usize) -> Option<&Exponents> {
        self.monomials.get(index)
    }
}

fn degree(e: &Exponents) -> u32 {
    e.iter().map(|&p| p as u32).sum()
}

/// Graded order: within a degree, higher powers of earlier variables first,
/// so the first-order monomials land at indices `1..=6` in variable order.
fn push_monomials(var: usize, remaining: u8, current: &mut Exponents, out: &mut Vec<Exponents>) {
    if var == PHASE_DIM - 1 {
        current[var] = remaining;
        out.push(*current);
        return;
    }
    for e in (0..=remaining).rev() {
        current[var] = e;
        push_monomials(var + 1, remaining - e, current, out);
    }
    current[var] = 0;
}

/// A truncated power series over the phase-space variables.
#[derive(Clone)]
pub struct Tps {
    desc: Option<Arc<TpsDescriptor>>,
    coeffs: Coeffs,
}

impl Tps {
    /// A constant series with no descriptor attached.
    pub fn constant(value: f64) -> Self {
        Self {
            desc: None,
            coeffs: smallvec![value],
        }
    }

    /// The zero series of the descriptor's order.
    pub fn zero(desc: &Arc<TpsDescriptor>) -> Self {
        Self {
            desc: Some(Arc::clone(desc)),
            coeffs: smallvec![0.0; desc.len()],
        }
    }

    /// `value + dv_var`: the independent variable `var` expanded around `value`.
    ///
    /// # Panics
    ///
    /// Panics if `var >= 6`.
    pub fn variable(desc: &Arc<TpsDescriptor>, var: usize, value: f64) -> Self {
        assert!(var < PHASE_DIM, "phase-space variable index {var} out of range");
        let mut t = Self::zero(desc);
        t.coeffs[0] = value;
        t.coeffs[1 + var] = 1.0;
        t
    }

    /// The descriptor, or `None` for a bare constant.
    pub fn descriptor(&self) -> Option<&Arc<TpsDescriptor>> {
        self.desc.as_ref()
    }

    /// Coefficient of the monomial with the given exponents.
    ///
    /// Returns 0 for monomials beyond the truncation order.
    pub fn coefficient(&self, exponents: &Exponents) -> f64 {
        match &self.desc {
            None => {
                if exponents.iter().all(|&e| e == 0) {
                    self.coeffs[0]
                } else {
                    0.0
                }
            }
            Some(d) => d.index_of(exponents).map_or(0.0, |i| self.coeffs[i]),
        }
    }

    /// First-order coefficients, i.e. the gradient at the expansion point.
    pub fn linear_part(&self) -> [f64; PHASE_DIM] {
        let mut out = [0.0; PHASE_DIM];
        if self.desc.is_some() {
            out.copy_from_slice(&self.coeffs[1..=PHASE_DIM]);
        }
        out
    }

    /// Truncation order, 0 for a bare constant.
    pub fn order(&self) -> u32 {
        self.desc.as_ref().map_or(0, |d| d.order())
    }

    fn shared_descriptor(&self, other: &Tps) -> Arc<TpsDescriptor> {
        match (&self.desc, &other.desc) {
            (Some(a), Some(b)) => {
                assert!(
                    Arc::ptr_eq(a, b) || a.order() == b.order(),
                    "cannot combine power series of order {} and {}",
                    a.order(),
                    b.order()
                );
                Arc::clone(a)
            }
            (Some(d), None) | (None, Some(d)) => Arc::clone(d),
            (None, None) => unreachable!("shared_descriptor called on two constants"),
        }
    }

    fn scaled(mut self, factor: f64) -> Self {
        for c in self.coeffs.iter_mut() {
            *c *= factor;
        }
        self
    }

    fn add_signed(mut self, rhs: &Tps, sign: f64) -> Self {
        if rhs.desc.is_none() {
            self.coeffs[0] += sign * rhs.coeffs[0];
            return self;
        }
        if self.desc.is_none() {
            let c = self.coeffs[0];
            let mut out = rhs.clone().scaled(sign);
            out.coeffs[0] += c;
            return out;
        }
        self.shared_descriptor(rhs);
        for (l, r) in self.coeffs.iter_mut().zip(rhs.coeffs.iter()) {
            *l += sign * r;
        }
        self
    }

    fn mul_series(&self, rhs: &Tps) -> Self {
        if rhs.desc.is_none() {
            return self.clone().scaled(rhs.coeffs[0]);
        }
        if self.desc.is_none() {
            return rhs.clone().scaled(self.coeffs[0]);
        }
        let desc = self.shared_descriptor(rhs);
        let mut out: Coeffs = smallvec![0.0; desc.len()];
        for &(i, j, k) in &desc.mul_table {
            let a = self.coeffs[i];
            if a != 0.0 {
                out[k] += a * rhs.coeffs[j];
            }
        }
        Self {
            desc: Some(desc),
            coeffs: out,
        }
    }

    /// Evaluate `Σ taylor[k] · h^k` with `h = self − value()`.
    ///
    /// `taylor` holds the Taylor coefficients of the outer function at the
    /// constant part; entries beyond the truncation order are ignored.
    fn compose(&self, taylor: &[f64]) -> Self {
        let Some(desc) = &self.desc else {
            return Self::constant(taylor[0]);
        };
        let order = desc.order() as usize;
        let mut h = self.clone();
        h.coeffs[0] = 0.0;
        let mut result = Self::constant(taylor[order]);
        for k in (0..order).rev() {
            result = result.mul_series(&h);
            result.coeffs[0] += taylor[k];
        }
        result
    }

    fn series_len(&self) -> usize {
        self.order() as usize + 1
    }

    /// Multiplicative inverse.
    pub fn recip(&self) -> Self {
        let a0 = self.value();
        let mut taylor = vec![1.0 / a0; self.series_len()];
        for k in 1..taylor.len() {
            taylor[k] = -taylor[k - 1] / a0;
        }
        self.compose(&taylor)
    }
}

impl fmt::Debug for Tps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tps")
            .field("order", &self.order())
            .field("coeffs", &self.coeffs.as_slice())
            .finish()
    }
}

impl fmt::Display for Tps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(desc) = &self.desc else {
            return write!(f, "{}", self.coeffs[0]);
        };
        write!(f, "{}", self.coeffs[0])?;
        for (i, c) in self.coeffs.iter().enumerate().skip(1) {
            if *c == 0.0 {
                continue;
            }
            write!(f, " {:+e}·{:?}", c, desc.monomials[i])?;
        }
        Ok(())
    }
}

impl From<f64> for Tps {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl Scalar for Tps {
    fn value(&self) -> f64 {
        self.coeffs[0]
    }

    fn sqrt(&self) -> Self {
        let a0 = self.value();
        let mut taylor = vec![a0.sqrt(); self.series_len()];
        for k in 1..taylor.len() {
            let kf = k as f64;
            taylor[k] = taylor[k - 1] * (1.5 - kf) / (kf * a0);
        }
        self.compose(&taylor)
    }

    fn exp(&self) -> Self {
        let a0 = self.value();
        let mut taylor = vec![a0.exp(); self.series_len()];
        for k in 1..taylor.len() {
            taylor[k] = taylor[k - 1] / k as f64;
        }
        self.compose(&taylor)
    }

    fn sin(&self) -> Self {
        let a0 = self.value();
        let cycle = [a0.sin(), a0.cos(), -a0.sin(), -a0.cos()];
        self.compose(&trig_taylor(cycle, self.series_len()))
    }

    fn cos(&self) -> Self {
        let a0 = self.value();
        let cycle = [a0.cos(), -a0.sin(), -a0.cos(), a0.sin()];
        self.compose(&trig_taylor(cycle, self.series_len()))
    }

    fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }
}

/// Taylor coefficients `d_k / k!` for a function whose derivatives cycle with period 4.
fn trig_taylor(cycle: [f64; 4], len: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(len);
    let mut factorial = 1.0;
    for k in 0..len {
        if k > 0 {
            factorial *= k as f64;
        }
        out.push(cycle[k % 4] / factorial);
    }
    out
}

// ── operator impls ──────────────────────────────────────────────

impl Add for Tps {
    type Output = Tps;
    fn add(self, rhs: Tps) -> Tps {
        self.add_signed(&rhs, 1.0)
    }
}

impl Sub for Tps {
    type Output = Tps;
    fn sub(self, rhs: Tps) -> Tps {
        self.add_signed(&rhs, -1.0)
    }
}

impl Mul for Tps {
    type Output = Tps;
    fn mul(self, rhs: Tps) -> Tps {
        self.mul_series(&rhs)
    }
}

impl Div for Tps {
    type Output = Tps;
    fn div(self, rhs: Tps) -> Tps {
        if rhs.desc.is_none() {
            return self.scaled(1.0 / rhs.coeffs[0]);
        }
        self.mul_series(&rhs.recip())
    }
}

impl Neg for Tps {
    type Output = Tps;
    fn neg(self) -> Tps {
        self.scaled(-1.0)
    }
}

impl Add<f64> for Tps {
    type Output = Tps;
    fn add(mut self, rhs: f64) -> Tps {
        self.coeffs[0] += rhs;
        self
    }
}

impl Sub<f64> for Tps {
    type Output = Tps;
    fn sub(mut self, rhs: f64) -> Tps {
        self.coeffs[0] -= rhs;
        self
    }
}

impl Mul<f64> for Tps {
    type Output = Tps;
    fn mul(self, rhs: f64) -> Tps {
        self.scaled(rhs)
    }
}

impl Div<f64> for Tps {
    type Output = Tps;
    fn div(self, rhs: f64) -> Tps {
        self.scaled(1.0 / rhs)
    }
}

impl Add<Tps> for f64 {
    type Output = Tps;
    fn add(self, rhs: Tps) -> Tps {
        rhs + self
    }
}

impl Sub<Tps> for f64 {
    type Output = Tps;
    fn sub(self, rhs: Tps) -> Tps {
        -rhs + self
    }
}

impl Mul<Tps> for f64 {
    type Output = Tps;
    fn mul(self, rhs: Tps) -> Tps {
        rhs.scaled(self)
    }
}

impl Div<Tps> for f64 {
    type Output = Tps;
    fn div(self, rhs: Tps) -> Tps {
        rhs.recip().scaled(self)
    }
}

macro_rules! assign_via_binop {
    ($trait:ident, $method:ident, $op:tt, $rhs:ty) => {
        impl $trait<$rhs> for Tps {
            fn $method(&mut self, rhs: $rhs) {
                let lhs = std::mem::replace(self, Tps::constant(0.0));
                *self = lhs $op rhs;
            }
        }
    };
}

assign_via_binop!(AddAssign, add_assign, +, Tps);
assign_via_binop!(SubAssign, sub_assign, -, Tps);
assign_via_binop!(MulAssign, mul_assign, *, Tps);
assign_via_binop!(DivAssign, div_assign, /, Tps);
assign_via_binop!(AddAssign, add_assign, +, f64);
assign_via_binop!(SubAssign, sub_assign, -, f64);
assign_via_binop!(MulAssign, mul_assign, *, f64);
assign_via_binop!(DivAssign, div_assign, /, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn desc(order: u32) -> Arc<TpsDescriptor> {
        TpsDescriptor::new(order).unwrap()
    }

    const X: Exponents = [1, 0, 0, 0, 0, 0];
    const XX: Exponents = [2, 0, 0, 0, 0, 0];
    const XY: Exponents = [1, 0, 1, 0, 0, 0];
    const XXX: Exponents = [3, 0, 0, 0, 0, 0];

    // ── descriptor ──────────────────────────────────────────────

    #[test]
    fn basis_sizes_match_binomials() {
        // C(6 + n, n)
        assert_eq!(desc(1).len(), 7);
        assert_eq!(desc(2).len(), 28);
        assert_eq!(desc(3).len(), 84);
    }

    #[test]
    fn first_order_monomials_follow_variable_order() {
        let d = desc(2);
        for v in 0..PHASE_DIM {
            let mut e = [0u8; PHASE_DIM];
            e[v] = 1;
            assert_eq!(d.index_of(&e), Some(1 + v));
        }
        assert_eq!(d.monomial(0), Some(&[0u8; PHASE_DIM]));
    }

    #[test]
    fn rejects_order_zero() {
        assert!(TpsDescriptor::new(0).is_err());
        assert!(TpsDescriptor::new(TpsDescriptor::MAX_ORDER + 1).is_err());
    }

    #[test]
    fn first_order_descriptor_matches_validated_one() {
        let a = TpsDescriptor::first_order();
        let b = desc(1);
        assert_eq!(a.order(), 1);
        assert_eq!(a.len(), b.len());
    }

    // ── arithmetic ──────────────────────────────────────────────

    #[test]
    fn product_truncates_at_order() {
        let d = desc(2);
        let x = Tps::variable(&d, 0, 0.0);
        let x3 = x.clone() * x.clone() * x;
        assert_eq!(x3.coefficient(&XXX), 0.0);
        assert!(x3.is_finite());
        assert!(x3.coeffs.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn product_of_variables() {
        let d = desc(3);
        let x = Tps::variable(&d, 0, 2.0);
        let y = Tps::variable(&d, 2, 3.0);
        let p = x.clone() * y;
        assert_eq!(p.value(), 6.0);
        assert_eq!(p.coefficient(&X), 3.0);
        assert_eq!(p.coefficient(&XY), 1.0);
        let sq = x.sqr();
        assert_eq!(sq.coefficient(&XX), 1.0);
        assert_eq!(sq.coefficient(&X), 4.0);
    }

    #[test]
    fn constants_promote() {
        let d = desc(1);
        let x = Tps::variable(&d, 0, 1.0);
        let s = Tps::from(2.0) + x.clone();
        assert_eq!(s.value(), 3.0);
        assert_eq!(s.coefficient(&X), 1.0);
        let m = Tps::from(2.0) * x;
        assert_eq!(m.coefficient(&X), 2.0);
    }

    #[test]
    fn reciprocal_series() {
        // 1/(1+x) = 1 - x + x^2 - x^3
        let d = desc(3);
        let x = Tps::variable(&d, 0, 0.0);
        let r = 1.0 / (x + 1.0);
        assert!((r.coefficient(&X) + 1.0).abs() < 1e-15);
        assert!((r.coefficient(&XX) - 1.0).abs() < 1e-15);
        assert!((r.coefficient(&XXX) + 1.0).abs() < 1e-15);
    }

    #[test]
    fn sqrt_series() {
        // sqrt(1+x) = 1 + x/2 - x^2/8 + x^3/16
        let d = desc(3);
        let x = Tps::variable(&d, 0, 0.0);
        let r = (x + 1.0).sqrt();
        assert!((r.value() - 1.0).abs() < 1e-15);
        assert!((r.coefficient(&X) - 0.5).abs() < 1e-15);
        assert!((r.coefficient(&XX) + 0.125).abs() < 1e-15);
        assert!((r.coefficient(&XXX) - 0.0625).abs() < 1e-15);
    }

    #[test]
    fn trig_series_at_zero() {
        let d = desc(3);
        let x = Tps::variable(&d, 0, 0.0);
        let s = x.sin();
        assert!((s.coefficient(&X) - 1.0).abs() < 1e-15);
        assert!((s.coefficient(&XXX) + 1.0 / 6.0).abs() < 1e-15);
        let c = x.cos();
        assert!((c.value() - 1.0).abs() < 1e-15);
        assert!((c.coefficient(&XX) + 0.5).abs() < 1e-15);
        let t = x.tan();
        assert!((t.coefficient(&XXX) - 1.0 / 3.0).abs() < 1e-14);
    }

    #[test]
    fn assign_ops_match_binops() {
        let d = desc(2);
        let x = Tps::variable(&d, 0, 0.5);
        let mut a = x.clone();
        a *= x.clone();
        a += 1.0;
        a -= x.clone();
        a /= 2.0;
        let b = (x.clone() * x.clone() + 1.0 - x) / 2.0;
        assert_eq!(a.coeffs, b.coeffs);
    }

    #[test]
    #[should_panic(expected = "cannot combine power series")]
    fn mixing_orders_panics() {
        let a = Tps::variable(&desc(1), 0, 0.0);
        let b = Tps::variable(&desc(2), 0, 0.0);
        let _ = a + b;
    }

    proptest! {
        #[test]
        fn constant_part_agrees_with_f64(a in 0.1f64..3.0, b in -2.0f64..2.0) {
            let d = desc(2);
            let x = Tps::variable(&d, 0, a);
            let y = Tps::variable(&d, 1, b);
            let t = (x.clone() * y.clone() + x.sqrt()) / (y.exp() + 1.0) - x.sin() * y.cos();
            let f = (a * b + a.sqrt()) / (b.exp() + 1.0) - a.sin() * b.cos();
            prop_assert!((t.value() - f).abs() < 1e-12);
        }

        #[test]
        fn first_derivative_of_exp_sin(a in -1.0f64..1.0) {
            // d/dx exp(sin x) = cos x · exp(sin x)
            let d = desc(1);
            let x = Tps::variable(&d, 0, a);
            let r = x.sin().exp();
            let expected = a.cos() * a.sin().exp();
            prop_assert!((r.linear_part()[0] - expected).abs() < 1e-12);
        }
    }
}
