//! Domains, codomains and the element types they range over
//!
//! A domain or codomain is nothing more than a pure membership predicate.
//! Polifunctions own their domain and codomain values and consult them before
//! and after running mapping logic.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::{PolifunctionError, PolifunctionResult};

/// Admissible inputs of a polifunction
pub trait Domain {
    /// Type of elements in this domain
    type Element;

    /// Membership test. Must be pure, total and deterministic.
    fn contains(&self, element: &Self::Element) -> bool;
}

/// Admissible outputs of a polifunction
///
/// Every [`Domain`] is also usable as a codomain.
pub trait Codomain {
    /// Type of elements in this codomain
    type Element;

    /// Membership test. Must be pure, total and deterministic.
    fn contains(&self, element: &Self::Element) -> bool;
}

impl<D: Domain> Codomain for D {
    type Element = D::Element;

    #[inline]
    fn contains(&self, element: &Self::Element) -> bool {
        Domain::contains(self, element)
    }
}

/// Real number with a total order
///
/// `f64` is neither `Eq` nor `Ord`, so it cannot live in a set. `Real`
/// orders by IEEE 754 `totalOrder` and folds `-0.0` into `0.0` on
/// construction so that equal reals compare and hash equal.
#[derive(Clone, Copy, Default)]
pub struct Real(f64);

impl Real {
    pub const ZERO: Real = Real(0.0);
    pub const ONE: Real = Real(1.0);

    #[inline]
    pub fn new(value: f64) -> Self {
        // -0.0 == 0.0 must hold under the total order
        if value == 0.0 {
            Real(0.0)
        } else {
            Real(value)
        }
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn abs(self) -> Self {
        Real::new(self.0.abs())
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        Real::new(self.0.sqrt())
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Real::new(f64::from_le_bytes(bytes))
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Real {}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Real {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Real {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Real({})", self.0)
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<f64> for Real {
    fn from(value: f64) -> Self {
        Real::new(value)
    }
}

impl From<Real> for f64 {
    fn from(value: Real) -> Self {
        value.0
    }
}

impl Add for Real {
    type Output = Real;
    fn add(self, rhs: Real) -> Real {
        Real::new(self.0 + rhs.0)
    }
}

impl Sub for Real {
    type Output = Real;
    fn sub(self, rhs: Real) -> Real {
        Real::new(self.0 - rhs.0)
    }
}

impl Mul for Real {
    type Output = Real;
    fn mul(self, rhs: Real) -> Real {
        Real::new(self.0 * rhs.0)
    }
}

impl Div for Real {
    type Output = Real;
    fn div(self, rhs: Real) -> Real {
        Real::new(self.0 / rhs.0)
    }
}

impl Neg for Real {
    type Output = Real;
    fn neg(self) -> Real {
        Real::new(-self.0)
    }
}

/// All finite reals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reals;

impl Domain for Reals {
    type Element = Real;

    fn contains(&self, element: &Real) -> bool {
        element.is_finite()
    }
}

/// Finite reals `>= 0`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NonNegativeReals;

impl Domain for NonNegativeReals {
    type Element = Real;

    fn contains(&self, element: &Real) -> bool {
        element.is_finite() && element.value() >= 0.0
    }
}

/// Finite reals in the closed range `[min, max]`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RealRange {
    min: Real,
    max: Real,
}

impl RealRange {
    /// Rejects NaN bounds and `min > max`
    pub fn new(min: Real, max: Real) -> PolifunctionResult<Self> {
        if min.value().is_nan() || max.value().is_nan() {
            return Err(PolifunctionError::computation("real range bound is NaN"));
        }
        if min > max {
            return Err(PolifunctionError::Computation(format!(
                "real range lower bound {} exceeds upper bound {}",
                min, max
            )));
        }
        Ok(RealRange { min, max })
    }

    pub fn min(&self) -> Real {
        self.min
    }

    pub fn max(&self) -> Real {
        self.max
    }
}

impl Domain for RealRange {
    type Element = Real;

    fn contains(&self, element: &Real) -> bool {
        element.is_finite() && *element >= self.min && *element <= self.max
    }
}

/// Every value of `T`
pub struct Universe<T>(PhantomData<fn() -> T>);

impl<T> Universe<T> {
    pub fn new() -> Self {
        Universe(PhantomData)
    }
}

impl<T> Default for Universe<T> {
    fn default() -> Self {
        Universe::new()
    }
}

impl<T> Clone for Universe<T> {
    fn clone(&self) -> Self {
        Universe::new()
    }
}

impl<T> Copy for Universe<T> {}

impl<T> fmt::Debug for Universe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Universe")
    }
}

impl<T> Domain for Universe<T> {
    type Element = T;

    fn contains(&self, _element: &T) -> bool {
        true
    }
}

/// Explicitly enumerated elements
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiniteSet<T: Ord>(BTreeSet<T>);

impl<T: Ord> FiniteSet<T> {
    pub fn new(elements: impl IntoIterator<Item = T>) -> Self {
        FiniteSet(elements.into_iter().collect())
    }

    pub fn elements(&self) -> &BTreeSet<T> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Ord> Domain for FiniteSet<T> {
    type Element = T;

    fn contains(&self, element: &T) -> bool {
        self.0.contains(element)
    }
}

/// Membership defined by a closure
///
/// The closure must be free of hidden mutable state; polifunctions holding a
/// predicate are only as thread-safe as the predicate itself.
pub struct Predicate<T, F> {
    test: F,
    _element: PhantomData<fn(&T)>,
}

impl<T, F> Predicate<T, F>
where
    F: Fn(&T) -> bool,
{
    pub fn new(test: F) -> Self {
        Predicate {
            test,
            _element: PhantomData,
        }
    }
}

impl<T, F> Domain for Predicate<T, F>
where
    F: Fn(&T) -> bool,
{
    type Element = T;

    fn contains(&self, element: &T) -> bool {
        (self.test)(element)
    }
}
