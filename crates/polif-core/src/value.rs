//! Value representation
//!
//! A polifunction evaluation yields exactly one [`PolifunctionValue`]. The
//! shape of that value decides which specialization the producing
//! polifunction may implement: set-shaped values come from set-valued
//! polifunctions, interval-shaped values from interval-valued ones.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Sub;

use crate::{Domain, PolifunctionError, PolifunctionResult, Real};

/// Shape discriminant of a [`PolifunctionValue`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueShape {
    Single = 0x01,
    Set = 0x02,
    Interval = 0x03,
    Distribution = 0x04,
    FuzzySet = 0x05,
}

impl ValueShape {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(ValueShape::Single),
            0x02 => Some(ValueShape::Set),
            0x03 => Some(ValueShape::Interval),
            0x04 => Some(ValueShape::Distribution),
            0x05 => Some(ValueShape::FuzzySet),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Shapes whose numeric semantics belong to extensions, not the core
    pub fn is_extension(self) -> bool {
        matches!(self, ValueShape::Distribution | ValueShape::FuzzySet)
    }
}

/// Possible outputs of a polifunction at one input
#[derive(Clone, Debug, PartialEq)]
pub enum PolifunctionValue<T> {
    /// A single value
    Single(T),
    /// Unique values, no significant order
    Set(BTreeSet<T>),
    /// A continuous range
    Interval(Interval<T>),
    /// Weighted values (extension point)
    Distribution(Distribution<T>),
    /// Values with membership degrees (extension point)
    FuzzySet(FuzzySet<T>),
}

impl<T> PolifunctionValue<T> {
    pub fn shape(&self) -> ValueShape {
        match self {
            PolifunctionValue::Single(_) => ValueShape::Single,
            PolifunctionValue::Set(_) => ValueShape::Set,
            PolifunctionValue::Interval(_) => ValueShape::Interval,
            PolifunctionValue::Distribution(_) => ValueShape::Distribution,
            PolifunctionValue::FuzzySet(_) => ValueShape::FuzzySet,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<T>> {
        match self {
            PolifunctionValue::Set(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<&Interval<T>> {
        match self {
            PolifunctionValue::Interval(interval) => Some(interval),
            _ => None,
        }
    }

    pub fn into_interval(self) -> Option<Interval<T>> {
        match self {
            PolifunctionValue::Interval(interval) => Some(interval),
            _ => None,
        }
    }
}

impl<T: Ord> PolifunctionValue<T> {
    /// Discrete view of the value. A single value promotes to a singleton set;
    /// continuous and extension shapes have no discrete view.
    pub fn into_set(self) -> Option<BTreeSet<T>> {
        match self {
            PolifunctionValue::Single(v) => Some(BTreeSet::from([v])),
            PolifunctionValue::Set(set) => Some(set),
            _ => None,
        }
    }
}

/// Continuous interval between two bounds
///
/// `lower <= upper` always holds. An interval with equal bounds and at least
/// one exclusive bound is empty but still well-formed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    lower: T,
    upper: T,
    lower_inclusive: bool,
    upper_inclusive: bool,
}

impl<T: PartialOrd> Interval<T> {
    /// Build an interval, rejecting `lower > upper` and incomparable bounds
    pub fn new(
        lower: T,
        upper: T,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> PolifunctionResult<Self> {
        match lower.partial_cmp(&upper) {
            Some(Ordering::Less) | Some(Ordering::Equal) => Ok(Interval {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            }),
            Some(Ordering::Greater) => Err(PolifunctionError::computation(
                "interval lower bound exceeds upper bound",
            )),
            None => Err(PolifunctionError::computation(
                "interval bounds are not comparable",
            )),
        }
    }

    /// `[lower, upper]`
    pub fn closed(lower: T, upper: T) -> PolifunctionResult<Self> {
        Interval::new(lower, upper, true, true)
    }

    /// `(lower, upper)`
    pub fn open(lower: T, upper: T) -> PolifunctionResult<Self> {
        Interval::new(lower, upper, false, false)
    }

    /// Bound comparison honoring inclusivity exactly
    pub fn contains(&self, value: &T) -> bool {
        let above_lower = match value.partial_cmp(&self.lower) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.lower_inclusive,
            _ => false,
        };
        let below_upper = match value.partial_cmp(&self.upper) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.upper_inclusive,
            _ => false,
        };
        above_lower && below_upper
    }

    pub fn is_empty(&self) -> bool {
        self.lower == self.upper && !(self.lower_inclusive && self.upper_inclusive)
    }

    /// `lower == upper`, both inclusive
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper && self.lower_inclusive && self.upper_inclusive
    }

    /// `other` lies entirely inside `self`
    pub fn encloses(&self, other: &Interval<T>) -> bool {
        let lower_ok = match self.lower.partial_cmp(&other.lower) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.lower_inclusive || !other.lower_inclusive,
            _ => false,
        };
        let upper_ok = match self.upper.partial_cmp(&other.upper) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.upper_inclusive || !other.upper_inclusive,
            _ => false,
        };
        lower_ok && upper_ok
    }
}

impl<T: PartialOrd + Clone> Interval<T> {
    /// `[value, value]`
    pub fn degenerate(value: T) -> Self {
        Interval {
            lower: value.clone(),
            upper: value,
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    /// Smallest interval containing both. On equal bounds the result is
    /// inclusive if either side is.
    pub fn hull(&self, other: &Interval<T>) -> PolifunctionResult<Self> {
        let (lower, lower_inclusive) = match self.lower.partial_cmp(&other.lower) {
            Some(Ordering::Less) => (self.lower.clone(), self.lower_inclusive),
            Some(Ordering::Equal) => (
                self.lower.clone(),
                self.lower_inclusive || other.lower_inclusive,
            ),
            Some(Ordering::Greater) => (other.lower.clone(), other.lower_inclusive),
            None => {
                return Err(PolifunctionError::computation(
                    "interval bounds are not comparable",
                ))
            }
        };
        let (upper, upper_inclusive) = match self.upper.partial_cmp(&other.upper) {
            Some(Ordering::Greater) => (self.upper.clone(), self.upper_inclusive),
            Some(Ordering::Equal) => (
                self.upper.clone(),
                self.upper_inclusive || other.upper_inclusive,
            ),
            Some(Ordering::Less) => (other.upper.clone(), other.upper_inclusive),
            None => {
                return Err(PolifunctionError::computation(
                    "interval bounds are not comparable",
                ))
            }
        };
        Interval::new(lower, upper, lower_inclusive, upper_inclusive)
    }
}

impl<T: Clone + Sub<Output = T>> Interval<T> {
    /// `upper - lower`
    pub fn width(&self) -> T {
        self.upper.clone() - self.lower.clone()
    }
}

impl<T: Measure> Interval<T> {
    /// `upper - lower`, failing when the width is undefined or not
    /// representable
    pub fn checked_width(&self) -> PolifunctionResult<T> {
        T::distance(&self.lower, &self.upper).ok_or_else(|| {
            PolifunctionError::computation("interval width is not a finite non-negative value")
        })
    }
}

/// Element types with a distance between two ordered bounds
pub trait Measure: Sized {
    /// `upper - lower` for `lower <= upper`, or `None` when the result is
    /// not a non-negative value of the type
    fn distance(lower: &Self, upper: &Self) -> Option<Self>;
}

impl Measure for Real {
    fn distance(lower: &Real, upper: &Real) -> Option<Real> {
        // NaN and infinite bounds order fine but have no width
        if !lower.is_finite() || !upper.is_finite() {
            return None;
        }
        let width = upper.value() - lower.value();
        (width.is_finite() && width >= 0.0).then(|| Real::new(width))
    }
}

macro_rules! integer_measure {
    ($($t:ty),*) => {$(
        impl Measure for $t {
            fn distance(lower: &$t, upper: &$t) -> Option<$t> {
                upper.checked_sub(*lower)
            }
        }
    )*};
}

integer_measure!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T> Interval<T> {
    #[inline]
    pub fn lower(&self) -> &T {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &T {
        &self.upper
    }

    #[inline]
    pub fn lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    #[inline]
    pub fn upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    pub fn into_bounds(self) -> (T, T) {
        (self.lower, self.upper)
    }
}

/// An interval is a domain over its own element type
impl<T: PartialOrd> Domain for Interval<T> {
    type Element = T;

    fn contains(&self, element: &T) -> bool {
        Interval::contains(self, element)
    }
}

/// Values paired with weights
///
/// Normalization and equality rules belong to the extension that produces
/// distributions; the core only carries the entries.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Distribution<T> {
    entries: Vec<(T, f64)>,
}

impl<T> Distribution<T> {
    pub fn new(entries: Vec<(T, f64)>) -> Self {
        Distribution { entries }
    }

    pub fn entries(&self) -> &[(T, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values paired with membership degrees
///
/// Degree semantics belong to the producing extension.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FuzzySet<T> {
    members: Vec<(T, f64)>,
}

impl<T> FuzzySet<T> {
    pub fn new(members: Vec<(T, f64)>) -> Self {
        FuzzySet { members }
    }

    pub fn members(&self) -> &[(T, f64)] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, Real};

    fn r(v: f64) -> Real {
        Real::new(v)
    }

    #[test]
    fn test_interval_rejects_inverted_bounds() {
        let err = Interval::closed(r(4.0), r(2.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);

        let err = Interval::closed(f64::NAN, 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Computation);
    }

    #[test]
    fn test_interval_inclusivity() {
        let half_open = Interval::new(r(2.0), r(4.0), true, false).unwrap();
        assert!(half_open.contains(&r(2.0)));
        assert!(half_open.contains(&r(3.999)));
        assert!(!half_open.contains(&r(4.0)));
        assert!(!half_open.contains(&r(1.999)));
    }

    #[test]
    fn test_interval_width_and_degenerate() {
        let interval = Interval::closed(r(2.0), r(4.0)).unwrap();
        assert_eq!(interval.width(), r(2.0));

        let point = Interval::degenerate(r(7.0));
        assert!(point.is_degenerate());
        assert!(!point.is_empty());
        assert_eq!(point.width(), r(0.0));

        let empty = Interval::open(r(1.0), r(1.0)).unwrap();
        assert!(empty.is_empty());
        assert!(!empty.contains(&r(1.0)));
    }

    #[test]
    fn test_checked_width_rejects_non_finite_bounds() {
        let finite = Interval::closed(r(-1.5), r(2.5)).unwrap();
        assert_eq!(finite.checked_width().unwrap(), r(4.0));

        for bounds in [
            (f64::INFINITY, f64::INFINITY),
            (0.0, f64::INFINITY),
            (f64::NEG_INFINITY, 0.0),
            (f64::NAN, f64::NAN),
        ] {
            let interval = Interval::closed(r(bounds.0), r(bounds.1)).unwrap();
            assert_eq!(
                interval.checked_width().unwrap_err().kind(),
                ErrorKind::Computation
            );
        }

        // finite bounds whose difference overflows
        let huge = Interval::closed(r(-f64::MAX), r(f64::MAX)).unwrap();
        assert!(huge.checked_width().is_err());
    }

    #[test]
    fn test_checked_width_integer_overflow() {
        assert_eq!(Interval::closed(-3i64, 4).unwrap().checked_width().unwrap(), 7);
        let full = Interval::closed(i64::MIN, i64::MAX).unwrap();
        assert!(full.checked_width().is_err());
        assert_eq!(Interval::closed(2u8, 200).unwrap().checked_width().unwrap(), 198);
    }

    #[test]
    fn test_interval_hull() {
        let a = Interval::new(r(0.0), r(2.0), false, true).unwrap();
        let b = Interval::new(r(0.0), r(5.0), true, false).unwrap();
        let hull = a.hull(&b).unwrap();
        assert_eq!(hull, Interval::new(r(0.0), r(5.0), true, false).unwrap());

        let c = Interval::closed(r(-1.0), r(1.0)).unwrap();
        let hull = a.hull(&c).unwrap();
        assert_eq!(hull, Interval::closed(r(-1.0), r(2.0)).unwrap());
    }

    #[test]
    fn test_interval_encloses() {
        let outer = Interval::closed(r(0.0), r(10.0)).unwrap();
        let inner = Interval::open(r(0.0), r(10.0)).unwrap();
        assert!(outer.encloses(&inner));
        assert!(!inner.encloses(&outer));
    }

    #[test]
    fn test_value_shape_roundtrip() {
        for shape in [
            ValueShape::Single,
            ValueShape::Set,
            ValueShape::Interval,
            ValueShape::Distribution,
            ValueShape::FuzzySet,
        ] {
            assert_eq!(ValueShape::from_byte(shape.to_byte()), Some(shape));
        }
        assert_eq!(ValueShape::from_byte(0x00), None);
        assert!(ValueShape::FuzzySet.is_extension());
        assert!(!ValueShape::Set.is_extension());
    }

    #[test]
    fn test_single_promotes_to_set() {
        let value = PolifunctionValue::Single(3i64);
        assert_eq!(value.shape(), ValueShape::Single);
        assert_eq!(value.into_set(), Some(BTreeSet::from([3])));

        let interval = PolifunctionValue::Interval(Interval::degenerate(1i64));
        assert_eq!(interval.into_set(), None);
    }
}
