//! Interval-valued polifunctions
//!
//! An interval-valued polifunction encloses all its outputs at an input in a
//! single [`Interval`]. Construction of the interval enforces
//! `lower <= upper`, so a mapping that would produce inverted bounds fails
//! with a computation error instead of swapping them.

use std::sync::Arc;

use crate::{
    ensure_in_domain, Codomain, Domain, Element, Interval, Measure, Polifunction, PolifunctionError,
    PolifunctionResult, PolifunctionValue,
};

/// Polifunctions whose outputs are continuous intervals
pub trait IntervalValuedPolifunction: Polifunction {
    /// Interval of outputs at `input`
    fn value_interval(&self, input: &Self::Input) -> PolifunctionResult<Interval<Self::Output>>;

    /// Whether `value` lies in the output interval, honoring bound inclusivity
    fn contains_value(&self, input: &Self::Input, value: &Self::Output) -> PolifunctionResult<bool> {
        Ok(self.value_interval(input)?.contains(value))
    }

    /// `upper - lower` of the output interval
    ///
    /// Fails with a computation error when the width is not a finite
    /// non-negative value, as for intervals with infinite bounds.
    fn interval_width(&self, input: &Self::Input) -> PolifunctionResult<Self::Output>
    where
        Self::Output: Measure,
    {
        self.value_interval(input)?.checked_width()
    }
}

macro_rules! forward_interval_valued {
    ($($ptr:ty),*) => {$(
        impl<P: IntervalValuedPolifunction + ?Sized> IntervalValuedPolifunction for $ptr {
            fn value_interval(&self, input: &Self::Input) -> PolifunctionResult<Interval<Self::Output>> {
                (**self).value_interval(input)
            }

            fn contains_value(&self, input: &Self::Input, value: &Self::Output) -> PolifunctionResult<bool> {
                (**self).contains_value(input, value)
            }

            fn interval_width(&self, input: &Self::Input) -> PolifunctionResult<Self::Output>
            where
                Self::Output: Measure,
            {
                (**self).interval_width(input)
            }
        }
    )*};
}

forward_interval_valued!(&P, Box<P>, Arc<P>);

/// Boxed mapping from an input to an interval of outputs
pub type IntervalMapping<I, O> = dyn Fn(&I) -> PolifunctionResult<Interval<O>> + Send + Sync;

/// Interval-valued polifunction backed by a mapping closure
///
/// Only the bounds are checked against the codomain; an interval codomain
/// therefore admits every interval whose endpoints it contains.
pub struct BasicIntervalValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
{
    mapping: Box<IntervalMapping<D::Element, C::Element>>,
    domain: D,
    codomain: C,
}

impl<D, C> BasicIntervalValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    pub fn new(
        mapping: impl Fn(&D::Element) -> PolifunctionResult<Interval<C::Element>> + Send + Sync + 'static,
        domain: D,
        codomain: C,
    ) -> Self {
        BasicIntervalValuedPolifunction {
            mapping: Box::new(mapping),
            domain,
            codomain,
        }
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn codomain(&self) -> &C {
        &self.codomain
    }
}

impl<D, C> Polifunction for BasicIntervalValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    type Input = D::Element;
    type Output = C::Element;

    fn evaluate(&self, input: &D::Element) -> PolifunctionResult<PolifunctionValue<C::Element>> {
        self.value_interval(input).map(PolifunctionValue::Interval)
    }

    fn in_domain(&self, input: &D::Element) -> bool {
        Domain::contains(&self.domain, input)
    }
}

impl<D, C> IntervalValuedPolifunction for BasicIntervalValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    fn value_interval(&self, input: &D::Element) -> PolifunctionResult<Interval<C::Element>> {
        ensure_in_domain(self, input)?;
        let interval = (self.mapping)(input)?;
        for bound in [interval.lower(), interval.upper()] {
            if !self.codomain.contains(bound) {
                return Err(PolifunctionError::Computation(format!(
                    "interval bound {:?} is outside the codomain",
                    bound
                )));
            }
        }
        Ok(interval)
    }
}

/// Smallest interval enclosing the outputs of two interval-valued polifunctions
pub struct HullPolifunction<A, B> {
    a: A,
    b: B,
}

impl<A, B> HullPolifunction<A, B>
where
    A: IntervalValuedPolifunction,
    B: IntervalValuedPolifunction<Input = A::Input, Output = A::Output>,
{
    pub fn new(a: A, b: B) -> Self {
        HullPolifunction { a, b }
    }
}

impl<A, B> Polifunction for HullPolifunction<A, B>
where
    A: IntervalValuedPolifunction,
    B: IntervalValuedPolifunction<Input = A::Input, Output = A::Output>,
{
    type Input = A::Input;
    type Output = A::Output;

    fn evaluate(&self, input: &A::Input) -> PolifunctionResult<PolifunctionValue<A::Output>> {
        self.value_interval(input).map(PolifunctionValue::Interval)
    }

    fn in_domain(&self, input: &A::Input) -> bool {
        self.a.in_domain(input) && self.b.in_domain(input)
    }
}

impl<A, B> IntervalValuedPolifunction for HullPolifunction<A, B>
where
    A: IntervalValuedPolifunction,
    B: IntervalValuedPolifunction<Input = A::Input, Output = A::Output>,
{
    fn value_interval(&self, input: &A::Input) -> PolifunctionResult<Interval<A::Output>> {
        ensure_in_domain(self, input)?;
        let first = self.a.value_interval(input)?;
        let second = self.b.value_interval(input)?;
        first.hull(&second)
    }
}
