//! Set-valued polifunctions
//!
//! A set-valued polifunction maps each input to the set of all its possible
//! outputs. The set may be empty, which means "no admissible output", not a
//! failure.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    ensure_in_domain, Codomain, Domain, Element, Polifunction, PolifunctionError,
    PolifunctionResult, PolifunctionValue,
};

/// Polifunctions whose outputs are discrete sets
pub trait SetValuedPolifunction: Polifunction {
    /// All possible outputs at `input`
    fn value_set(&self, input: &Self::Input) -> PolifunctionResult<BTreeSet<Self::Output>>;

    /// Whether `value` is one of the outputs at `input`
    ///
    /// Overrides may avoid materializing the full set but must agree with
    /// `value_set`, failures included.
    fn contains_value(&self, input: &Self::Input, value: &Self::Output) -> PolifunctionResult<bool> {
        Ok(self.value_set(input)?.contains(value))
    }

    /// Number of outputs at `input`
    fn cardinality(&self, input: &Self::Input) -> PolifunctionResult<usize> {
        Ok(self.value_set(input)?.len())
    }
}

macro_rules! forward_set_valued {
    ($($ptr:ty),*) => {$(
        impl<P: SetValuedPolifunction + ?Sized> SetValuedPolifunction for $ptr {
            fn value_set(&self, input: &Self::Input) -> PolifunctionResult<BTreeSet<Self::Output>> {
                (**self).value_set(input)
            }

            fn contains_value(&self, input: &Self::Input, value: &Self::Output) -> PolifunctionResult<bool> {
                (**self).contains_value(input, value)
            }

            fn cardinality(&self, input: &Self::Input) -> PolifunctionResult<usize> {
                (**self).cardinality(input)
            }
        }
    )*};
}

forward_set_valued!(&P, Box<P>, Arc<P>);

/// Boxed mapping from an input to a set of outputs
pub type SetMapping<I, O> = dyn Fn(&I) -> PolifunctionResult<BTreeSet<O>> + Send + Sync;

/// Reject a single output that falls outside the codomain
pub(crate) fn check_codomain_value<C>(codomain: &C, value: &C::Element) -> PolifunctionResult<()>
where
    C: Codomain,
    C::Element: std::fmt::Debug,
{
    if codomain.contains(value) {
        Ok(())
    } else {
        Err(PolifunctionError::Computation(format!(
            "output {:?} is outside the codomain",
            value
        )))
    }
}

/// Reject any output that falls outside the codomain
pub(crate) fn check_codomain<C>(codomain: &C, values: &BTreeSet<C::Element>) -> PolifunctionResult<()>
where
    C: Codomain,
    C::Element: std::fmt::Debug,
{
    values
        .iter()
        .try_for_each(|value| check_codomain_value(codomain, value))
}

/// Set-valued polifunction backed by a mapping closure
pub struct BasicSetValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
{
    mapping: Box<SetMapping<D::Element, C::Element>>,
    domain: D,
    codomain: C,
}

impl<D, C> BasicSetValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    pub fn new(
        mapping: impl Fn(&D::Element) -> PolifunctionResult<BTreeSet<C::Element>> + Send + Sync + 'static,
        domain: D,
        codomain: C,
    ) -> Self {
        BasicSetValuedPolifunction {
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

impl<D, C> Polifunction for BasicSetValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    type Input = D::Element;
    type Output = C::Element;

    fn evaluate(&self, input: &D::Element) -> PolifunctionResult<PolifunctionValue<C::Element>> {
        self.value_set(input).map(PolifunctionValue::Set)
    }

    fn in_domain(&self, input: &D::Element) -> bool {
        Domain::contains(&self.domain, input)
    }
}

impl<D, C> SetValuedPolifunction for BasicSetValuedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    fn value_set(&self, input: &D::Element) -> PolifunctionResult<BTreeSet<C::Element>> {
        ensure_in_domain(self, input)?;
        let values = (self.mapping)(input)?;
        check_codomain(&self.codomain, &values)?;
        Ok(values)
    }
}

/// Pointwise union of two set-valued polifunctions
///
/// Both operands must accept an input for the union to accept it, and a
/// failure of either operand fails the union. There is no partial union.
pub struct UnionPolifunction<A, B> {
    a: A,
    b: B,
}

impl<A, B> UnionPolifunction<A, B>
where
    A: SetValuedPolifunction,
    B: SetValuedPolifunction<Input = A::Input, Output = A::Output>,
{
    pub fn new(a: A, b: B) -> Self {
        UnionPolifunction { a, b }
    }

    pub fn into_parts(self) -> (A, B) {
        (self.a, self.b)
    }
}

impl<A, B> Polifunction for UnionPolifunction<A, B>
where
    A: SetValuedPolifunction,
    B: SetValuedPolifunction<Input = A::Input, Output = A::Output>,
{
    type Input = A::Input;
    type Output = A::Output;

    fn evaluate(&self, input: &A::Input) -> PolifunctionResult<PolifunctionValue<A::Output>> {
        self.value_set(input).map(PolifunctionValue::Set)
    }

    fn in_domain(&self, input: &A::Input) -> bool {
        self.a.in_domain(input) && self.b.in_domain(input)
    }
}

impl<A, B> SetValuedPolifunction for UnionPolifunction<A, B>
where
    A: SetValuedPolifunction,
    B: SetValuedPolifunction<Input = A::Input, Output = A::Output>,
{
    fn value_set(&self, input: &A::Input) -> PolifunctionResult<BTreeSet<A::Output>> {
        ensure_in_domain(self, input)?;
        let mut values = self.a.value_set(input)?;
        values.extend(self.b.value_set(input)?);
        Ok(values)
    }

    fn contains_value(&self, input: &A::Input, value: &A::Output) -> PolifunctionResult<bool> {
        ensure_in_domain(self, input)?;
        // both sides run so a failing operand fails the query like value_set would
        let in_a = self.a.contains_value(input, value)?;
        let in_b = self.b.contains_value(input, value)?;
        Ok(in_a || in_b)
    }
}
