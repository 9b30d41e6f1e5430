//! Lifting single-valued functions

use std::collections::BTreeSet;

use crate::set_valued::check_codomain_value;
use crate::{
    ensure_in_domain, Codomain, Domain, Element, Polifunction, PolifunctionResult,
    PolifunctionValue, SetValuedPolifunction,
};

/// Boxed single-valued mapping
pub type ScalarMapping<I, O> = dyn Fn(&I) -> PolifunctionResult<O> + Send + Sync;

/// A single-valued function seen as a set-valued polifunction
///
/// `value_set(x)` is `{f(x)}`. Errors from `f` come back exactly as `f`
/// returned them.
pub struct LiftedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
{
    function: Box<ScalarMapping<D::Element, C::Element>>,
    domain: D,
    codomain: C,
}

/// Wrap `f` into a set-valued polifunction over `domain` and `codomain`
pub fn lift_to_set<D, C, F>(f: F, domain: D, codomain: C) -> LiftedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
    F: Fn(&D::Element) -> PolifunctionResult<C::Element> + Send + Sync + 'static,
{
    LiftedPolifunction {
        function: Box::new(f),
        domain,
        codomain,
    }
}

impl<D, C> LiftedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn codomain(&self) -> &C {
        &self.codomain
    }

    /// The underlying single value at `input`
    pub fn apply(&self, input: &D::Element) -> PolifunctionResult<C::Element> {
        ensure_in_domain(self, input)?;
        let value = (self.function)(input)?;
        check_codomain_value(&self.codomain, &value)?;
        Ok(value)
    }
}

impl<D, C> Polifunction for LiftedPolifunction<D, C>
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

impl<D, C> SetValuedPolifunction for LiftedPolifunction<D, C>
where
    D: Domain,
    C: Codomain,
    C::Element: Element,
{
    fn value_set(&self, input: &D::Element) -> PolifunctionResult<BTreeSet<C::Element>> {
        self.apply(input).map(|value| BTreeSet::from([value]))
    }

    fn contains_value(&self, input: &D::Element, value: &C::Element) -> PolifunctionResult<bool> {
        Ok(self.apply(input)? == *value)
    }

    fn cardinality(&self, input: &D::Element) -> PolifunctionResult<usize> {
        self.apply(input).map(|_| 1)
    }
}
