//! Inversion over a finite set of candidate inputs

use std::collections::BTreeSet;

use crate::{
    ensure_in_domain, Domain, Element, Polifunction, PolifunctionResult, PolifunctionValue,
    SetValuedPolifunction,
};

/// Preimage polifunction: `value_set(y) = { x | y ∈ original.value_set(x) }`
///
/// The search is restricted to a finite candidate set. Candidates outside
/// the original domain are dropped when the inverse is built.
pub struct InvertedPolifunction<P, D>
where
    P: SetValuedPolifunction,
{
    original: P,
    candidates: BTreeSet<P::Input>,
    domain: D,
}

/// Invert `original` over `candidates`, accepting outputs admitted by `domain`
pub fn invert<P, D>(
    original: P,
    candidates: impl IntoIterator<Item = P::Input>,
    domain: D,
) -> InvertedPolifunction<P, D>
where
    P: SetValuedPolifunction,
    P::Input: Element,
    D: Domain<Element = P::Output>,
{
    let candidates = candidates
        .into_iter()
        .filter(|x| original.in_domain(x))
        .collect();
    InvertedPolifunction {
        original,
        candidates,
        domain,
    }
}

impl<P, D> InvertedPolifunction<P, D>
where
    P: SetValuedPolifunction,
    P::Input: Element,
    D: Domain<Element = P::Output>,
{
    pub fn candidates(&self) -> &BTreeSet<P::Input> {
        &self.candidates
    }
}

impl<P, D> Polifunction for InvertedPolifunction<P, D>
where
    P: SetValuedPolifunction,
    P::Input: Element,
    D: Domain<Element = P::Output>,
{
    type Input = P::Output;
    type Output = P::Input;

    fn evaluate(&self, input: &P::Output) -> PolifunctionResult<PolifunctionValue<P::Input>> {
        self.value_set(input).map(PolifunctionValue::Set)
    }

    fn in_domain(&self, input: &P::Output) -> bool {
        Domain::contains(&self.domain, input)
    }
}

impl<P, D> SetValuedPolifunction for InvertedPolifunction<P, D>
where
    P: SetValuedPolifunction,
    P::Input: Element,
    D: Domain<Element = P::Output>,
{
    fn value_set(&self, input: &P::Output) -> PolifunctionResult<BTreeSet<P::Input>> {
        ensure_in_domain(self, input)?;
        let mut preimage = BTreeSet::new();
        for candidate in &self.candidates {
            if self.original.contains_value(candidate, input)? {
                preimage.insert(candidate.clone());
            }
        }
        Ok(preimage)
    }
}
