//! Composition of set-valued polifunctions

use std::collections::BTreeSet;

use crate::{
    ensure_in_domain, Polifunction, PolifunctionError, PolifunctionResult, PolifunctionValue,
    SetValuedPolifunction,
};

/// `outer ∘ inner`, unioned over every intermediate value
///
/// The inner polifunction runs first. Each intermediate value it yields is
/// converted into an outer input and fed to the outer polifunction, in the
/// iteration order of the inner value set. The first failure stops the walk.
pub struct ComposedPolifunction<P1, P2, G> {
    outer: P1,
    inner: P2,
    convert: G,
}

/// Compose `outer` after `inner` through an explicit conversion
///
/// `convert` must be total over every value `inner` can produce. A `None`
/// from it is reported as a computation error, as is an intermediate that
/// converts to a value outside the outer domain.
pub fn compose<P1, P2, G>(outer: P1, inner: P2, convert: G) -> ComposedPolifunction<P1, P2, G>
where
    P1: SetValuedPolifunction,
    P2: SetValuedPolifunction,
    G: Fn(&P2::Output) -> Option<P1::Input>,
{
    ComposedPolifunction {
        outer,
        inner,
        convert,
    }
}

/// Conversion used by [`compose_into`]
pub type IntoConversion<A, B> = fn(&A) -> Option<B>;

fn convert_into<A: Clone + Into<B>, B>(value: &A) -> Option<B> {
    Some(value.clone().into())
}

/// Compose when the inner output converts infallibly into the outer input
pub fn compose_into<P1, P2>(
    outer: P1,
    inner: P2,
) -> ComposedPolifunction<P1, P2, IntoConversion<P2::Output, P1::Input>>
where
    P1: SetValuedPolifunction,
    P2: SetValuedPolifunction,
    P2::Output: Into<P1::Input>,
{
    compose(outer, inner, convert_into::<P2::Output, P1::Input> as IntoConversion<_, _>)
}

impl<P1, P2, G> ComposedPolifunction<P1, P2, G>
where
    P1: SetValuedPolifunction,
    P2: SetValuedPolifunction,
    G: Fn(&P2::Output) -> Option<P1::Input>,
{
    pub fn outer(&self) -> &P1 {
        &self.outer
    }

    pub fn inner(&self) -> &P2 {
        &self.inner
    }
}

impl<P1, P2, G> Polifunction for ComposedPolifunction<P1, P2, G>
where
    P1: SetValuedPolifunction,
    P2: SetValuedPolifunction,
    G: Fn(&P2::Output) -> Option<P1::Input>,
{
    type Input = P2::Input;
    type Output = P1::Output;

    fn evaluate(&self, input: &P2::Input) -> PolifunctionResult<PolifunctionValue<P1::Output>> {
        self.value_set(input).map(PolifunctionValue::Set)
    }

    fn in_domain(&self, input: &P2::Input) -> bool {
        self.inner.in_domain(input)
    }
}

impl<P1, P2, G> SetValuedPolifunction for ComposedPolifunction<P1, P2, G>
where
    P1: SetValuedPolifunction,
    P2: SetValuedPolifunction,
    G: Fn(&P2::Output) -> Option<P1::Input>,
{
    fn value_set(&self, input: &P2::Input) -> PolifunctionResult<BTreeSet<P1::Output>> {
        ensure_in_domain(self, input)?;
        let intermediates = self.inner.value_set(input)?;

        let mut outputs = BTreeSet::new();
        for mid in &intermediates {
            let converted = (self.convert)(mid).ok_or_else(|| {
                PolifunctionError::Computation(format!(
                    "intermediate value {:?} has no conversion into the outer domain",
                    mid
                ))
            })?;
            // the composite accepted the input, so an outer domain miss is a
            // failed computation rather than a domain error of the composite
            let values = self.outer.value_set(&converted).map_err(|err| match err {
                PolifunctionError::Domain => PolifunctionError::Computation(format!(
                    "intermediate value {:?} is outside the outer domain",
                    mid
                )),
                other => other,
            })?;
            outputs.extend(values);
        }
        Ok(outputs)
    }
}
