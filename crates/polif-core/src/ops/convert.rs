//! Shape conversions between specializations

use crate::{
    ensure_in_domain, Interval, IntervalValuedPolifunction, Polifunction, PolifunctionError,
    PolifunctionResult, PolifunctionValue, SetValuedPolifunction,
};

/// Interval enclosure of a set-valued polifunction
///
/// The interval at `x` is `[min, max]` of `value_set(x)`, both bounds
/// inclusive. This approximates: every output lies in the interval, but not
/// every point of the interval is an output.
pub struct SetToInterval<P> {
    source: P,
}

/// Convert a set-valued polifunction into an interval-valued one
pub fn to_interval<P>(source: P) -> SetToInterval<P>
where
    P: SetValuedPolifunction,
{
    SetToInterval { source }
}

impl<P> SetToInterval<P>
where
    P: SetValuedPolifunction,
{
    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn into_source(self) -> P {
        self.source
    }
}

impl<P> Polifunction for SetToInterval<P>
where
    P: SetValuedPolifunction,
{
    type Input = P::Input;
    type Output = P::Output;

    fn evaluate(&self, input: &P::Input) -> PolifunctionResult<PolifunctionValue<P::Output>> {
        self.value_interval(input).map(PolifunctionValue::Interval)
    }

    fn in_domain(&self, input: &P::Input) -> bool {
        self.source.in_domain(input)
    }
}

impl<P> IntervalValuedPolifunction for SetToInterval<P>
where
    P: SetValuedPolifunction,
{
    fn value_interval(&self, input: &P::Input) -> PolifunctionResult<Interval<P::Output>> {
        ensure_in_domain(self, input)?;
        let values = self.source.value_set(input)?;
        match (values.first(), values.last()) {
            (Some(min), Some(max)) => Interval::closed(min.clone(), max.clone()),
            _ => Err(PolifunctionError::computation(
                "no interval defined for an empty solution set",
            )),
        }
    }
}
