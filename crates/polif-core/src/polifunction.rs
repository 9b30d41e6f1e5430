//! The base polifunction contract
//!
//! A polifunction maps one input to zero, one or many outputs. Every
//! implementation checks [`Polifunction::in_domain`] before running any
//! mapping logic and reports out-of-domain inputs as
//! [`PolifunctionError::Domain`](crate::PolifunctionError::Domain).
//!
//! Implementations must be referentially transparent: equal inputs yield equal
//! results, from any thread, without observable mutation. Implementations that
//! sample randomness have to document their own determinism policy.

use std::fmt::Debug;
use std::sync::Arc;

use crate::{PolifunctionError, PolifunctionResult, PolifunctionValue};

/// Output element requirements shared by every specialization
///
/// Sets need a total order for deterministic iteration, intervals need
/// comparison, and both need cheap duplication.
pub trait Element: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> Element for T {}

/// Base capability of every polifunction
pub trait Polifunction {
    /// Domain element type
    type Input;
    /// Codomain element type
    type Output: Element;

    /// Compute the possible outputs at `input`
    fn evaluate(&self, input: &Self::Input) -> PolifunctionResult<PolifunctionValue<Self::Output>>;

    /// Whether `input` belongs to the domain
    fn in_domain(&self, input: &Self::Input) -> bool;
}

/// Fail with a domain error unless `input` is admissible
#[inline]
pub fn ensure_in_domain<P>(pf: &P, input: &P::Input) -> PolifunctionResult<()>
where
    P: Polifunction + ?Sized,
{
    if pf.in_domain(input) {
        Ok(())
    } else {
        Err(PolifunctionError::Domain)
    }
}

impl<P: Polifunction + ?Sized> Polifunction for &P {
    type Input = P::Input;
    type Output = P::Output;

    fn evaluate(&self, input: &Self::Input) -> PolifunctionResult<PolifunctionValue<Self::Output>> {
        (**self).evaluate(input)
    }

    fn in_domain(&self, input: &Self::Input) -> bool {
        (**self).in_domain(input)
    }
}

impl<P: Polifunction + ?Sized> Polifunction for Box<P> {
    type Input = P::Input;
    type Output = P::Output;

    fn evaluate(&self, input: &Self::Input) -> PolifunctionResult<PolifunctionValue<Self::Output>> {
        (**self).evaluate(input)
    }

    fn in_domain(&self, input: &Self::Input) -> bool {
        (**self).in_domain(input)
    }
}

impl<P: Polifunction + ?Sized> Polifunction for Arc<P> {
    type Input = P::Input;
    type Output = P::Output;

    fn evaluate(&self, input: &Self::Input) -> PolifunctionResult<PolifunctionValue<Self::Output>> {
        (**self).evaluate(input)
    }

    fn in_domain(&self, input: &Self::Input) -> bool {
        (**self).in_domain(input)
    }
}
