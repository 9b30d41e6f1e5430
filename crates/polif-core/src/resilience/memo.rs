//! Lazy, memoizing evaluation

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    Interval, IntervalValuedPolifunction, Polifunction, PolifunctionError, PolifunctionResult,
    PolifunctionValue, SetValuedPolifunction,
};

type Outcome<O> = PolifunctionResult<PolifunctionValue<O>>;
type Slot<O> = Arc<OnceLock<Outcome<O>>>;

/// Caches the outcome of `evaluate` per input
///
/// Nothing runs until an input is first requested. Each input owns a
/// compute-once slot: when several threads ask for the same uncached input
/// at once, exactly one runs the wrapped polifunction and the others block
/// until that single outcome (value or error) is available. The map lock is
/// never held while the wrapped polifunction runs.
///
/// Out-of-domain inputs are rejected before the cache is consulted and are
/// never stored.
pub struct MemoizedPolifunction<P: Polifunction> {
    inner: P,
    cache: Mutex<HashMap<P::Input, Slot<P::Output>>>,
}

/// Wrap `inner` in a lazy per-input cache
pub fn memoize<P>(inner: P) -> MemoizedPolifunction<P>
where
    P: Polifunction,
    P::Input: Eq + Hash + Clone,
{
    MemoizedPolifunction::new(inner)
}

impl<P> MemoizedPolifunction<P>
where
    P: Polifunction,
    P::Input: Eq + Hash + Clone,
{
    pub fn new(inner: P) -> Self {
        MemoizedPolifunction {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of inputs with a reserved slot
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether `input` already has a computed outcome
    pub fn is_cached(&self, input: &P::Input) -> bool {
        self.cache
            .lock()
            .get(input)
            .map_or(false, |slot| slot.get().is_some())
    }

    fn outcome(&self, input: &P::Input) -> Outcome<P::Output> {
        if !self.inner.in_domain(input) {
            return Err(PolifunctionError::Domain);
        }

        let slot = {
            let mut cache = self.cache.lock();
            Arc::clone(
                cache
                    .entry(input.clone())
                    .or_insert_with(|| Arc::new(OnceLock::new())),
            )
        };

        slot.get_or_init(|| {
            debug!(cached = self.cached_len(), "memo miss, evaluating");
            self.inner.evaluate(input)
        })
        .clone()
    }
}

impl<P> Polifunction for MemoizedPolifunction<P>
where
    P: Polifunction,
    P::Input: Eq + Hash + Clone,
{
    type Input = P::Input;
    type Output = P::Output;

    fn evaluate(&self, input: &P::Input) -> PolifunctionResult<PolifunctionValue<P::Output>> {
        self.outcome(input)
    }

    fn in_domain(&self, input: &P::Input) -> bool {
        self.inner.in_domain(input)
    }
}

impl<P> SetValuedPolifunction for MemoizedPolifunction<P>
where
    P: SetValuedPolifunction,
    P::Input: Eq + Hash + Clone,
{
    fn value_set(&self, input: &P::Input) -> PolifunctionResult<BTreeSet<P::Output>> {
        self.outcome(input)?
            .into_set()
            .ok_or_else(|| PolifunctionError::computation("cached value is not set-shaped"))
    }
}

impl<P> IntervalValuedPolifunction for MemoizedPolifunction<P>
where
    P: IntervalValuedPolifunction,
    P::Input: Eq + Hash + Clone,
{
    fn value_interval(&self, input: &P::Input) -> PolifunctionResult<Interval<P::Output>> {
        self.outcome(input)?
            .into_interval()
            .ok_or_else(|| PolifunctionError::computation("cached value is not interval-shaped"))
    }
}
