//! Iterative interval refinement
//!
//! Some interval-valued mappings are only known through a contraction
//! process: start from a coarse enclosure and repeatedly narrow it. The
//! refinement stops once the enclosure is narrow enough, fails with a
//! convergence error when the iteration budget runs out, and fails with a
//! cancellation error when its [`CancelToken`] trips.

use tracing::{debug, warn};

use crate::{
    ensure_in_domain, CancelToken, Domain, Interval, IntervalValuedPolifunction, Polifunction,
    PolifunctionError, PolifunctionResult, PolifunctionValue, Real,
};

/// Refinement budget
#[derive(Clone, Debug)]
pub struct RefinementConfig {
    /// Stop once `upper - lower <= tolerance * max(1, |lower|, |upper|)`
    ///
    /// Absolute for enclosures within `[-1, 1]`, relative to the larger
    /// bound magnitude beyond.
    pub tolerance: f64,
    /// Narrowing steps allowed before giving up
    pub max_iterations: usize,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        RefinementConfig {
            tolerance: 1e-9,
            max_iterations: 100,
        }
    }
}

impl RefinementConfig {
    /// Tight tolerance for values needed close to machine precision
    pub fn precise() -> Self {
        RefinementConfig {
            tolerance: 1e-14,
            max_iterations: 200,
        }
    }

    /// Loose tolerance, small budget
    pub fn coarse() -> Self {
        RefinementConfig {
            tolerance: 1e-3,
            max_iterations: 32,
        }
    }
}

type Enclosure<I> = dyn Fn(&I) -> PolifunctionResult<Interval<Real>> + Send + Sync;
type Narrowing<I> = dyn Fn(&I, &Interval<Real>) -> PolifunctionResult<Interval<Real>> + Send + Sync;

/// Interval-valued polifunction computed by successive narrowing
///
/// Every step must return an interval enclosed by the previous one; a step
/// that widens the enclosure is a computation error.
pub struct RefiningIntervalPolifunction<D: Domain> {
    enclosure: Box<Enclosure<D::Element>>,
    narrow: Box<Narrowing<D::Element>>,
    domain: D,
    config: RefinementConfig,
}

impl<D: Domain> RefiningIntervalPolifunction<D> {
    pub fn new(
        enclosure: impl Fn(&D::Element) -> PolifunctionResult<Interval<Real>> + Send + Sync + 'static,
        narrow: impl Fn(&D::Element, &Interval<Real>) -> PolifunctionResult<Interval<Real>>
            + Send
            + Sync
            + 'static,
        domain: D,
        config: RefinementConfig,
    ) -> Self {
        RefiningIntervalPolifunction {
            enclosure: Box::new(enclosure),
            narrow: Box::new(narrow),
            domain,
            config,
        }
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    /// Refine at `input`, checking `cancel` before every step
    pub fn value_interval_with(
        &self,
        input: &D::Element,
        cancel: Option<&CancelToken>,
    ) -> PolifunctionResult<Interval<Real>> {
        ensure_in_domain(self, input)?;
        let mut current = (self.enclosure)(input)?;

        for iteration in 0..self.config.max_iterations {
            if let Some(token) = cancel {
                token.check()?;
            }
            if self.converged(&current) {
                debug!(iteration, width = current.width().value(), "refinement converged");
                return Ok(current);
            }
            let next = (self.narrow)(input, &current)?;
            if !current.encloses(&next) {
                return Err(PolifunctionError::computation(
                    "refinement step widened the enclosure",
                ));
            }
            current = next;
        }

        if self.converged(&current) {
            return Ok(current);
        }
        let width = current.width().value();
        let threshold = self.threshold(&current);
        warn!(
            iterations = self.config.max_iterations,
            width,
            threshold,
            "refinement did not converge"
        );
        Err(PolifunctionError::Convergence {
            iterations: self.config.max_iterations,
            detail: format!("width {} above threshold {}", width, threshold),
        })
    }

    fn threshold(&self, interval: &Interval<Real>) -> f64 {
        let magnitude = interval
            .lower()
            .value()
            .abs()
            .max(interval.upper().value().abs())
            .max(1.0);
        self.config.tolerance * magnitude
    }

    fn converged(&self, interval: &Interval<Real>) -> bool {
        // NaN widths never converge
        interval.width().value() <= self.threshold(interval)
    }
}

impl<D: Domain> Polifunction for RefiningIntervalPolifunction<D> {
    type Input = D::Element;
    type Output = Real;

    fn evaluate(&self, input: &D::Element) -> PolifunctionResult<PolifunctionValue<Real>> {
        self.value_interval(input).map(PolifunctionValue::Interval)
    }

    fn in_domain(&self, input: &D::Element) -> bool {
        Domain::contains(&self.domain, input)
    }
}

impl<D: Domain> IntervalValuedPolifunction for RefiningIntervalPolifunction<D> {
    fn value_interval(&self, input: &D::Element) -> PolifunctionResult<Interval<Real>> {
        self.value_interval_with(input, None)
    }
}

/// Halve a square-root enclosure of `x`
pub fn bisect_sqrt(x: &Real, current: &Interval<Real>) -> PolifunctionResult<Interval<Real>> {
    let (lower, upper) = (*current.lower(), *current.upper());
    let mid = (lower + upper) / Real::new(2.0);
    if mid * mid <= *x {
        Interval::closed(mid, upper)
    } else {
        Interval::closed(lower, mid)
    }
}
