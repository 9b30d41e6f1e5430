//! Evaluation profiling

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::{ErrorKind, Polifunction, ValueShape};

/// Diagnostics configuration
#[derive(Clone, Debug, Default)]
pub struct DiagnosticsConfig {
    /// Emit a trace event per profiled input and a debug summary
    pub verbose: bool,
}

impl DiagnosticsConfig {
    pub fn verbose() -> Self {
        DiagnosticsConfig { verbose: true }
    }

    pub fn quiet() -> Self {
        DiagnosticsConfig { verbose: false }
    }
}

/// Outcome of one profiled evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileOutcome {
    Ok { shape: ValueShape },
    Err(ErrorKind),
}

impl ProfileOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProfileOutcome::Ok { .. })
    }
}

/// Timing of one evaluation
#[derive(Clone, Debug)]
pub struct ProfileRecord {
    /// Position of the input in the profiled sequence
    pub index: usize,
    pub elapsed: Duration,
    pub outcome: ProfileOutcome,
}

/// Per-input timings for a sequence of evaluations
#[derive(Clone, Debug, Default)]
pub struct ProfileReport {
    pub records: Vec<ProfileRecord>,
}

impl ProfileReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> Duration {
        self.records.iter().map(|r| r.elapsed).sum()
    }

    pub fn min(&self) -> Option<Duration> {
        self.records.iter().map(|r| r.elapsed).min()
    }

    pub fn max(&self) -> Option<Duration> {
        self.records.iter().map(|r| r.elapsed).max()
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.records.is_empty() {
            return None;
        }
        Some(self.total() / self.records.len() as u32)
    }

    /// Number of evaluations that returned an error
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| !r.outcome.is_ok()).count()
    }
}

/// Time `pf.evaluate` at each input, in order, on the calling thread
///
/// Failures are recorded, not propagated.
pub fn profile<P>(pf: &P, inputs: &[P::Input], config: &DiagnosticsConfig) -> ProfileReport
where
    P: Polifunction + ?Sized,
{
    let mut records = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.iter().enumerate() {
        let start = Instant::now();
        let result = pf.evaluate(input);
        let elapsed = start.elapsed();

        let outcome = match &result {
            Ok(value) => ProfileOutcome::Ok {
                shape: value.shape(),
            },
            Err(e) => ProfileOutcome::Err(e.kind()),
        };
        if config.verbose {
            trace!(index, ?elapsed, ?outcome, "profiled evaluation");
        }
        records.push(ProfileRecord {
            index,
            elapsed,
            outcome,
        });
    }

    let report = ProfileReport { records };
    if config.verbose {
        debug!(
            count = report.len(),
            failures = report.failures(),
            total = ?report.total(),
            "profile complete"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lift_to_set, to_interval, Predicate, Universe};

    #[test]
    fn test_profile_records_every_input() {
        let pf = lift_to_set(
            |n: &i64| Ok(n * 2),
            Predicate::new(|n: &i64| *n != 0),
            Universe::<i64>::new(),
        );
        let report = profile(&pf, &[1, 0, 3], &DiagnosticsConfig::verbose());

        assert_eq!(report.len(), 3);
        assert_eq!(report.failures(), 1);
        assert_eq!(
            report.records[0].outcome,
            ProfileOutcome::Ok {
                shape: ValueShape::Set
            }
        );
        assert_eq!(report.records[1].outcome, ProfileOutcome::Err(ErrorKind::Domain));
        assert_eq!(report.records[2].index, 2);

        let (min, max, mean) = (report.min().unwrap(), report.max().unwrap(), report.mean().unwrap());
        assert!(min <= mean && mean <= max);
        assert!(report.total() >= max);
    }

    #[test]
    fn test_profile_sees_shape() {
        let pf = to_interval(lift_to_set(
            |n: &i64| Ok(*n),
            Universe::<i64>::new(),
            Universe::<i64>::new(),
        ));
        let report = profile(&pf, &[5], &DiagnosticsConfig::default());
        assert_eq!(
            report.records[0].outcome,
            ProfileOutcome::Ok {
                shape: ValueShape::Interval
            }
        );
    }

    #[test]
    fn test_empty_report() {
        let pf = lift_to_set(|n: &i64| Ok(*n), Universe::<i64>::new(), Universe::<i64>::new());
        let report = profile(&pf, &[], &DiagnosticsConfig::quiet());
        assert!(report.is_empty());
        assert_eq!(report.mean(), None);
        assert_eq!(report.total(), Duration::ZERO);
    }
}
