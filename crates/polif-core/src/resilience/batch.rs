//! Batched evaluation over an ordered sequence of inputs

use rayon::prelude::*;
use tracing::debug;

use crate::{CancelToken, Polifunction, PolifunctionResult, PolifunctionValue};

/// Batch evaluation configuration
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Fan per-input work out over the rayon pool
    pub parallel: bool,
    /// Batches shorter than this run sequentially even when `parallel` is set
    pub min_parallel_len: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            parallel: true,
            min_parallel_len: 64,
        }
    }
}

impl BatchConfig {
    /// Always evaluate on the calling thread
    pub fn sequential() -> Self {
        BatchConfig {
            parallel: false,
            ..Default::default()
        }
    }

    /// Parallelize every batch regardless of length
    pub fn always_parallel() -> Self {
        BatchConfig {
            parallel: true,
            min_parallel_len: 0,
        }
    }

    fn runs_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.min_parallel_len.max(2)
    }
}

fn evaluate_one<P>(
    pf: &P,
    input: &P::Input,
    cancel: Option<&CancelToken>,
) -> PolifunctionResult<PolifunctionValue<P::Output>>
where
    P: Polifunction + ?Sized,
{
    if let Some(token) = cancel {
        token.check()?;
    }
    pf.evaluate(input)
}

/// Evaluate `pf` at every input
///
/// Element `i` of the result is the outcome for `inputs[i]`, whatever order
/// the work completed in. Inputs reached after `cancel` trips fail with
/// [`PolifunctionError::Cancelled`](crate::PolifunctionError::Cancelled).
pub fn evaluate_batch<P>(
    pf: &P,
    inputs: &[P::Input],
    config: &BatchConfig,
    cancel: Option<&CancelToken>,
) -> Vec<PolifunctionResult<PolifunctionValue<P::Output>>>
where
    P: Polifunction + Sync + ?Sized,
    P::Input: Sync,
    P::Output: Send,
{
    if config.runs_parallel(inputs.len()) {
        debug!(len = inputs.len(), "parallel batch");
        inputs
            .par_iter()
            .map(|input| evaluate_one(pf, input, cancel))
            .collect()
    } else {
        debug!(len = inputs.len(), "sequential batch");
        inputs
            .iter()
            .map(|input| evaluate_one(pf, input, cancel))
            .collect()
    }
}

/// Evaluate `pf` at every input, failing with the error of the lowest-position
/// failing input
pub fn try_evaluate_batch<P>(
    pf: &P,
    inputs: &[P::Input],
    config: &BatchConfig,
    cancel: Option<&CancelToken>,
) -> PolifunctionResult<Vec<PolifunctionValue<P::Output>>>
where
    P: Polifunction + Sync + ?Sized,
    P::Input: Sync,
    P::Output: Send,
{
    evaluate_batch(pf, inputs, config, cancel)
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::{lift_to_set, PolifunctionError, Predicate, Universe};

    fn slow_identity() -> impl Polifunction<Input = i64, Output = i64> + Sync {
        lift_to_set(
            |n: &i64| {
                // later inputs finish first
                thread::sleep(Duration::from_micros((200 - *n as u64 % 200) * 10));
                Ok(*n)
            },
            Predicate::new(|n: &i64| *n >= 0),
            Universe::<i64>::new(),
        )
    }

    #[test]
    fn test_parallel_results_align_with_positions() {
        let pf = slow_identity();
        let inputs: Vec<i64> = (0..128).collect();
        let results = evaluate_batch(&pf, &inputs, &BatchConfig::always_parallel(), None);

        assert_eq!(results.len(), inputs.len());
        for (input, result) in inputs.iter().zip(results) {
            assert_eq!(result.unwrap(), PolifunctionValue::Set(BTreeSet::from([*input])));
        }
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let pf = slow_identity();
        let inputs: Vec<i64> = vec![5, -1, 7, -2, 0];
        let sequential = evaluate_batch(&pf, &inputs, &BatchConfig::sequential(), None);
        let parallel = evaluate_batch(&pf, &inputs, &BatchConfig::always_parallel(), None);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[1], Err(PolifunctionError::Domain));
    }

    #[test]
    fn test_try_batch_reports_first_position_error() {
        let pf = lift_to_set(
            |n: &i64| {
                if *n % 3 == 0 {
                    Err(PolifunctionError::computation(format!("multiple of three: {}", n)))
                } else {
                    Ok(*n)
                }
            },
            Universe::<i64>::new(),
            Universe::<i64>::new(),
        );
        let err = try_evaluate_batch(&pf, &[1, 2, 6, 9], &BatchConfig::always_parallel(), None)
            .unwrap_err();
        assert_eq!(err, PolifunctionError::computation("multiple of three: 6"));

        let ok = try_evaluate_batch(&pf, &[1, 2], &BatchConfig::default(), None).unwrap();
        assert_eq!(ok.len(), 2);
    }

    #[test]
    fn test_cancelled_batch() {
        let pf = slow_identity();
        let token = CancelToken::new();
        token.cancel();
        let results = evaluate_batch(&pf, &[1, 2, 3], &BatchConfig::default(), Some(&token));
        assert!(results
            .iter()
            .all(|r| r.as_ref().unwrap_err() == &PolifunctionError::Cancelled));
    }
}
