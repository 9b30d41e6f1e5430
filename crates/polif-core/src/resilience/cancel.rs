//! Cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{PolifunctionError, PolifunctionResult};

/// Shared cancellation flag with an optional deadline
///
/// Clones observe the same flag. Long-running evaluations call
/// [`CancelToken::check`] between units of work and stop with
/// [`PolifunctionError::Cancelled`] instead of returning a partial value.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that trips once `deadline` has passed
    pub fn with_deadline(deadline: Instant) -> Self {
        CancelToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// Token that trips `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.map_or(false, |d| Instant::now() >= d)
    }

    #[inline]
    pub fn check(&self) -> PolifunctionResult<()> {
        if self.is_cancelled() {
            Err(PolifunctionError::Cancelled)
        } else {
            Ok(())
        }
    }
}
