//! Evaluation strategies layered over any polifunction
//!
//! - [`CancelToken`]: cooperative cancellation and deadlines
//! - [`MemoizedPolifunction`]: lazy per-input cache with a compute-once guard
//! - [`evaluate_batch`]: position-aligned batched evaluation, optionally parallel

mod batch;
mod cancel;
mod memo;

pub use batch::*;
pub use cancel::*;
pub use memo::*;
