//! Polifunction Core - Multi-valued mappings and their algebra
//!
//! This crate defines the core types used throughout the polifunction library:
//! - Errors (PolifunctionError, ErrorKind)
//! - Spaces (Domain, Codomain, Real and the standard domains)
//! - Values (PolifunctionValue, Interval, Distribution, FuzzySet)
//! - Contracts (Polifunction, SetValuedPolifunction, IntervalValuedPolifunction)
//! - Operations (lift, compose, to_interval, invert)
//! - Evaluation strategies (memoization, batching, cancellation, refinement)

pub mod error;
pub mod space;
pub mod value;
pub mod polifunction;
pub mod set_valued;
pub mod interval_valued;
pub mod ops;
pub mod refine;
pub mod resilience;
pub mod diagnostics;

pub use error::*;
pub use space::*;
pub use value::*;
pub use polifunction::*;
pub use set_valued::*;
pub use interval_valued::*;
pub use ops::*;
pub use refine::*;
pub use resilience::*;
pub use diagnostics::*;
