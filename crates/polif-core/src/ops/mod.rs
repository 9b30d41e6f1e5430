//! Operations that build new polifunctions from existing ones
//!
//! - Lifting: single-valued function → singleton-set polifunction
//! - Composition: chain two set-valued polifunctions, unioning over intermediates
//! - Conversion: set-valued → interval-valued via the `(min, max)` enclosure
//! - Inversion: swap inputs and outputs over a finite candidate set
//!
//! Every operation takes its operands by value and returns a new instance;
//! operands are never mutated. Pass `&p` or an `Arc` to keep using an operand.

mod compose;
mod convert;
mod invert;
mod lift;

pub use compose::*;
pub use convert::*;
pub use invert::*;
pub use lift::*;
