//! Polifunction Wire - Binary value format
//!
//! This crate implements the wire format for polifunction values:
//! - Fixed header (version + variant, 3 bytes)
//! - Element encodings
//! - Variant payloads

pub mod codec;
pub mod header;
pub mod value;

pub use codec::*;
pub use header::*;
pub use value::*;
