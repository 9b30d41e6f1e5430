//! Polifunction Test Harness - Fixtures and end-to-end validation
//!
//! This crate provides:
//! - Shared real and integer polifunction fixtures
//! - Seeded input generation
//! - Contract law checking over generated inputs
//! - End-to-end scenarios across core and wire

pub mod fixtures;
pub mod integration;

pub use fixtures::*;
pub use integration::*;
