//! Error types for polifunction operations

use std::fmt;

use thiserror::Error;

/// Core polifunction errors
///
/// Every fallible operation in the workspace reports through this enum.
/// Composite operations hand sub-errors back unchanged, so the variant a
/// caller sees is the variant the failing leaf produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolifunctionError {
    /// Input fails the domain predicate
    #[error("input is outside the domain")]
    Domain,

    /// Mapping logic failed or produced a structurally invalid result
    #[error("computation failed: {0}")]
    Computation(String),

    /// Iterative process exhausted its budget
    #[error("failed to converge after {iterations} iterations: {detail}")]
    Convergence { iterations: usize, detail: String },

    /// Cooperative cancellation or deadline observed
    #[error("evaluation cancelled")]
    Cancelled,

    // Wire errors
    #[error("serialization error: {0}")]
    Serialization(String),

    // Boundary errors
    #[error("ffi error: {0}")]
    Ffi(String),
}

impl PolifunctionError {
    /// Shorthand for a computation error with a message
    pub fn computation(msg: impl Into<String>) -> Self {
        PolifunctionError::Computation(msg.into())
    }

    /// Shorthand for a serialization error with a message
    pub fn serialization(msg: impl Into<String>) -> Self {
        PolifunctionError::Serialization(msg.into())
    }

    /// The variant discriminant, without payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            PolifunctionError::Domain => ErrorKind::Domain,
            PolifunctionError::Computation(_) => ErrorKind::Computation,
            PolifunctionError::Convergence { .. } => ErrorKind::Convergence,
            PolifunctionError::Cancelled => ErrorKind::Cancelled,
            PolifunctionError::Serialization(_) => ErrorKind::Serialization,
            PolifunctionError::Ffi(_) => ErrorKind::Ffi,
        }
    }
}

/// Payload-free error classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    Domain = 1,
    Computation = 2,
    Convergence = 3,
    Cancelled = 4,
    Serialization = 5,
    Ffi = 6,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Domain => "domain",
            ErrorKind::Computation => "computation",
            ErrorKind::Convergence => "convergence",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Ffi => "ffi",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for polifunction operations
pub type PolifunctionResult<T> = Result<T, PolifunctionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(PolifunctionError::Domain.kind(), ErrorKind::Domain);
        assert_eq!(
            PolifunctionError::computation("boom").kind(),
            ErrorKind::Computation
        );
        assert_eq!(
            PolifunctionError::Convergence {
                iterations: 3,
                detail: "width 0.5".into()
            }
            .kind(),
            ErrorKind::Convergence
        );
        assert_eq!(PolifunctionError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            PolifunctionError::serialization("short").kind(),
            ErrorKind::Serialization
        );
        assert_eq!(PolifunctionError::Ffi("null".into()).kind(), ErrorKind::Ffi);
    }

    #[test]
    fn test_display_keeps_message() {
        let err = PolifunctionError::computation("no interval defined for an empty solution set");
        assert_eq!(
            err.to_string(),
            "computation failed: no interval defined for an empty solution set"
        );
        assert_eq!(ErrorKind::Cancelled.to_string(), "cancelled");
    }
}
