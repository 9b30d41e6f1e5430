//! FFI Error handling

use std::ffi::{c_char, c_int, CString};

use polif_core::{ErrorKind, PolifunctionError};
use tracing::debug;

/// Error codes for FFI functions
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolifErrorCode {
    /// Success
    Ok = 0,
    /// Input outside the domain
    Domain = -1,
    /// Mapping failed or produced an invalid result
    Computation = -2,
    /// Iteration budget exhausted
    Convergence = -3,
    /// Cancelled or past deadline
    Cancelled = -4,
    /// Malformed or version-mismatched bytes
    Serialization = -5,
    /// Null handle or pointer, invalid argument
    Ffi = -6,
    /// Output buffer smaller than the result
    BufferTooSmall = -7,
}

impl From<PolifErrorCode> for c_int {
    fn from(code: PolifErrorCode) -> Self {
        code as c_int
    }
}

impl From<ErrorKind> for PolifErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Domain => PolifErrorCode::Domain,
            ErrorKind::Computation => PolifErrorCode::Computation,
            ErrorKind::Convergence => PolifErrorCode::Convergence,
            ErrorKind::Cancelled => PolifErrorCode::Cancelled,
            ErrorKind::Serialization => PolifErrorCode::Serialization,
            ErrorKind::Ffi => PolifErrorCode::Ffi,
        }
    }
}

thread_local! {
    static LAST_ERROR: std::cell::RefCell<Option<CString>> =
        const { std::cell::RefCell::new(None) };
}

/// Set the last error message
pub fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Record `err` as the last error and return its code
pub fn report(err: &PolifunctionError) -> c_int {
    debug!(kind = %err.kind(), error = %err, "ffi call failed");
    set_last_error(&err.to_string());
    PolifErrorCode::from(err.kind()).into()
}

/// Record an invalid-argument failure and return [`PolifErrorCode::Ffi`]
pub fn invalid_argument(msg: &str) -> c_int {
    report(&PolifunctionError::Ffi(msg.to_string()))
}

/// Get the last error message
/// Returns NULL if no error
///
/// The pointer stays valid until the next failing call on this thread.
#[no_mangle]
pub extern "C" fn polif_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(s) => s.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Clear the last error
#[no_mangle]
pub extern "C" fn polif_clear_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Convert a result to a C status code, recording the error message on failure
pub fn result_to_int<T>(result: Result<T, PolifunctionError>) -> c_int {
    match result {
        Ok(_) => PolifErrorCode::Ok.into(),
        Err(e) => report(&e),
    }
}
