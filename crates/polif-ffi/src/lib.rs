#![allow(clippy::missing_safety_doc)]
//! Polifunction FFI - Foreign Function Interface
//!
//! C-compatible bindings over real-valued polifunctions.
//! Each concrete instantiation gets its own opaque handle type; every
//! `*_create`/`*_lift` pairs with exactly one `*_free`.

pub mod error;
pub mod interval_handle;
pub mod set_handle;
pub mod types;

use std::ffi::{c_char, c_int};
use std::sync::atomic::{AtomicBool, Ordering};

use polif_core::{DiagnosticsConfig, PolifunctionValue, Real};
use polif_wire::decode_value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::set_handle::write_reals;

pub use error::*;
pub use interval_handle::*;
pub use set_handle::*;
pub use types::*;

static DIAGNOSTICS: AtomicBool = AtomicBool::new(false);

/// Snapshot of the process-wide diagnostics flag
pub(crate) fn diagnostics_config() -> DiagnosticsConfig {
    DiagnosticsConfig {
        verbose: DIAGNOSTICS.load(Ordering::Relaxed),
    }
}

/// Library version
#[no_mangle]
pub extern "C" fn polif_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

/// Initialize the library
/// Installs a log subscriber filtered by `RUST_LOG` unless one is already set.
/// Returns 0 on success
#[no_mangle]
pub extern "C" fn polif_init() -> c_int {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
    info!(version = env!("CARGO_PKG_VERSION"), "polifunction library initialized");
    0
}

/// Shutdown the library
/// Resets diagnostics and clears this thread's last error
#[no_mangle]
pub extern "C" fn polif_shutdown() {
    DIAGNOSTICS.store(false, Ordering::Relaxed);
    polif_clear_error();
}

/// Enable or disable verbose profiling output
#[no_mangle]
pub extern "C" fn polif_set_diagnostics(enabled: bool) {
    DIAGNOSTICS.store(enabled, Ordering::Relaxed);
}

#[no_mangle]
pub extern "C" fn polif_diagnostics_enabled() -> bool {
    DIAGNOSTICS.load(Ordering::Relaxed)
}

/// Free a byte buffer returned by the library
#[no_mangle]
pub unsafe extern "C" fn polif_free_bytes(bytes: PolifBytes) {
    drop(bytes.into_vec());
}

/// Decode an encoded real value
///
/// `out_shape` receives the variant byte. `out_values` receives the single
/// value, the set elements in ascending order, the interval bounds
/// `[lower, upper]`, or the elements of a distribution or fuzzy set.
/// `out_len` always receives the number of values.
#[no_mangle]
pub unsafe extern "C" fn polif_value_decode_real(
    data: *const u8,
    len: usize,
    out_shape: *mut u8,
    out_values: *mut f64,
    capacity: usize,
    out_len: *mut usize,
) -> c_int {
    if data.is_null() || out_shape.is_null() || out_len.is_null() {
        return invalid_argument("Null pointer");
    }

    let value = match decode_value::<Real>(std::slice::from_raw_parts(data, len)) {
        Ok(value) => value,
        Err(e) => return report(&e),
    };
    *out_shape = value.shape().to_byte();

    let values: Vec<f64> = match &value {
        PolifunctionValue::Single(v) => vec![v.value()],
        PolifunctionValue::Set(set) => set.iter().map(|v| v.value()).collect(),
        PolifunctionValue::Interval(i) => vec![i.lower().value(), i.upper().value()],
        PolifunctionValue::Distribution(d) => d.entries().iter().map(|(v, _)| v.value()).collect(),
        PolifunctionValue::FuzzySet(f) => f.members().iter().map(|(v, _)| v.value()).collect(),
    };
    *out_len = values.len();
    write_reals(values.iter().copied(), values.len(), out_values, capacity)
}

/// Decode an encoded real interval, keeping bound inclusivity
#[no_mangle]
pub unsafe extern "C" fn polif_value_decode_real_interval(
    data: *const u8,
    len: usize,
    out: *mut PolifRealInterval,
) -> c_int {
    if data.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    match decode_value::<Real>(std::slice::from_raw_parts(data, len)) {
        Ok(PolifunctionValue::Interval(interval)) => {
            *out = PolifRealInterval::from(&interval);
            PolifErrorCode::Ok.into()
        }
        Ok(other) => report(&polif_core::PolifunctionError::Ffi(format!(
            "expected an interval, got {:?}",
            other.shape()
        ))),
        Err(e) => report(&e),
    }
}
