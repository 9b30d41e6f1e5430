#![allow(clippy::missing_safety_doc)]
//! FFI functions over set-valued real polifunctions

use std::ffi::{c_int, c_void};
use std::ptr;
use std::sync::Arc;

use polif_core::{
    compose_into, lift_to_set, memoize, profile, Polifunction, PolifunctionError,
    PolifunctionResult, Real, RealRange, SetValuedPolifunction, UnionPolifunction,
};
use polif_wire::encode_value;

use crate::error::*;
use crate::types::*;

pub(crate) type DynRealSet = dyn SetValuedPolifunction<Input = Real, Output = Real> + Send + Sync;

/// Opaque handle to a set-valued polifunction over reals
///
/// Handles are immutable: union and composition build new handles that
/// share their operands, so every handle is freed independently.
pub struct PolifRealSetHandle {
    pub(crate) inner: Arc<DynRealSet>,
}

impl PolifRealSetHandle {
    pub(crate) fn new(inner: Arc<DynRealSet>) -> *mut PolifRealSetHandle {
        Box::into_raw(Box::new(PolifRealSetHandle { inner }))
    }
}

/// Caller-supplied callback plus its context pointer
pub(crate) struct CallbackContext<F> {
    pub(crate) callback: F,
    pub(crate) user_data: *mut c_void,
}

// The callback contract requires thread-safe callbacks and user data
unsafe impl<F> Send for CallbackContext<F> {}
unsafe impl<F> Sync for CallbackContext<F> {}

impl CallbackContext<PolifRealCallback> {
    fn call(&self, input: Real) -> PolifunctionResult<Real> {
        let mut out = f64::NAN;
        let status = (self.callback)(self.user_data, input.value(), &mut out);
        if status != 0 {
            return Err(PolifunctionError::Computation(format!(
                "callback returned status {}",
                status
            )));
        }
        Ok(Real::new(out))
    }
}

/// Lift a single-valued callback into a set-valued polifunction
/// Returns a handle that must be freed with polif_real_set_free
#[no_mangle]
pub unsafe extern "C" fn polif_real_lift(
    callback: Option<PolifRealCallback>,
    user_data: *mut c_void,
    domain: PolifRealBounds,
    codomain: PolifRealBounds,
) -> *mut PolifRealSetHandle {
    let Some(callback) = callback else {
        invalid_argument("Null callback");
        return ptr::null_mut();
    };
    let (domain, codomain) = match (RealRange::try_from(domain), RealRange::try_from(codomain)) {
        (Ok(d), Ok(c)) => (d, c),
        (Err(e), _) | (_, Err(e)) => {
            report(&e);
            return ptr::null_mut();
        }
    };

    let context = CallbackContext {
        callback,
        user_data,
    };
    let lifted = lift_to_set(move |x: &Real| context.call(*x), domain, codomain);
    PolifRealSetHandle::new(Arc::new(lifted))
}

/// Union of two set-valued polifunctions
/// Neither operand is consumed
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_union(
    a: *const PolifRealSetHandle,
    b: *const PolifRealSetHandle,
) -> *mut PolifRealSetHandle {
    if a.is_null() || b.is_null() {
        invalid_argument("Null handle");
        return ptr::null_mut();
    }

    let union = UnionPolifunction::new(Arc::clone(&(*a).inner), Arc::clone(&(*b).inner));
    PolifRealSetHandle::new(Arc::new(union))
}

/// `outer ∘ inner`
/// Neither operand is consumed
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_compose(
    outer: *const PolifRealSetHandle,
    inner: *const PolifRealSetHandle,
) -> *mut PolifRealSetHandle {
    if outer.is_null() || inner.is_null() {
        invalid_argument("Null handle");
        return ptr::null_mut();
    }

    let composed = compose_into(Arc::clone(&(*outer).inner), Arc::clone(&(*inner).inner));
    PolifRealSetHandle::new(Arc::new(composed))
}

/// Cache outcomes of `handle` per input
/// Returns a new handle; the original stays valid
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_memoize(
    handle: *const PolifRealSetHandle,
) -> *mut PolifRealSetHandle {
    if handle.is_null() {
        invalid_argument("Null handle");
        return ptr::null_mut();
    }

    PolifRealSetHandle::new(Arc::new(memoize(Arc::clone(&(*handle).inner))))
}

/// Free a set handle
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_free(handle: *mut PolifRealSetHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Whether `input` is in the domain
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_in_domain(
    handle: *const PolifRealSetHandle,
    input: f64,
    out: *mut bool,
) -> c_int {
    if handle.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    *out = (*handle).inner.in_domain(&Real::new(input));
    PolifErrorCode::Ok.into()
}

/// Evaluate and encode the result in the wire format
/// The buffer must be freed with polif_free_bytes
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_evaluate(
    handle: *const PolifRealSetHandle,
    input: f64,
    out: *mut PolifBytes,
) -> c_int {
    if handle.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    *out = PolifBytes::empty();
    let encoded = (*handle)
        .inner
        .evaluate(&Real::new(input))
        .and_then(|value| encode_value(&value));
    match encoded {
        Ok(bytes) => {
            *out = PolifBytes::from_vec(bytes);
            PolifErrorCode::Ok.into()
        }
        Err(e) => report(&e),
    }
}

/// Copy the output set, ascending, into `out_values`
///
/// `out_len` always receives the set size. When `capacity` is smaller,
/// nothing is copied and BufferTooSmall is returned.
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_values(
    handle: *const PolifRealSetHandle,
    input: f64,
    out_values: *mut f64,
    capacity: usize,
    out_len: *mut usize,
) -> c_int {
    if handle.is_null() || out_len.is_null() {
        return invalid_argument("Null pointer");
    }

    let values = match (*handle).inner.value_set(&Real::new(input)) {
        Ok(values) => values,
        Err(e) => return report(&e),
    };
    *out_len = values.len();
    write_reals(values.iter().map(|v| v.value()), values.len(), out_values, capacity)
}

/// Copy `len` values into a caller buffer of `capacity` slots
pub(crate) unsafe fn write_reals(
    values: impl Iterator<Item = f64>,
    len: usize,
    out: *mut f64,
    capacity: usize,
) -> c_int {
    if len > capacity {
        set_last_error(&format!("buffer holds {} values, result has {}", capacity, len));
        return PolifErrorCode::BufferTooSmall.into();
    }
    if len > 0 && out.is_null() {
        return invalid_argument("Null output buffer");
    }
    for (i, value) in values.enumerate() {
        *out.add(i) = value;
    }
    PolifErrorCode::Ok.into()
}

/// Membership test of `value` in the output set at `input`
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_contains(
    handle: *const PolifRealSetHandle,
    input: f64,
    value: f64,
    out: *mut bool,
) -> c_int {
    if handle.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    match (*handle)
        .inner
        .contains_value(&Real::new(input), &Real::new(value))
    {
        Ok(found) => {
            *out = found;
            PolifErrorCode::Ok.into()
        }
        Err(e) => report(&e),
    }
}

/// Size of the output set at `input`
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_cardinality(
    handle: *const PolifRealSetHandle,
    input: f64,
    out: *mut usize,
) -> c_int {
    if handle.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    match (*handle).inner.cardinality(&Real::new(input)) {
        Ok(n) => {
            *out = n;
            PolifErrorCode::Ok.into()
        }
        Err(e) => report(&e),
    }
}

/// Time an evaluation per input
///
/// `out_records` may be null; otherwise it must hold `len` records.
/// Failed evaluations are recorded, not reported. Verbose tracing follows
/// polif_set_diagnostics.
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_profile(
    handle: *const PolifRealSetHandle,
    inputs: *const f64,
    len: usize,
    out_records: *mut PolifProfileRecord,
    out_summary: *mut PolifProfileSummary,
) -> c_int {
    if handle.is_null() {
        return invalid_argument("Null pointer");
    }

    profile_into(&*(*handle).inner, inputs, len, out_records, out_summary)
}

/// Profile `pf` over a caller array of inputs and write the results
pub(crate) unsafe fn profile_into<P>(
    pf: &P,
    inputs: *const f64,
    len: usize,
    out_records: *mut PolifProfileRecord,
    out_summary: *mut PolifProfileSummary,
) -> c_int
where
    P: Polifunction<Input = Real> + ?Sized,
{
    if out_summary.is_null() || (len > 0 && inputs.is_null()) {
        return invalid_argument("Null pointer");
    }

    let inputs: Vec<Real> = if len == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(inputs, len)
            .iter()
            .copied()
            .map(Real::new)
            .collect()
    };
    let report = profile(pf, &inputs, &crate::diagnostics_config());

    if !out_records.is_null() {
        for (i, record) in report.records.iter().enumerate() {
            *out_records.add(i) = PolifProfileRecord::from(record);
        }
    }
    *out_summary = PolifProfileSummary::from(&report);
    PolifErrorCode::Ok.into()
}
