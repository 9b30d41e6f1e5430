#![allow(clippy::missing_safety_doc)]
//! FFI functions over interval-valued real polifunctions

use std::ffi::{c_int, c_void};
use std::ptr;
use std::sync::Arc;

use polif_core::{
    bisect_sqrt, memoize, to_interval, BasicIntervalValuedPolifunction, Interval,
    IntervalValuedPolifunction, NonNegativeReals, Polifunction, PolifunctionError,
    PolifunctionResult, Real, RealRange, RefinementConfig, RefiningIntervalPolifunction,
};
use polif_wire::encode_value;

use crate::error::*;
use crate::set_handle::{profile_into, CallbackContext, PolifRealSetHandle};
use crate::types::*;

type DynRealInterval =
    dyn IntervalValuedPolifunction<Input = Real, Output = Real> + Send + Sync;

/// Opaque handle to an interval-valued polifunction over reals
pub struct PolifRealIntervalHandle {
    pub(crate) inner: Arc<DynRealInterval>,
}

impl PolifRealIntervalHandle {
    fn new(inner: Arc<DynRealInterval>) -> *mut PolifRealIntervalHandle {
        Box::into_raw(Box::new(PolifRealIntervalHandle { inner }))
    }
}

impl CallbackContext<PolifRealIntervalCallback> {
    fn call(&self, input: Real) -> PolifunctionResult<Interval<Real>> {
        let mut out = PolifRealInterval {
            lower: f64::NAN,
            upper: f64::NAN,
            lower_inclusive: true,
            upper_inclusive: true,
        };
        let status = (self.callback)(self.user_data, input.value(), &mut out);
        if status != 0 {
            return Err(PolifunctionError::Computation(format!(
                "callback returned status {}",
                status
            )));
        }
        Interval::try_from(out)
    }
}

/// Create an interval-valued polifunction from a callback
/// Returns a handle that must be freed with polif_real_interval_free
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_create(
    callback: Option<PolifRealIntervalCallback>,
    user_data: *mut c_void,
    domain: PolifRealBounds,
    codomain: PolifRealBounds,
) -> *mut PolifRealIntervalHandle {
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
    let pf = BasicIntervalValuedPolifunction::new(move |x: &Real| context.call(*x), domain, codomain);
    PolifRealIntervalHandle::new(Arc::new(pf))
}

/// `[min, max]` enclosure of a set-valued polifunction
/// The set handle is not consumed
#[no_mangle]
pub unsafe extern "C" fn polif_real_set_to_interval(
    handle: *const PolifRealSetHandle,
) -> *mut PolifRealIntervalHandle {
    if handle.is_null() {
        invalid_argument("Null handle");
        return ptr::null_mut();
    }

    PolifRealIntervalHandle::new(Arc::new(to_interval(Arc::clone(&(*handle).inner))))
}

/// Square root enclosure by bisection over non-negative reals
///
/// Refinement stops once the enclosure is at most `tolerance` times the
/// larger of 1 and the bound magnitudes wide; evaluations needing more
/// than `max_iterations` steps fail with Convergence.
#[no_mangle]
pub extern "C" fn polif_real_interval_sqrt(
    tolerance: f64,
    max_iterations: usize,
) -> *mut PolifRealIntervalHandle {
    if tolerance.is_nan() || tolerance < 0.0 {
        invalid_argument("Tolerance must be non-negative");
        return ptr::null_mut();
    }

    let pf = RefiningIntervalPolifunction::new(
        |x: &Real| Interval::closed(Real::ZERO, Real::new(x.value().max(1.0))),
        bisect_sqrt,
        NonNegativeReals,
        RefinementConfig {
            tolerance,
            max_iterations,
        },
    );
    PolifRealIntervalHandle::new(Arc::new(pf))
}

/// Cache outcomes of `handle` per input
/// Returns a new handle; the original stays valid
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_memoize(
    handle: *const PolifRealIntervalHandle,
) -> *mut PolifRealIntervalHandle {
    if handle.is_null() {
        invalid_argument("Null handle");
        return ptr::null_mut();
    }

    PolifRealIntervalHandle::new(Arc::new(memoize(Arc::clone(&(*handle).inner))))
}

/// Free an interval handle
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_free(handle: *mut PolifRealIntervalHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Whether `input` is in the domain
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_in_domain(
    handle: *const PolifRealIntervalHandle,
    input: f64,
    out: *mut bool,
) -> c_int {
    if handle.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    *out = (*handle).inner.in_domain(&Real::new(input));
    PolifErrorCode::Ok.into()
}

/// Output interval at `input`
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_value(
    handle: *const PolifRealIntervalHandle,
    input: f64,
    out: *mut PolifRealInterval,
) -> c_int {
    if handle.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    match (*handle).inner.value_interval(&Real::new(input)) {
        Ok(interval) => {
            *out = PolifRealInterval::from(&interval);
            PolifErrorCode::Ok.into()
        }
        Err(e) => report(&e),
    }
}

/// Evaluate and encode the result in the wire format
/// The buffer must be freed with polif_free_bytes
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_evaluate(
    handle: *const PolifRealIntervalHandle,
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

/// Whether `value` lies in the output interval, honoring inclusivity
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_contains(
    handle: *const PolifRealIntervalHandle,
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

/// `upper - lower` of the output interval
/// Non-finite widths fail with Computation
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_width(
    handle: *const PolifRealIntervalHandle,
    input: f64,
    out: *mut f64,
) -> c_int {
    if handle.is_null() || out.is_null() {
        return invalid_argument("Null pointer");
    }

    match (*handle).inner.interval_width(&Real::new(input)) {
        Ok(width) => {
            *out = width.value();
            PolifErrorCode::Ok.into()
        }
        Err(e) => report(&e),
    }
}

/// Time evaluation of each input, as polif_real_set_profile
#[no_mangle]
pub unsafe extern "C" fn polif_real_interval_profile(
    handle: *const PolifRealIntervalHandle,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set_handle::tests::{lift, sqrt_abs, square};
    use crate::set_handle::{polif_real_set_free, polif_real_set_union};

    extern "C" fn around(_: *mut c_void, x: f64, out: *mut PolifRealInterval) -> c_int {
        unsafe {
            *out = PolifRealInterval {
                lower: x - 1.0,
                upper: x + 1.0,
                lower_inclusive: true,
                upper_inclusive: true,
            };
        }
        0
    }

    extern "C" fn inverted(_: *mut c_void, _: f64, out: *mut PolifRealInterval) -> c_int {
        unsafe {
            *out = PolifRealInterval {
                lower: 1.0,
                upper: 0.0,
                lower_inclusive: true,
                upper_inclusive: true,
            };
        }
        0
    }

    extern "C" fn widest(_: *mut c_void, _: f64, out: *mut PolifRealInterval) -> c_int {
        unsafe {
            *out = PolifRealInterval {
                lower: f64::MIN,
                upper: f64::MAX,
                lower_inclusive: true,
                upper_inclusive: true,
            };
        }
        0
    }

    unsafe fn create(callback: PolifRealIntervalCallback) -> *mut PolifRealIntervalHandle {
        polif_real_interval_create(
            Some(callback),
            ptr::null_mut(),
            PolifRealBounds::unbounded(),
            PolifRealBounds::unbounded(),
        )
    }

    #[test]
    fn test_interval_create_and_query() {
        unsafe {
            let handle = create(around);
            let mut interval = PolifRealInterval {
                lower: 0.0,
                upper: 0.0,
                lower_inclusive: false,
                upper_inclusive: false,
            };
            assert_eq!(polif_real_interval_value(handle, 3.0, &mut interval), 0);
            assert_eq!((interval.lower, interval.upper), (2.0, 4.0));
            assert!(interval.lower_inclusive && interval.upper_inclusive);

            let mut found = false;
            assert_eq!(polif_real_interval_contains(handle, 3.0, 4.0, &mut found), 0);
            assert!(found);
            assert_eq!(polif_real_interval_contains(handle, 3.0, 4.0000001, &mut found), 0);
            assert!(!found);

            let mut width = 0.0;
            assert_eq!(polif_real_interval_width(handle, 3.0, &mut width), 0);
            assert_eq!(width, 2.0);

            polif_real_interval_free(handle);
        }
    }

    #[test]
    fn test_inverted_bounds_are_computation_error() {
        unsafe {
            let handle = create(inverted);
            let mut width = 0.0;
            assert_eq!(
                polif_real_interval_width(handle, 0.0, &mut width),
                PolifErrorCode::Computation as c_int
            );
            polif_real_interval_free(handle);
        }
    }

    #[test]
    fn test_set_to_interval() {
        unsafe {
            let (sq, root) = (lift(square), lift(sqrt_abs));
            let union = polif_real_set_union(sq, root);
            let handle = polif_real_set_to_interval(union);

            let mut interval = PolifRealInterval {
                lower: 0.0,
                upper: 0.0,
                lower_inclusive: false,
                upper_inclusive: false,
            };
            assert_eq!(polif_real_interval_value(handle, 2.0, &mut interval), 0);
            assert_eq!(interval.lower, std::f64::consts::SQRT_2);
            assert_eq!(interval.upper, 4.0);

            let mut bytes = PolifBytes::empty();
            assert_eq!(polif_real_interval_evaluate(handle, 2.0, &mut bytes), 0);
            assert_eq!(bytes.as_slice()[2], polif_core::ValueShape::Interval.to_byte());
            crate::polif_free_bytes(bytes);

            polif_real_interval_free(handle);
            polif_real_set_free(union);
            polif_real_set_free(sq);
            polif_real_set_free(root);
        }
    }

    #[test]
    fn test_sqrt_refinement() {
        unsafe {
            let handle = polif_real_interval_sqrt(1e-9, 100);
            let mut found = false;
            assert_eq!(
                polif_real_interval_contains(handle, 2.0, std::f64::consts::SQRT_2, &mut found),
                0
            );
            assert!(found);
            polif_real_interval_free(handle);

            let starved = polif_real_interval_sqrt(1e-12, 3);
            let mut width = 0.0;
            assert_eq!(
                polif_real_interval_width(starved, 2.0, &mut width),
                PolifErrorCode::Convergence as c_int
            );
            polif_real_interval_free(starved);

            assert!(polif_real_interval_sqrt(f64::NAN, 10).is_null());
        }
    }

    #[test]
    fn test_interval_in_domain() {
        unsafe {
            let handle = polif_real_interval_sqrt(1e-9, 100);
            let mut inside = false;
            assert_eq!(polif_real_interval_in_domain(handle, 2.0, &mut inside), 0);
            assert!(inside);
            assert_eq!(polif_real_interval_in_domain(handle, -2.0, &mut inside), 0);
            assert!(!inside);

            crate::polif_clear_error();
            assert_eq!(
                polif_real_interval_in_domain(ptr::null(), 2.0, &mut inside),
                PolifErrorCode::Ffi as c_int
            );
            assert!(!crate::polif_last_error().is_null());
            assert_eq!(
                polif_real_interval_in_domain(handle, 2.0, ptr::null_mut()),
                PolifErrorCode::Ffi as c_int
            );
            polif_real_interval_free(handle);
        }
    }

    #[test]
    fn test_interval_memoize() {
        unsafe {
            let handle = create(around);
            let memo = polif_real_interval_memoize(handle);
            polif_real_interval_free(handle);
            assert!(!memo.is_null());

            let mut interval = PolifRealInterval {
                lower: 0.0,
                upper: 0.0,
                lower_inclusive: false,
                upper_inclusive: false,
            };
            for _ in 0..2 {
                assert_eq!(polif_real_interval_value(memo, 3.0, &mut interval), 0);
                assert_eq!((interval.lower, interval.upper), (2.0, 4.0));
            }
            let mut width = 0.0;
            assert_eq!(polif_real_interval_width(memo, 3.0, &mut width), 0);
            assert_eq!(width, 2.0);

            polif_real_interval_free(memo);
            assert!(polif_real_interval_memoize(ptr::null()).is_null());
        }
    }

    #[test]
    fn test_interval_profile() {
        unsafe {
            let handle = polif_real_interval_sqrt(1e-9, 100);
            let inputs = [4.0, -1.0, 9.0];
            let mut records = [PolifProfileRecord {
                index: 0,
                elapsed_ns: 0,
                status: 0,
                shape: 0,
            }; 3];
            let mut summary = PolifProfileSummary::default();

            let status = polif_real_interval_profile(
                handle,
                inputs.as_ptr(),
                inputs.len(),
                records.as_mut_ptr(),
                &mut summary,
            );
            assert_eq!(status, 0);
            assert_eq!(summary.count, 3);
            assert_eq!(summary.failures, 1);
            assert_eq!(records[0].shape, polif_core::ValueShape::Interval.to_byte());
            assert_eq!(records[1].status, PolifErrorCode::Domain as c_int);
            assert_eq!(records[2].index, 2);

            assert_eq!(
                polif_real_interval_profile(
                    ptr::null(),
                    inputs.as_ptr(),
                    inputs.len(),
                    ptr::null_mut(),
                    &mut summary
                ),
                PolifErrorCode::Ffi as c_int
            );
            polif_real_interval_free(handle);
        }
    }

    #[test]
    fn test_overflowing_width_is_computation_error() {
        unsafe {
            let handle = create(widest);
            let mut interval = PolifRealInterval {
                lower: 0.0,
                upper: 0.0,
                lower_inclusive: false,
                upper_inclusive: false,
            };
            assert_eq!(polif_real_interval_value(handle, 0.0, &mut interval), 0);

            let mut width = 0.0;
            assert_eq!(
                polif_real_interval_width(handle, 0.0, &mut width),
                PolifErrorCode::Computation as c_int
            );
            polif_real_interval_free(handle);
        }
    }
}
