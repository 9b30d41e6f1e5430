//! FFI Types - C-compatible type definitions

use std::ffi::{c_int, c_void};

use polif_core::{
    Interval, PolifunctionError, PolifunctionResult, ProfileOutcome, ProfileRecord, ProfileReport,
    Real, RealRange,
};

use crate::error::PolifErrorCode;

/// Byte buffer for passing data across FFI
///
/// Buffers returned by the library must be released with `polif_free_bytes`.
#[repr(C)]
pub struct PolifBytes {
    pub data: *mut u8,
    pub len: usize,
    pub capacity: usize,
}

impl PolifBytes {
    /// Create from a `Vec<u8>`, transferring ownership
    pub fn from_vec(mut v: Vec<u8>) -> Self {
        let result = Self {
            data: v.as_mut_ptr(),
            len: v.len(),
            capacity: v.capacity(),
        };
        std::mem::forget(v);
        result
    }

    /// Create an empty buffer
    pub fn empty() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0 || self.data.is_null()
    }

    /// View the bytes
    ///
    /// # Safety
    /// `data` must point to `len` readable bytes, or be null.
    pub unsafe fn as_slice(&self) -> &[u8] {
        if self.data.is_null() {
            &[]
        } else {
            std::slice::from_raw_parts(self.data, self.len)
        }
    }

    /// Take back ownership of a buffer built by [`PolifBytes::from_vec`]
    ///
    /// # Safety
    /// The buffer must come from `from_vec` and must not be used afterwards.
    pub unsafe fn into_vec(self) -> Option<Vec<u8>> {
        if self.data.is_null() {
            None
        } else {
            Some(Vec::from_raw_parts(self.data, self.len, self.capacity))
        }
    }
}

/// Real interval with bound inclusivity
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolifRealInterval {
    pub lower: f64,
    pub upper: f64,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl From<&Interval<Real>> for PolifRealInterval {
    fn from(interval: &Interval<Real>) -> Self {
        Self {
            lower: interval.lower().value(),
            upper: interval.upper().value(),
            lower_inclusive: interval.lower_inclusive(),
            upper_inclusive: interval.upper_inclusive(),
        }
    }
}

impl TryFrom<PolifRealInterval> for Interval<Real> {
    type Error = PolifunctionError;

    fn try_from(raw: PolifRealInterval) -> PolifunctionResult<Self> {
        Interval::new(
            Real::new(raw.lower),
            Real::new(raw.upper),
            raw.lower_inclusive,
            raw.upper_inclusive,
        )
    }
}

/// Closed bounds describing a domain or codomain
///
/// Infinite bounds leave that side open to every finite real.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolifRealBounds {
    pub min: f64,
    pub max: f64,
}

impl PolifRealBounds {
    /// All finite reals
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

impl TryFrom<PolifRealBounds> for RealRange {
    type Error = PolifunctionError;

    fn try_from(bounds: PolifRealBounds) -> PolifunctionResult<Self> {
        RealRange::new(Real::new(bounds.min), Real::new(bounds.max)).map_err(|e| {
            PolifunctionError::Ffi(format!("invalid bounds [{}, {}]: {}", bounds.min, bounds.max, e))
        })
    }
}

/// Timing of one profiled evaluation
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolifProfileRecord {
    pub index: usize,
    pub elapsed_ns: u64,
    /// 0 on success, otherwise the error code of the failure
    pub status: c_int,
    /// Shape byte of the produced value, 0 on failure
    pub shape: u8,
}

impl From<&ProfileRecord> for PolifProfileRecord {
    fn from(record: &ProfileRecord) -> Self {
        let (status, shape) = match record.outcome {
            ProfileOutcome::Ok { shape } => (PolifErrorCode::Ok.into(), shape.to_byte()),
            ProfileOutcome::Err(kind) => (PolifErrorCode::from(kind).into(), 0),
        };
        Self {
            index: record.index,
            elapsed_ns: duration_ns(record.elapsed),
            status,
            shape,
        }
    }
}

/// Aggregate timings of a profile run
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolifProfileSummary {
    pub count: usize,
    pub failures: usize,
    pub min_ns: u64,
    pub max_ns: u64,
    pub mean_ns: u64,
    pub total_ns: u64,
}

impl From<&ProfileReport> for PolifProfileSummary {
    fn from(report: &ProfileReport) -> Self {
        Self {
            count: report.len(),
            failures: report.failures(),
            min_ns: report.min().map_or(0, duration_ns),
            max_ns: report.max().map_or(0, duration_ns),
            mean_ns: report.mean().map_or(0, duration_ns),
            total_ns: duration_ns(report.total()),
        }
    }
}

fn duration_ns(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Single-valued real mapping supplied by the caller
///
/// Writes the result to `out` and returns 0, or returns a nonzero status on
/// failure. Must be safe to call from several threads at once.
pub type PolifRealCallback =
    extern "C" fn(user_data: *mut c_void, input: f64, out: *mut f64) -> c_int;

/// Interval-valued real mapping supplied by the caller
pub type PolifRealIntervalCallback =
    extern "C" fn(user_data: *mut c_void, input: f64, out: *mut PolifRealInterval) -> c_int;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_ownership_roundtrip() {
        let bytes = PolifBytes::from_vec(vec![1, 2, 3]);
        assert!(!bytes.is_empty());
        assert_eq!(unsafe { bytes.as_slice() }, &[1, 2, 3]);
        assert_eq!(unsafe { bytes.into_vec() }, Some(vec![1, 2, 3]));
        assert!(PolifBytes::empty().is_empty());
    }

    #[test]
    fn test_interval_conversion() {
        let raw = PolifRealInterval {
            lower: 2.0,
            upper: 4.0,
            lower_inclusive: true,
            upper_inclusive: false,
        };
        let interval = Interval::<Real>::try_from(raw).unwrap();
        assert_eq!(PolifRealInterval::from(&interval), raw);

        let inverted = PolifRealInterval { lower: 5.0, ..raw };
        assert!(Interval::<Real>::try_from(inverted).is_err());
    }

    #[test]
    fn test_bounds_validation() {
        assert!(RealRange::try_from(PolifRealBounds::unbounded()).is_ok());
        assert!(RealRange::try_from(PolifRealBounds { min: 1.0, max: 0.0 }).is_err());
        assert!(RealRange::try_from(PolifRealBounds {
            min: f64::NAN,
            max: 0.0
        })
        .is_err());
    }
}
