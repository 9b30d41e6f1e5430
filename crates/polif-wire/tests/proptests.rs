//! Property-based tests for the value wire format

use std::collections::BTreeSet;

use polif_core::{Interval, PolifunctionError, PolifunctionValue, Real};
use polif_wire::{decode_value, encode_value, encoded_len, HEADER_SIZE, WIRE_VERSION};
use proptest::prelude::*;

// ===== Strategies for generating test data =====

fn arb_real() -> impl Strategy<Value = Real> {
    prop_oneof![
        (-1.0e6f64..1.0e6).prop_map(Real::new),
        Just(Real::ZERO),
        Just(Real::new(f64::MAX)),
    ]
}

fn arb_interval() -> impl Strategy<Value = Interval<Real>> {
    (arb_real(), arb_real(), any::<bool>(), any::<bool>()).prop_map(|(a, b, li, ui)| {
        let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
        Interval::new(lower, upper, li, ui).unwrap()
    })
}

fn arb_value() -> impl Strategy<Value = PolifunctionValue<Real>> {
    prop_oneof![
        arb_real().prop_map(PolifunctionValue::Single),
        prop::collection::btree_set(arb_real(), 0..16).prop_map(PolifunctionValue::Set),
        arb_interval().prop_map(PolifunctionValue::Interval),
    ]
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_roundtrip(value in arb_value()) {
        let bytes = encode_value(&value).unwrap();
        prop_assert_eq!(bytes.len(), encoded_len(&value));
        prop_assert_eq!(decode_value::<Real>(&bytes).unwrap(), value);
    }

    #[test]
    fn prop_string_set_roundtrip(set in prop::collection::btree_set("[a-z]{0,12}", 0..8)) {
        let value = PolifunctionValue::Set(set.into_iter().collect::<BTreeSet<String>>());
        let bytes = encode_value(&value).unwrap();
        prop_assert_eq!(decode_value::<String>(&bytes).unwrap(), value);
    }

    #[test]
    fn prop_foreign_version_rejected(value in arb_value(), version in any::<u16>()) {
        prop_assume!(version != WIRE_VERSION);
        let mut bytes = encode_value(&value).unwrap();
        bytes[0..2].copy_from_slice(&version.to_le_bytes());
        prop_assert!(matches!(
            decode_value::<Real>(&bytes),
            Err(PolifunctionError::Serialization(_))
        ));
    }

    #[test]
    fn prop_every_truncation_fails(value in arb_value()) {
        let bytes = encode_value(&value).unwrap();
        for cut in 0..bytes.len() {
            prop_assert!(decode_value::<Real>(&bytes[..cut]).is_err());
        }
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode_value::<Real>(&bytes);
        let _ = decode_value::<String>(&bytes);
        if bytes.len() < HEADER_SIZE {
            prop_assert!(decode_value::<i64>(&bytes).is_err());
        }
    }
}
