#![no_main]

use libfuzzer_sys::fuzz_target;
use polif_core::Real;
use polif_wire::{decode_value, encode_value, ElementCodec};

/// Decoding never panics, and the re-encoding of anything that decodes is a
/// fixed point of decode-then-encode
fn check<T: ElementCodec + Ord>(data: &[u8]) {
    if let Ok(value) = decode_value::<T>(data) {
        let canonical = encode_value(&value).expect("decoded value re-encodes");
        let again = decode_value::<T>(&canonical).expect("canonical bytes decode");
        assert_eq!(encode_value(&again).ok(), Some(canonical));
    }
}

fuzz_target!(|data: &[u8]| {
    check::<Real>(data);
    check::<String>(data);
    check::<u64>(data);
});
