//! Encoded polifunction values
//!
//! Value = Header + Payload
//!
//! Payload by variant:
//! - Single: element
//! - Set: count (u32 LE) + elements in ascending order
//! - Interval: lower + upper + lower flag (u8) + upper flag (u8)
//! - Distribution / FuzzySet: count (u32 LE) + (element, weight f64 LE) pairs
//!
//! Decoding is strict: truncated payloads, trailing bytes, duplicate set
//! elements, and out-of-order intervals all fail with a serialization error.

use std::collections::BTreeSet;

use bytes::{Buf, BufMut};
use polif_core::{
    Distribution, FuzzySet, Interval, PolifunctionError, PolifunctionResult, PolifunctionValue,
};

use crate::codec::{decode_flag, ensure_remaining, len_to_u32};
use crate::{ElementCodec, ValueHeader, ValueVariant, HEADER_SIZE};

fn weighted_len<T: ElementCodec>(entries: &[(T, f64)]) -> usize {
    4 + entries.iter().map(|(e, _)| e.encoded_len() + 8).sum::<usize>()
}

/// Exact encoded size of `value`, header included
pub fn encoded_len<T: ElementCodec>(value: &PolifunctionValue<T>) -> usize {
    let payload = match value {
        PolifunctionValue::Single(v) => v.encoded_len(),
        PolifunctionValue::Set(set) => 4 + set.iter().map(ElementCodec::encoded_len).sum::<usize>(),
        PolifunctionValue::Interval(interval) => {
            interval.lower().encoded_len() + interval.upper().encoded_len() + 2
        }
        PolifunctionValue::Distribution(d) => weighted_len(d.entries()),
        PolifunctionValue::FuzzySet(f) => weighted_len(f.members()),
    };
    HEADER_SIZE + payload
}

fn encode_weighted<T: ElementCodec, B: BufMut>(
    entries: &[(T, f64)],
    buf: &mut B,
) -> PolifunctionResult<()> {
    buf.put_u32_le(len_to_u32(entries.len(), "entry list")?);
    for (element, weight) in entries {
        element.encode(buf)?;
        buf.put_f64_le(*weight);
    }
    Ok(())
}

fn write_value<T: ElementCodec, B: BufMut>(
    value: &PolifunctionValue<T>,
    buf: &mut B,
) -> PolifunctionResult<()> {
    let header = ValueHeader::new(ValueVariant::from(value.shape()));
    buf.put_slice(&header.to_bytes());

    match value {
        PolifunctionValue::Single(v) => v.encode(buf)?,
        PolifunctionValue::Set(set) => {
            buf.put_u32_le(len_to_u32(set.len(), "set")?);
            for element in set {
                element.encode(buf)?;
            }
        }
        PolifunctionValue::Interval(interval) => {
            interval.lower().encode(buf)?;
            interval.upper().encode(buf)?;
            buf.put_u8(u8::from(interval.lower_inclusive()));
            buf.put_u8(u8::from(interval.upper_inclusive()));
        }
        PolifunctionValue::Distribution(d) => encode_weighted(d.entries(), buf)?,
        PolifunctionValue::FuzzySet(f) => encode_weighted(f.members(), buf)?,
    }
    Ok(())
}

/// Append the encoding of `value` to `buf`
///
/// Nothing is appended when encoding fails.
pub fn encode_value_into<T: ElementCodec, B: BufMut>(
    value: &PolifunctionValue<T>,
    buf: &mut B,
) -> PolifunctionResult<()> {
    let encoded = encode_value(value)?;
    buf.put_slice(&encoded);
    Ok(())
}

/// Encode `value` into a new buffer
///
/// The encoding of a set is independent of how it was built: elements are
/// always written in ascending order.
pub fn encode_value<T: ElementCodec>(value: &PolifunctionValue<T>) -> PolifunctionResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(encoded_len(value));
    write_value(value, &mut buf)?;
    Ok(buf)
}

fn decode_weighted<T: ElementCodec, B: Buf>(buf: &mut B) -> PolifunctionResult<Vec<(T, f64)>> {
    ensure_remaining(buf, 4, "entry count")?;
    let count = buf.get_u32_le() as usize;
    // No preallocation from an untrusted count
    let mut entries = Vec::new();
    for _ in 0..count {
        let element = T::decode(buf)?;
        ensure_remaining(buf, 8, "weight")?;
        entries.push((element, buf.get_f64_le()));
    }
    Ok(entries)
}

/// Decode a complete value from `bytes`
pub fn decode_value<T>(bytes: &[u8]) -> PolifunctionResult<PolifunctionValue<T>>
where
    T: ElementCodec + Ord,
{
    let header = ValueHeader::parse(bytes)?;
    let mut buf = &bytes[HEADER_SIZE..];

    let value = match header.variant {
        ValueVariant::Single => PolifunctionValue::Single(T::decode(&mut buf)?),
        ValueVariant::Set => {
            ensure_remaining(&buf, 4, "set count")?;
            let count = buf.get_u32_le() as usize;
            let mut set = BTreeSet::new();
            for _ in 0..count {
                if !set.insert(T::decode(&mut buf)?) {
                    return Err(PolifunctionError::serialization("duplicate set element"));
                }
            }
            PolifunctionValue::Set(set)
        }
        ValueVariant::Interval => {
            let lower = T::decode(&mut buf)?;
            let upper = T::decode(&mut buf)?;
            ensure_remaining(&buf, 2, "interval flags")?;
            let lower_inclusive = decode_flag(buf.get_u8())?;
            let upper_inclusive = decode_flag(buf.get_u8())?;
            let interval = Interval::new(lower, upper, lower_inclusive, upper_inclusive)
                .map_err(|e| PolifunctionError::Serialization(format!("invalid interval: {}", e)))?;
            PolifunctionValue::Interval(interval)
        }
        ValueVariant::Distribution => {
            PolifunctionValue::Distribution(Distribution::new(decode_weighted(&mut buf)?))
        }
        ValueVariant::FuzzySet => {
            PolifunctionValue::FuzzySet(FuzzySet::new(decode_weighted(&mut buf)?))
        }
    };

    if buf.has_remaining() {
        return Err(PolifunctionError::Serialization(format!(
            "{} trailing bytes after value",
            buf.remaining()
        )));
    }
    Ok(value)
}
