//! Element encodings
//!
//! Fixed-width numbers are little-endian. Strings carry a `u32` byte length
//! followed by UTF-8. Booleans are a single `0x00` or `0x01` byte.

use bytes::{Buf, BufMut};
use polif_core::{PolifunctionError, PolifunctionResult, Real};

/// Binary encoding of a single output element
pub trait ElementCodec: Sized {
    /// Exact number of bytes `encode` writes
    fn encoded_len(&self) -> usize;

    /// Append the element to `buf`
    ///
    /// Fails when the element has no representation in the format, as for
    /// strings longer than `u32::MAX` bytes.
    fn encode<B: BufMut>(&self, buf: &mut B) -> PolifunctionResult<()>;

    /// Read one element from the front of `buf`
    fn decode<B: Buf>(buf: &mut B) -> PolifunctionResult<Self>;
}

/// Length prefix for `len` items, rejecting lengths past `u32::MAX`
pub(crate) fn len_to_u32(len: usize, what: &str) -> PolifunctionResult<u32> {
    u32::try_from(len).map_err(|_| {
        PolifunctionError::Serialization(format!("{} of length {} is too large", what, len))
    })
}

/// Fail unless `buf` holds at least `needed` more bytes
pub(crate) fn ensure_remaining<B: Buf>(buf: &B, needed: usize, what: &str) -> PolifunctionResult<()> {
    if buf.remaining() < needed {
        return Err(PolifunctionError::Serialization(format!(
            "truncated {}: expected {} bytes, got {}",
            what,
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

impl ElementCodec for Real {
    fn encoded_len(&self) -> usize {
        8
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> PolifunctionResult<()> {
        buf.put_f64_le(self.value());
        Ok(())
    }

    fn decode<B: Buf>(buf: &mut B) -> PolifunctionResult<Self> {
        ensure_remaining(buf, 8, "real")?;
        Ok(Real::new(buf.get_f64_le()))
    }
}

impl ElementCodec for i64 {
    fn encoded_len(&self) -> usize {
        8
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> PolifunctionResult<()> {
        buf.put_i64_le(*self);
        Ok(())
    }

    fn decode<B: Buf>(buf: &mut B) -> PolifunctionResult<Self> {
        ensure_remaining(buf, 8, "i64")?;
        Ok(buf.get_i64_le())
    }
}

impl ElementCodec for u64 {
    fn encoded_len(&self) -> usize {
        8
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> PolifunctionResult<()> {
        buf.put_u64_le(*self);
        Ok(())
    }

    fn decode<B: Buf>(buf: &mut B) -> PolifunctionResult<Self> {
        ensure_remaining(buf, 8, "u64")?;
        Ok(buf.get_u64_le())
    }
}

impl ElementCodec for bool {
    fn encoded_len(&self) -> usize {
        1
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> PolifunctionResult<()> {
        buf.put_u8(u8::from(*self));
        Ok(())
    }

    fn decode<B: Buf>(buf: &mut B) -> PolifunctionResult<Self> {
        ensure_remaining(buf, 1, "bool")?;
        decode_flag(buf.get_u8())
    }
}

/// Strict flag byte: anything but 0 or 1 is malformed
pub(crate) fn decode_flag(b: u8) -> PolifunctionResult<bool> {
    match b {
        0x00 => Ok(false),
        0x01 => Ok(true),
        other => Err(PolifunctionError::Serialization(format!(
            "invalid flag byte 0x{:02x}",
            other
        ))),
    }
}

impl ElementCodec for String {
    fn encoded_len(&self) -> usize {
        4 + self.len()
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> PolifunctionResult<()> {
        buf.put_u32_le(len_to_u32(self.len(), "string")?);
        buf.put_slice(self.as_bytes());
        Ok(())
    }

    fn decode<B: Buf>(buf: &mut B) -> PolifunctionResult<Self> {
        ensure_remaining(buf, 4, "string length")?;
        let len = buf.get_u32_le() as usize;
        ensure_remaining(buf, len, "string")?;
        let mut raw = vec![0u8; len];
        buf.copy_to_slice(&mut raw);
        String::from_utf8(raw)
            .map_err(|e| PolifunctionError::Serialization(format!("invalid utf-8 string: {}", e)))
    }
}
