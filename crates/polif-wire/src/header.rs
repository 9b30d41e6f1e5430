//! Fixed header for encoded polifunction values
//!
//! Fixed header is 3 bytes:
//! - Bytes 0-1: Wire version (LE)
//! - Byte 2: Value variant

use polif_core::{PolifunctionError, PolifunctionResult, ValueShape};
use tracing::debug;

/// Fixed header size in bytes
pub const HEADER_SIZE: usize = 3;

/// Current wire format version
pub const WIRE_VERSION: u16 = 1;

/// Variant discriminant carried on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueVariant {
    Single = 0x01,
    Set = 0x02,
    Interval = 0x03,
    /// Payload layout owned by the distribution extension
    Distribution = 0x04,
    /// Payload layout owned by the fuzzy-set extension
    FuzzySet = 0x05,
}

impl ValueVariant {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(ValueVariant::Single),
            0x02 => Some(ValueVariant::Set),
            0x03 => Some(ValueVariant::Interval),
            0x04 => Some(ValueVariant::Distribution),
            0x05 => Some(ValueVariant::FuzzySet),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn shape(self) -> ValueShape {
        match self {
            ValueVariant::Single => ValueShape::Single,
            ValueVariant::Set => ValueShape::Set,
            ValueVariant::Interval => ValueShape::Interval,
            ValueVariant::Distribution => ValueShape::Distribution,
            ValueVariant::FuzzySet => ValueShape::FuzzySet,
        }
    }
}

impl From<ValueShape> for ValueVariant {
    fn from(shape: ValueShape) -> Self {
        match shape {
            ValueShape::Single => ValueVariant::Single,
            ValueShape::Set => ValueVariant::Set,
            ValueShape::Interval => ValueVariant::Interval,
            ValueShape::Distribution => ValueVariant::Distribution,
            ValueShape::FuzzySet => ValueVariant::FuzzySet,
        }
    }
}

/// Fixed header structure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueHeader {
    /// Wire format version
    pub version: u16,
    /// Payload variant
    pub variant: ValueVariant,
}

impl ValueHeader {
    /// Header for the current wire version
    pub fn new(variant: ValueVariant) -> Self {
        ValueHeader {
            version: WIRE_VERSION,
            variant,
        }
    }

    /// Parse header from bytes
    ///
    /// Only [`WIRE_VERSION`] is accepted.
    pub fn parse(buf: &[u8]) -> PolifunctionResult<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(PolifunctionError::Serialization(format!(
                "buffer too short for header: expected {}, got {}",
                HEADER_SIZE,
                buf.len()
            )));
        }

        // Bytes 0-1: Version
        let version = u16::from_le_bytes([buf[0], buf[1]]);
        if version != WIRE_VERSION {
            debug!(version, expected = WIRE_VERSION, "unsupported wire version");
            return Err(PolifunctionError::Serialization(format!(
                "unsupported wire version {}",
                version
            )));
        }

        // Byte 2: Variant
        let variant = ValueVariant::from_byte(buf[2]).ok_or_else(|| {
            PolifunctionError::Serialization(format!("unknown value variant 0x{:02x}", buf[2]))
        })?;

        Ok(ValueHeader { version, variant })
    }

    /// Serialize header into the front of `buf`
    pub fn serialize(&self, buf: &mut [u8]) -> PolifunctionResult<()> {
        if buf.len() < HEADER_SIZE {
            return Err(PolifunctionError::Serialization(format!(
                "buffer too short for header: expected {}, got {}",
                HEADER_SIZE,
                buf.len()
            )));
        }

        buf[0..2].copy_from_slice(&self.version.to_le_bytes());
        buf[2] = self.variant.to_byte();

        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..2].copy_from_slice(&self.version.to_le_bytes());
        buf[2] = self.variant.to_byte();
        buf
    }
}
