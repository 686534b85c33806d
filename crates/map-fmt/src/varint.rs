//! Compact varints, as used for every length and type tag in the format.
//!
//! The first byte selects the width.  Multi-byte payloads are little-endian.
//!
//! ```txt
//! 0x00..=0xfc   value itself
//! 0xfd          + u16
//! 0xfe          + u32
//! 0xff          + u64
//! ```
//!
//! Encoding always picks the shortest form.  Decoding accepts non-minimal
//! forms (`fd 05 00` decodes to 5), existing encoders produce them.

use crate::buf_decoder::BufDecoder;
use crate::errors::MapFmtResult;
use crate::types::{Codec, Encoder};

/// Marker byte for a u16 payload.
const MARKER_U16: u8 = 0xfd;

/// Marker byte for a u32 payload.
const MARKER_U32: u8 = 0xfe;

/// Marker byte for a u64 payload.
const MARKER_U64: u8 = 0xff;

/// Varint wrapper around a `u64`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VarInt(u64);

impl VarInt {
    /// Construct a new instance.
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    /// Constructs a new instance from a usize.
    pub fn from_usize(v: usize) -> Self {
        // usize is at most 64 bits on every target we build for.
        Self(v as u64)
    }

    /// Converts to inner value.
    pub const fn inner(self) -> u64 {
        self.0
    }

    /// Converts to a usize, if it fits.  Lengths that don't fit can't
    /// possibly be satisfied by an in-memory buffer.
    pub fn to_usize(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// Gets the "width type" the varint will be encoded with.
    pub const fn width(&self) -> VarIntWidth {
        if self.0 < MARKER_U16 as u64 {
            VarIntWidth::U8
        } else if self.0 <= u16::MAX as u64 {
            VarIntWidth::U16
        } else if self.0 <= u32::MAX as u64 {
            VarIntWidth::U32
        } else {
            VarIntWidth::U64
        }
    }

    /// Convenience function for returning the encoded length in bytes.
    pub const fn byte_len(&self) -> usize {
        self.width().byte_len()
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<VarInt> for u64 {
    fn from(v: VarInt) -> Self {
        v.0
    }
}

impl<'b> Codec<'b> for VarInt {
    fn decode(dec: &mut BufDecoder<'b>) -> MapFmtResult<Self> {
        let value = match dec.read_u8()? {
            MARKER_U16 => u16::from_le_bytes(dec.read_arr()?) as u64,
            MARKER_U32 => u32::from_le_bytes(dec.read_arr()?) as u64,
            MARKER_U64 => u64::from_le_bytes(dec.read_arr()?),
            b => b as u64,
        };

        Ok(Self(value))
    }

    fn encode(&self, enc: &mut impl Encoder) {
        match self.width() {
            VarIntWidth::U8 => enc.write_u8(self.0 as u8),
            VarIntWidth::U16 => {
                enc.write_u8(MARKER_U16);
                enc.write_buf(&(self.0 as u16).to_le_bytes());
            }
            VarIntWidth::U32 => {
                enc.write_u8(MARKER_U32);
                enc.write_buf(&(self.0 as u32).to_le_bytes());
            }
            VarIntWidth::U64 => {
                enc.write_u8(MARKER_U64);
                enc.write_buf(&self.0.to_le_bytes());
            }
        }
    }
}

/// Describes the width that a varint will be encoded as, by referring to the
/// unsigned integer type of its payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum VarIntWidth {
    /// 1 byte, no marker
    U8,

    /// 3 bytes
    U16,

    /// 5 bytes
    U32,

    /// 9 bytes
    U64,
}

impl VarIntWidth {
    /// Returns the number of bytes to encode the varint, including the
    /// marker byte.
    pub const fn byte_len(&self) -> usize {
        match self {
            VarIntWidth::U8 => 1,
            VarIntWidth::U16 => 3,
            VarIntWidth::U32 => 5,
            VarIntWidth::U64 => 9,
        }
    }
}

/// Decodes a varint from the start of a buffer, returning the value and the
/// number of bytes it took up.
pub fn decode_varint(buf: &[u8]) -> MapFmtResult<(u64, usize)> {
    let mut dec = BufDecoder::new(buf);
    let v = VarInt::decode(&mut dec)?;
    Ok((v.inner(), dec.consumed()))
}

/// Encodes a varint into a newly allocated vec.
pub fn encode_varint(v: u64) -> Vec<u8> {
    let vi = VarInt::new(v);
    let mut buf = Vec::with_capacity(vi.byte_len());
    vi.encode(&mut buf);
    buf
}
