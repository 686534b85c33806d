//! Typed key/value entries.
//!
//! On the wire an entry is laid out as:
//!
//! ```txt
//! keylen:varint | type:varint | key | vallen:varint | value
//! ```
//!
//! where `keylen` covers both the type varint and the key bytes.

use crate::buf_decoder::BufDecoder;
use crate::errors::{MapFmtError, MapFmtResult};
use crate::types::{Codec, Encoder, TypeTag};
use crate::varint::VarInt;

/// A map entry.
pub trait MapEntry {
    /// Gets the type tag.
    fn ty(&self) -> TypeTag;

    /// Gets a slice of the key, without the type tag.
    fn key(&self) -> &[u8];

    /// Gets a slice of the value.
    fn value(&self) -> &[u8];

    /// Fails with [`MapFmtError::TypeMismatch`] if the entry isn't of the
    /// expected type.
    fn expect_type(&self, expected: TypeTag) -> MapFmtResult<()> {
        if self.ty() != expected {
            return Err(MapFmtError::TypeMismatch {
                expected,
                found: self.ty(),
            });
        }

        Ok(())
    }

    /// Encodes the entry into an encoder.
    fn encode_into(&self, enc: &mut impl Encoder) {
        let ty = VarInt::new(self.ty());
        let key = self.key();
        let value = self.value();

        VarInt::from_usize(ty.byte_len() + key.len()).encode(enc);
        ty.encode(enc);
        enc.write_buf(key);
        VarInt::from_usize(value.len()).encode(enc);
        enc.write_buf(value);
    }

    /// Encodes the entry into a vec.
    fn to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf);
        buf
    }
}

/// Parsed map entry, borrowing its key and value from the input buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryRef<'b> {
    ty: TypeTag,
    key: &'b [u8],
    value: &'b [u8],
}

impl<'b> EntryRef<'b> {
    /// Constructs a new instance from its parts.
    pub fn new(ty: TypeTag, key: &'b [u8], value: &'b [u8]) -> Self {
        Self { ty, key, value }
    }

    /// Gets the key slice with the lifetime of the underlying buffer.
    pub fn key_ref(&self) -> &'b [u8] {
        self.key
    }

    /// Gets the value slice with the lifetime of the underlying buffer.
    pub fn value_ref(&self) -> &'b [u8] {
        self.value
    }

    /// Converts to an [`Entry`].
    pub fn to_owned(&self) -> Entry {
        Entry {
            ty: self.ty,
            key: self.key.to_vec(),
            value: self.value.to_vec(),
        }
    }

    /// Decodes the rest of an entry after its key length has been read.
    ///
    /// The key length must be nonzero, zero is the end of map marker.
    pub(crate) fn decode_after_key_len(
        key_len: VarInt,
        dec: &mut BufDecoder<'b>,
    ) -> MapFmtResult<Self> {
        let key_len = key_len.to_usize().ok_or(MapFmtError::UnexpectedEnd)?;
        let type_and_key = dec.read_slice(key_len)?;

        let mut key_dec = BufDecoder::new(type_and_key);
        let ty = VarInt::decode(&mut key_dec)?.inner();
        let key = key_dec.rest();

        let value_len = VarInt::decode(dec)?
            .to_usize()
            .ok_or(MapFmtError::UnexpectedEnd)?;
        let value = dec.read_slice(value_len)?;

        Ok(Self { ty, key, value })
    }
}

impl MapEntry for EntryRef<'_> {
    fn ty(&self) -> TypeTag {
        self.ty
    }

    fn key(&self) -> &[u8] {
        self.key
    }

    fn value(&self) -> &[u8] {
        self.value
    }
}

/// Map entry.  Owns its contents.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Entry {
    ty: TypeTag,
    key: Vec<u8>,
    value: Vec<u8>,
}

impl Entry {
    /// Constructs a new instance from its parts.
    pub fn new(ty: TypeTag, key: Vec<u8>, value: Vec<u8>) -> Self {
        Self { ty, key, value }
    }

    /// Returns an [`EntryRef`] instance, borrowing the key and value of this
    /// entry.
    pub fn as_borrowed(&self) -> EntryRef<'_> {
        EntryRef {
            ty: self.ty,
            key: &self.key,
            value: &self.value,
        }
    }

    /// Splits the entry into its parts.
    pub fn into_parts(self) -> (TypeTag, Vec<u8>, Vec<u8>) {
        (self.ty, self.key, self.value)
    }
}

impl MapEntry for Entry {
    fn ty(&self) -> TypeTag {
        self.ty
    }

    fn key(&self) -> &[u8] {
        &self.key
    }

    fn value(&self) -> &[u8] {
        &self.value
    }
}

impl<'b> From<EntryRef<'b>> for Entry {
    fn from(e: EntryRef<'b>) -> Self {
        e.to_owned()
    }
}
