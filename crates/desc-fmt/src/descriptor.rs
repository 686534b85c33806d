//! Output descriptor record and its global map entry.
//!
//! The descriptor entry's key is the birth block followed by the name, its
//! value is the descriptor text:
//!
//! ```text
//! key:   birth_block:varint | name (UTF-8)
//! value: descriptor (raw bytes)
//! ```

use psbt_map_fmt::{BufDecoder, Codec, Entry, MapEntry, TypeTag, VarInt};

use crate::errors::{DescFmtError, DescFmtResult};
use crate::xpub::ExtendedKey;

/// Output descriptor along with the extended keys it references.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct OutputDescriptor {
    /// Human readable name of the wallet.
    pub name: String,

    /// Earliest block height relevant to the descriptor's keys.
    pub birth_block: u64,

    /// Spending policy text, kept as raw bytes.  Not parsed here.
    pub descriptor: Vec<u8>,

    /// Extended keys the descriptor refers to, in order.
    pub keys: Vec<ExtendedKey>,
}

impl OutputDescriptor {
    /// Constructs a new instance.
    pub fn new(
        name: impl Into<String>,
        birth_block: u64,
        descriptor: impl Into<Vec<u8>>,
        keys: Vec<ExtendedKey>,
    ) -> Self {
        Self {
            name: name.into(),
            birth_block,
            descriptor: descriptor.into(),
            keys,
        }
    }

    /// Builds the descriptor entry of the given type, without the keys.
    pub fn to_descriptor_entry(&self, ty: TypeTag) -> Entry {
        let bb = VarInt::new(self.birth_block);
        let mut key = Vec::with_capacity(bb.byte_len() + self.name.len());
        bb.encode(&mut key);
        key.extend_from_slice(self.name.as_bytes());

        Entry::new(ty, key, self.descriptor.clone())
    }
}

/// Fields of a parsed descriptor entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DescriptorEntry {
    pub(crate) name: String,
    pub(crate) birth_block: u64,
    pub(crate) descriptor: Vec<u8>,
}

impl DescriptorEntry {
    /// Parses a descriptor entry.  Doesn't check the type tag.
    pub(crate) fn from_entry(entry: &impl MapEntry) -> DescFmtResult<Self> {
        let mut dec = BufDecoder::new(entry.key());
        let birth_block = VarInt::decode(&mut dec)?.inner();

        let name = String::from_utf8(dec.rest().to_vec())
            .map_err(|e| DescFmtError::InvalidName(e.into_bytes()))?;
        let descriptor = entry.value().to_vec();

        Ok(Self {
            name,
            birth_block,
            descriptor,
        })
    }
}
