//! Extended key records.
//!
//! An extended key is stored as an entry whose key is the raw extended key
//! and whose value is the key origin:
//!
//! ```text
//! [0..4]   master fingerprint (u32, big-endian)
//! [4..]    derivation path, one u32 per step (little-endian)
//! ```
//!
//! The number of path steps follows from the value length.

use bitcoin::bip32::{ChildNumber, DerivationPath, Fingerprint, Xpub};
use psbt_map_fmt::{Entry, MapEntry, MapFmtError, MapFmtResult, TypeTag};

use crate::errors::DescFmtResult;

/// First hardened derivation index, 2^31.
pub const HARDENED_KEY_START: u32 = 0x8000_0000;

/// Length of the master fingerprint.
const FINGERPRINT_LEN: usize = 4;

/// Length of one derivation step.
const PATH_STEP_LEN: usize = 4;

/// Extended public key with its origin.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ExtendedKey {
    /// Fingerprint of the master key the path is derived from.
    pub master_fingerprint: u32,

    /// Derivation path from the master key.  Steps at or above
    /// [`HARDENED_KEY_START`] are hardened.
    pub path: Vec<u32>,

    /// Raw extended key material.  Not validated here.
    pub key: Vec<u8>,
}

impl ExtendedKey {
    /// Constructs a new instance.
    pub fn new(master_fingerprint: u32, path: Vec<u32>, key: Vec<u8>) -> Self {
        Self {
            master_fingerprint,
            path,
            key,
        }
    }

    /// Constructs an instance out of a parsed xpub and its origin.
    pub fn from_xpub(fingerprint: Fingerprint, path: &DerivationPath, xpub: &Xpub) -> Self {
        Self {
            master_fingerprint: u32::from_be_bytes(fingerprint.to_bytes()),
            path: path.into_iter().map(|cn| u32::from(*cn)).collect(),
            key: xpub.encode().to_vec(),
        }
    }

    /// Encodes the fingerprint and path as an entry value.
    pub fn encode_origin(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FINGERPRINT_LEN + PATH_STEP_LEN * self.path.len());
        buf.extend_from_slice(&self.master_fingerprint.to_be_bytes());
        for step in &self.path {
            buf.extend_from_slice(&step.to_le_bytes());
        }
        buf
    }

    /// Converts to a map entry of the given type.
    pub fn to_entry(&self, ty: TypeTag) -> Entry {
        Entry::new(ty, self.key.clone(), self.encode_origin())
    }

    /// Parses an entry of the given type.
    pub fn from_entry(entry: &impl MapEntry, ty: TypeTag) -> MapFmtResult<Self> {
        entry.expect_type(ty)?;
        let (master_fingerprint, path) = decode_origin(entry.value())?;
        Ok(Self {
            master_fingerprint,
            path,
            key: entry.key().to_vec(),
        })
    }

    /// Gets the master fingerprint as a BIP-32 fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from(self.master_fingerprint.to_be_bytes())
    }

    /// Gets the path as a BIP-32 derivation path.
    pub fn derivation_path(&self) -> DerivationPath {
        self.path
            .iter()
            .map(|step| ChildNumber::from(*step))
            .collect::<Vec<_>>()
            .into()
    }

    /// Parses the key material as a serialized BIP-32 extended public key.
    pub fn xpub(&self) -> DescFmtResult<Xpub> {
        Ok(Xpub::decode(&self.key)?)
    }
}

/// Decodes a key origin value into the master fingerprint and path.
pub fn decode_origin(value: &[u8]) -> MapFmtResult<(u32, Vec<u32>)> {
    if value.len() < FINGERPRINT_LEN || value.len() % PATH_STEP_LEN != 0 {
        return Err(MapFmtError::UnexpectedEnd);
    }

    let (fp, rest) = value.split_at(FINGERPRINT_LEN);
    let mut fp_buf = [0; FINGERPRINT_LEN];
    fp_buf.copy_from_slice(fp);

    let path = rest
        .chunks_exact(PATH_STEP_LEN)
        .map(|c| {
            let mut step = [0; PATH_STEP_LEN];
            step.copy_from_slice(c);
            u32::from_le_bytes(step)
        })
        .collect();

    Ok((u32::from_be_bytes(fp_buf), path))
}
