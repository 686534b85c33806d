//! Output descriptors stored in BIP-174 style map files.
//!
//! An [`OutputDescriptor`] is a named spending policy, the block height its
//! keys were first used at, and the extended public keys the policy refers
//! to.  [`DescriptorFormat`] lays it out as map entries and encodes those with
//! `psbt-map-fmt`.  Two layouts are provided, [`PSBT_FORMAT`] and
//! [`BOD_FORMAT`].
//!
//! ```
//! use psbt_desc_fmt::{BOD_FORMAT, ExtendedKey, HARDENED_KEY_START, OutputDescriptor};
//!
//! let key = ExtendedKey::new(0xdc567276, vec![0x56 + HARDENED_KEY_START], vec![0; 78]);
//! let desc = OutputDescriptor::new("Savings", 840_000, "wpkh(@0/<0;1>/*)", vec![key]);
//!
//! let buf = BOD_FORMAT.encode(&desc).expect("test: encode");
//! assert_eq!(BOD_FORMAT.decode(&buf).expect("test: decode"), desc);
//! ```

mod descriptor;
mod errors;
mod format;
mod xpub;

pub use descriptor::OutputDescriptor;
pub use errors::{DescFmtError, DescFmtResult};
pub use format::{
    BOD_FORMAT, BOD_GLOBAL_OUTPUT_DESCRIPTOR, BOD_KEY_XPUB, BOD_MAGIC, DescriptorFormat,
    KeyPlacement, PSBT_FORMAT, PSBT_GLOBAL_OUTPUT_DESCRIPTOR,
};
pub use xpub::{ExtendedKey, HARDENED_KEY_START, decode_origin};
