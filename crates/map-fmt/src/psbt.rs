//! Constants from the BIP-174 partially signed transaction format, which this
//! container format is derived from.

use crate::file::{FileConfig, FileShape};
use crate::magic::MagicBytes;
use crate::types::TypeTag;

/// Magic bytes of a PSBT.
pub const PSBT_MAGIC: MagicBytes = MagicBytes::new(b"psbt\xff");

/// Global map field holding the unsigned transaction.
pub const PSBT_GLOBAL_UNSIGNED_TX: TypeTag = 0x00;

/// Global map field holding an extended public key.
pub const PSBT_GLOBAL_XPUB: TypeTag = 0x01;

/// Number of maps in a PSBT with no inputs or outputs: global, input, output.
pub const PSBT_MAP_COUNT: usize = 3;

/// File layout of a PSBT with a single input and output map.
pub const PSBT_FILE: FileConfig = FileConfig::new(PSBT_MAGIC, FileShape::Fixed(PSBT_MAP_COUNT));
