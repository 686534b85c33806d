//! Codec for BIP-174 style key/value map containers.
//!
//! A file is a magic prefix followed by a sequence of maps, each map a list of
//! typed key/value entries closed by a zero byte.  Every length and type tag
//! is a compact varint.
//!
//! Decoding is zero-copy: decoded [`EntryRef`]s borrow their keys and values
//! from the input buffer and can't outlive it.  Use [`EntryRef::to_owned`] to
//! copy them out.

mod buf_decoder;
pub use buf_decoder::BufDecoder;

mod entry;
pub use entry::{Entry, EntryRef, MapEntry};

mod errors;
pub use errors::{MapFmtError, MapFmtResult};

mod file;
pub use file::{DecodedFile, FileConfig, FileShape, MapsRef};

mod magic;
pub use magic::MagicBytes;

mod map;
pub use map::{MAP_SEPARATOR, decode_map, decode_map_from_buf, encode_map, encode_map_to_vec};

pub mod psbt;

mod types;
pub use types::{Codec, Encoder, TypeTag};

mod varint;
pub use varint::{VarInt, VarIntWidth, decode_varint, encode_varint};
