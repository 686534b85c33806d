//! Sentinel-terminated maps of entries.
//!
//! ```txt
//! <map> := <entry>* 0x00
//! ```
//!
//! The terminator reads as a key length of zero, which no real entry can
//! have since the key always includes the type varint.

use tracing::*;

use crate::buf_decoder::BufDecoder;
use crate::entry::{EntryRef, MapEntry};
use crate::errors::MapFmtResult;
use crate::types::{Codec, Encoder};
use crate::varint::VarInt;

/// End of map marker.
pub const MAP_SEPARATOR: u8 = 0x00;

/// Encodes each entry in order followed by the end of map marker.
pub fn encode_map<E: MapEntry>(entries: &[E], enc: &mut impl Encoder) {
    for e in entries {
        e.encode_into(enc);
    }

    enc.write_u8(MAP_SEPARATOR);
}

/// Encodes a map into a newly allocated vec.
pub fn encode_map_to_vec<E: MapEntry>(entries: &[E]) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_map(entries, &mut buf);
    buf
}

/// Decodes entries up to and including the end of map marker.
///
/// Entries borrow from the decoder's buffer.
pub fn decode_map<'b>(dec: &mut BufDecoder<'b>) -> MapFmtResult<Vec<EntryRef<'b>>> {
    let mut entries = Vec::new();

    loop {
        let key_len = VarInt::decode(dec)?;
        if key_len.inner() == 0 {
            break;
        }

        entries.push(EntryRef::decode_after_key_len(key_len, dec)?);
    }

    trace!(entries = entries.len(), at = dec.consumed(), "decoded map");
    Ok(entries)
}

/// Decodes a single map from the start of a buffer, returning the entries
/// and the number of bytes consumed.
pub fn decode_map_from_buf(buf: &[u8]) -> MapFmtResult<(Vec<EntryRef<'_>>, usize)> {
    let mut dec = BufDecoder::new(buf);
    let entries = decode_map(&mut dec)?;
    Ok((entries, dec.consumed()))
}
