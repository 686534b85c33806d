//! Files: magic bytes followed by a sequence of maps.
//!
//! ```txt
//! <file> := <magic> <map>*
//! ```
//!
//! There is no map count on the wire.  How many maps to expect is part of the
//! [`FileConfig`] the caller decodes with.

use tracing::*;

use crate::buf_decoder::BufDecoder;
use crate::entry::{EntryRef, MapEntry};
use crate::errors::{MapFmtError, MapFmtResult};
use crate::magic::MagicBytes;
use crate::map::{decode_map, encode_map};
use crate::types::Encoder;

/// How many maps a file holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FileShape {
    /// Exactly this many maps.
    Fixed(usize),

    /// Maps until the end of the buffer.
    Variable,
}

/// Decoded maps, borrowing from the input buffer.
pub type MapsRef<'b> = Vec<Vec<EntryRef<'b>>>;

/// Result of decoding a file that might have been followed by other data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedFile<'b> {
    maps: MapsRef<'b>,
    consumed: usize,
}

impl<'b> DecodedFile<'b> {
    /// Gets the decoded maps.
    pub fn maps(&self) -> &[Vec<EntryRef<'b>>] {
        &self.maps
    }

    /// Gets the number of bytes making up the file, including the magic.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Takes out the decoded maps.
    pub fn into_maps(self) -> MapsRef<'b> {
        self.maps
    }
}

/// Config for encoding and decoding files.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FileConfig {
    magic: MagicBytes,
    shape: FileShape,
}

impl FileConfig {
    /// Constructs a new instance.
    pub const fn new(magic: MagicBytes, shape: FileShape) -> Self {
        Self { magic, shape }
    }

    /// Gets the magic bytes.
    pub const fn magic(&self) -> MagicBytes {
        self.magic
    }

    /// Gets the file shape.
    pub const fn shape(&self) -> FileShape {
        self.shape
    }

    /// Encodes the magic and each map into an encoder.
    ///
    /// With a fixed shape, the number of maps must match.
    pub fn encode_file_into<E: MapEntry>(
        &self,
        maps: &[&[E]],
        enc: &mut impl Encoder,
    ) -> MapFmtResult<()> {
        self.check_map_count(maps.len())?;

        enc.write_buf(self.magic.as_bytes());
        for m in maps {
            encode_map(m, enc);
        }

        Ok(())
    }

    /// Encodes the magic and each map into a newly allocated vec.
    pub fn encode_file<E: MapEntry>(&self, maps: &[&[E]]) -> MapFmtResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_file_into(maps, &mut buf)?;
        Ok(buf)
    }

    /// Decodes a file from the start of a buffer.
    ///
    /// Returns how many bytes were used, so callers can tell if there's
    /// trailing data.  With a variable shape that's always the whole buffer.
    pub fn decode_file<'b>(&self, buf: &'b [u8]) -> MapFmtResult<DecodedFile<'b>> {
        let mut dec = BufDecoder::new(buf);
        self.check_magic(&mut dec)?;

        let maps = match self.shape {
            FileShape::Fixed(n) => {
                let mut maps = Vec::with_capacity(n);
                for _ in 0..n {
                    maps.push(decode_map(&mut dec)?);
                }
                maps
            }

            FileShape::Variable => {
                let mut maps = Vec::new();
                while !dec.is_exhausted() {
                    maps.push(decode_map(&mut dec)?);
                }
                maps
            }
        };

        let consumed = dec.consumed();
        trace!(maps = maps.len(), %consumed, "decoded file");
        Ok(DecodedFile { maps, consumed })
    }

    /// Decodes a file, throwing an error if there's leftover bytes.
    pub fn decode_file_exact<'b>(&self, buf: &'b [u8]) -> MapFmtResult<MapsRef<'b>> {
        let file = self.decode_file(buf)?;
        let extra = buf.len() - file.consumed();
        if extra > 0 {
            return Err(MapFmtError::ExtraInput(extra));
        }

        Ok(file.into_maps())
    }

    fn check_map_count(&self, found: usize) -> MapFmtResult<()> {
        match self.shape {
            FileShape::Fixed(expected) if expected != found => {
                Err(MapFmtError::MapCountMismatch { expected, found })
            }
            _ => Ok(()),
        }
    }

    /// Consumes the magic bytes.  A buffer that ends partway through an
    /// otherwise matching magic is truncated, not mismatched.
    ///
    /// This is deliberately stricter than a prefix check, which would call a
    /// buffer like `ps` invalid magic.  Cuts inside the magic then fail with
    /// `UnexpectedEnd` like cuts anywhere else in the file.
    fn check_magic(&self, dec: &mut BufDecoder<'_>) -> MapFmtResult<()> {
        let magic = self.magic.as_bytes();
        let avail = &dec.rest()[..magic.len().min(dec.remaining())];

        if avail != &magic[..avail.len()] {
            debug!(expected = %self.magic, "rejecting file with invalid magic");
            return Err(MapFmtError::InvalidMagic {
                expected: self.magic,
                found: avail.to_vec(),
            });
        }

        dec.read_slice(magic.len())?;
        Ok(())
    }
}
