use crate::buf_decoder::BufDecoder;
use crate::errors::MapFmtResult;

/// Alias for entry type tags.
///
/// Tags are written as varints, so any `u64` is representable.
pub type TypeTag = u64;

/// Generic codec trait for types that go between bytes and values.
///
/// The lifetime lets decoded values borrow from the input buffer.
pub trait Codec<'b>: Sized {
    /// Decodes self from a decoder.
    fn decode(dec: &mut BufDecoder<'b>) -> MapFmtResult<Self>;

    /// Encodes self into an encoder.
    fn encode(&self, enc: &mut impl Encoder);
}

/// Generic encoder trait that writes outputs.
///
/// Writing can't fail, all the outputs we care about are in memory.
pub trait Encoder {
    /// Writes a buf.  This does NOT include length tagging.
    fn write_buf(&mut self, buf: &[u8]);

    /// Writes a single byte.
    fn write_u8(&mut self, b: u8) {
        self.write_buf(&[b]);
    }
}

/// Encoding to a vec buffer.
impl Encoder for Vec<u8> {
    fn write_buf(&mut self, buf: &[u8]) {
        self.extend_from_slice(buf);
    }

    fn write_u8(&mut self, b: u8) {
        self.push(b);
    }
}
