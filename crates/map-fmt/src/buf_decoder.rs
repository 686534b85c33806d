//! Simple decoder for a flat buffer.

use crate::errors::{MapFmtError, MapFmtResult};

/// Cursor over a borrowed byte slice.
///
/// Every read is checked against the remaining bytes before the slice is
/// taken, so no read can go past the end of the buffer.  Slices returned by
/// [`Self::read_slice`] borrow from the underlying buffer, not from the
/// decoder, so they outlive it.
#[derive(Clone, Debug)]
pub struct BufDecoder<'b> {
    buf: &'b [u8],
    at: usize,
}

impl<'b> BufDecoder<'b> {
    /// Constructs a new instance by wrapping a buffer and starting at the
    /// beginning.
    pub fn new(buf: &'b [u8]) -> Self {
        Self { buf, at: 0 }
    }

    /// Returns the length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the total number of remaining bytes that can be read.
    pub fn remaining(&self) -> usize {
        self.len() - self.at
    }

    /// Returns if every byte of the buffer has been read.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the number of bytes read so far.
    pub fn consumed(&self) -> usize {
        self.at
    }

    /// Returns the slice of the remaining unread bytes, which might be empty.
    pub fn rest(&self) -> &'b [u8] {
        &self.buf[self.at..]
    }

    /// Reads the next `len` bytes as a slice of the underlying buffer.
    pub fn read_slice(&mut self, len: usize) -> MapFmtResult<&'b [u8]> {
        if len > self.remaining() {
            return Err(MapFmtError::UnexpectedEnd);
        }

        let slice = &self.buf[self.at..self.at + len];
        self.at += len;
        Ok(slice)
    }

    /// Reads a fixed size array.
    pub fn read_arr<const N: usize>(&mut self) -> MapFmtResult<[u8; N]> {
        let mut arr = [0; N];
        arr.copy_from_slice(self.read_slice(N)?);
        Ok(arr)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> MapFmtResult<u8> {
        let [b] = self.read_arr::<1>()?;
        Ok(b)
    }
}
