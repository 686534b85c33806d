use std::fmt;

/// Magic bytes a file starts with.
///
/// These are a short ASCII tag, conventionally terminated by a `0xff` byte
/// that can't occur in text (`psbt\xff`, `bod\xff`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MagicBytes(&'static [u8]);

impl MagicBytes {
    /// Creates a new `MagicBytes` from a static byte string.
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self(bytes)
    }

    /// Returns the magic bytes as a byte slice.
    pub const fn as_bytes(&self) -> &'static [u8] {
        self.0
    }

    /// Returns the length of the magic in bytes.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns if the magic is empty, which would make it not very magic.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for MagicBytes {
    fn as_ref(&self) -> &[u8] {
        self.0
    }
}

impl fmt::Display for MagicBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}
