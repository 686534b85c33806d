use thiserror::Error;

use crate::magic::MagicBytes;
use crate::types::TypeTag;

/// Errors from psbt-map-fmt.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MapFmtError {
    /// Input did not start with the magic bytes of the configured format.
    #[error("invalid magic (expected {expected}, found \"{}\")", .found.escape_ascii())]
    InvalidMagic {
        /// The magic bytes we were configured with.
        expected: MagicBytes,

        /// The bytes found where the magic should have been.
        found: Vec<u8>,
    },

    /// If we tried to read past the end of the underlying buffer.
    #[error("would overrun end of input")]
    UnexpectedEnd,

    /// If there was extra data in a buffer that we didn't consume reading a
    /// file.
    #[error("extra unnecessary input leftover ({0} bytes)")]
    ExtraInput(usize),

    /// A type-specific decoder was handed an entry of another type.
    #[error("map entry has type {found}, expected {expected}")]
    TypeMismatch {
        /// Type tag the decoder handles.
        expected: TypeTag,

        /// Type tag of the entry.
        found: TypeTag,
    },

    /// Number of maps doesn't agree with a fixed file shape.
    #[error("file expects {expected} maps (got {found})")]
    MapCountMismatch {
        /// Number of maps in the fixed shape.
        expected: usize,

        /// Number of maps provided.
        found: usize,
    },
}

/// Wrapper result type.
pub type MapFmtResult<T> = Result<T, MapFmtError>;
