use psbt_map_fmt::MapFmtError;
use thiserror::Error;

/// Errors for encoding and decoding descriptor files.
#[derive(Debug, Error)]
pub enum DescFmtError {
    /// Container level error.
    #[error(transparent)]
    Map(#[from] MapFmtError),

    /// Descriptor name wasn't UTF-8.
    #[error("invalid descriptor name: \"{}\"", .0.escape_ascii())]
    InvalidName(Vec<u8>),

    /// Extended key entry was malformed.
    #[error("invalid key at index {index}: {source}")]
    InvalidKey {
        /// Index of the key among the keys decoded so far.
        index: usize,

        /// What was wrong with it.
        source: MapFmtError,
    },

    /// Global map had no descriptor entry.
    #[error("missing output descriptor entry")]
    MissingDescriptor,

    /// Raw key material isn't a valid BIP-32 extended key.
    #[error("bip32: {0}")]
    Bip32(#[from] bitcoin::bip32::Error),
}

/// Wrapper result type.
pub type DescFmtResult<T> = Result<T, DescFmtError>;
