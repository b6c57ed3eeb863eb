//! Error types for Yaz0 decompression.

use thiserror::Error;

/// Errors that can occur while decompressing a Yaz0 stream.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid magic bytes.
    #[error("invalid Yaz0 magic: expected \"Yaz0\", got {actual:?}")]
    InvalidMagic { actual: [u8; 4] },

    /// Compressed stream ended before the declared output size was produced.
    #[error("truncated Yaz0 stream at byte {offset}")]
    Truncated { offset: usize },

    /// Back-reference pointing before the start of the output.
    #[error("Yaz0 back-reference distance {distance} exceeds {produced} produced bytes")]
    InvalidBackReference { distance: usize, produced: usize },
}

/// Result type for Yaz0 operations.
pub type Result<T> = std::result::Result<T, Error>;
