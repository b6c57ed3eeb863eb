//! Error types for GTX encoding.

use thiserror::Error;

/// Errors that can occur when building a GTX container.
#[derive(Debug, Error)]
pub enum Error {
    /// Image payload length disagrees with the surface description.
    #[error("image payload is {actual} bytes but the surface declares {declared}")]
    ImageSizeMismatch { declared: u32, actual: usize },

    /// Mipmap payload length disagrees with the surface description.
    #[error("mipmap payload is {actual} bytes but the surface declares {declared}")]
    MipmapSizeMismatch { declared: u32, actual: usize },
}

/// Result type for GTX operations.
pub type Result<T> = std::result::Result<T, Error>;
