//! Error types for LUT loading and caching.

use std::io;

use lutkit_lut::LutError;
use thiserror::Error;

/// I/O and cache error.
#[derive(Debug, Error)]
pub enum IoError {
    /// Parsing or validation failure from `lutkit-lut`.
    #[error(transparent)]
    Lut(#[from] LutError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Entry does not fit the cache even when empty.
    #[error("cache entry of {footprint} bytes exceeds cache limit of {max_size} bytes")]
    EntryTooLarge {
        /// Configured byte budget.
        max_size: usize,
        /// Footprint of the rejected entry.
        footprint: usize,
    },

    /// Rejected cache configuration.
    #[error("invalid cache configuration: {0}")]
    InvalidConfig(String),
}

impl IoError {
    /// The wrapped [`LutError`], if this error came from parsing.
    pub fn as_lut_error(&self) -> Option<&LutError> {
        match self {
            IoError::Lut(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Shorthand used by decoders for malformed image data.
pub(crate) fn invalid_image(msg: impl Into<String>) -> IoError {
    IoError::Lut(LutError::InvalidImage(msg.into()))
}

/// Shorthand for unsupported layouts.
pub(crate) fn invalid_format(msg: impl Into<String>) -> IoError {
    IoError::Lut(LutError::InvalidFormat(msg.into()))
}
