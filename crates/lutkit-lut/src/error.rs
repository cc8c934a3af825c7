//! LUT error types.

use crate::ColorSpaceTag;
use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while building a LUT.
///
/// Every error is terminal for the construction attempt that produced it:
/// parsers never hand back a partially built model.
#[derive(Debug, Error)]
pub enum LutError {
    /// The source has an extension no decoder is registered for.
    #[error("unsupported LUT file: {0}")]
    FileNotSupported(String),

    /// The source file does not exist.
    #[error("LUT file not found: {0}")]
    FileNotFound(String),

    /// Malformed content, unsupported pixel layout, or a palette whose
    /// pixel count is not a perfect cube.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// `LUT_3D_SIZE` absent, unparsable, or outside `1..=256`.
    #[error("missing or invalid LUT_3D_SIZE")]
    MissingDimension,

    /// Payload length disagrees with the cube dimension.
    #[error("invalid data size: expected {expected}, got {actual}")]
    InvalidDataSize {
        /// Expected element count.
        expected: usize,
        /// Element count actually found.
        actual: usize,
    },

    /// The pixel buffer cannot be read.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A table value is non-finite or outside its allowed interval.
    #[error("invalid LUT value: {0}")]
    InvalidLutValue(String),

    /// A color space name outside the supported set was requested strictly.
    #[error("color space not supported: {0}")]
    ColorSpaceNotSupported(String),

    /// The LUT declares a different color space than the consumer requires.
    #[error("color space mismatch: expected {expected}, got {actual}")]
    ColorSpaceMismatch {
        /// Color space required by the consumer.
        expected: ColorSpaceTag,
        /// Color space declared by the LUT.
        actual: ColorSpaceTag,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
