//! Error types for decoding operations.

use std::io;
use thiserror::Error;

/// Decoding error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Unsupported bit depth or colour type.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Buffer construction failed (allocation, dimensions).
    #[error(transparent)]
    Core(#[from] soq_core::Error),
}

/// Result type for decoding operations.
pub type IoResult<T> = Result<T, IoError>;
