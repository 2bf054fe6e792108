//! Error types for soq-core operations.
//!
//! Covers the failure modes of building a [`crate::PixelBuffer`]: allocation,
//! invalid sizes and channel counts that disagree with the channel order.
//!
//! # Usage
//!
//! ```rust
//! use soq_core::{Error, PixelBuffer};
//!
//! let err = PixelBuffer::new(0, 4, 3).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions { .. }));
//! ```

use thiserror::Error;

/// Result alias for buffer construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while creating or reshaping pixel buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Memory allocation failed.
    ///
    /// Returned when the storage for a buffer cannot be reserved. Callers
    /// treat this as fatal.
    #[error("cannot allocate {requested} bytes for pixel storage: {reason}")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
        /// Failure reason
        reason: String,
    },

    /// Invalid image dimensions.
    ///
    /// Width or height is zero, or the sample count overflows `usize`.
    #[error("bad image size {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// What is wrong with them
        reason: String,
    },

    /// Channel count is outside 1..=4 or disagrees with the channel order.
    #[error("expected {expected} channel(s), got {got}")]
    ChannelMismatch {
        /// Expected channel count
        expected: usize,
        /// Actual channel count
        got: usize,
    },
}

impl Error {
    /// Shorthand for [`Error::AllocationFailed`].
    #[inline]
    pub fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::InvalidDimensions`].
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::ChannelMismatch`].
    #[inline]
    pub fn channel_mismatch(expected: usize, got: usize) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// `true` for [`Error::AllocationFailed`].
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}
