//! Error types for image operations.

use soq_core::ChannelOrder;
use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// No entry in the colour mapping table for this pair of orders.
    #[error("No colour mapping {from} -> {to}")]
    UnsupportedConversion {
        /// Order of the buffer being converted.
        from: ChannelOrder,
        /// Requested order.
        to: ChannelOrder,
    },

    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer construction failed (allocation, dimensions).
    #[error(transparent)]
    Core(#[from] soq_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
