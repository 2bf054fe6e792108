//! # soq-core
//!
//! Core types shared by every soq crate:
//!
//! - [`PixelBuffer`] - planar, single-precision image with a labelled channel order
//! - [`ChannelOrder`] - up to four single-letter channel tags (`RGB`, `BGR`, `YUV`, ...)
//! - [`Error`] / [`Result`] - buffer construction errors
//!
//! ## Crate Structure
//!
//! ```text
//! soq-core (this crate)
//!    ^
//!    |
//!    +-- soq-io  (decoding into PixelBuffer)
//!    +-- soq-ops (normalization, windowed statistics, metrics)
//!    +-- soq-cli (the `soq` binary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod order;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use order::ChannelOrder;

/// Maximum number of channels a [`PixelBuffer`] can carry.
pub const MAX_CHANNELS: usize = 4;
