//! Making two images numerically comparable.
//!
//! Before any metric runs, the subject image is brought to the reference's
//! channel order and then to its dimensions. Both steps replace the buffer in
//! place and report whether anything changed. On error the buffer is left as
//! it was.
//!
//! Conversion happens before resampling so interpolation works on samples of
//! the destination order.
//!
//! ```rust
//! use soq_core::{ChannelOrder, PixelBuffer};
//! use soq_ops::normalize::align;
//!
//! let reference = PixelBuffer::with_order(4, 4, ChannelOrder::BGR).unwrap();
//! let mut subject = PixelBuffer::new(2, 2, 3).unwrap();
//!
//! let alignment = align(&mut subject, &reference).unwrap();
//! assert!(alignment.converted && alignment.resized);
//! assert!(subject.same_shape(&reference));
//! ```

use soq_core::{ChannelOrder, PixelBuffer};
use tracing::{debug, info};

use crate::color;
use crate::resize;
use crate::OpsResult;

/// What [`align`] had to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    /// The channel order was converted.
    pub converted: bool,
    /// The image was resampled.
    pub resized: bool,
}

impl Alignment {
    /// `true` if either step modified the buffer.
    pub fn changed(&self) -> bool {
        self.converted || self.resized
    }
}

/// Converts `buffer` to the channel order `to`.
///
/// Returns `Ok(false)` without touching the buffer when it already has that
/// order (labels compare after normalization, so `"bgr"` equals `"BGR"`).
///
/// # Errors
///
/// [`OpsError::UnsupportedConversion`](crate::OpsError::UnsupportedConversion)
/// when no mapping exists for the pair.
pub fn convert_channel_order(buffer: &mut PixelBuffer, to: ChannelOrder) -> OpsResult<bool> {
    let from = buffer.order();
    if from == to {
        debug!(%from, "channel order already matches");
        return Ok(false);
    }

    *buffer = color::convert(buffer, to)?;
    info!(%from, %to, "converted channel order");
    Ok(true)
}

/// Resamples `buffer` to `width` x `height` with the Catmull-Rom filter.
///
/// Returns `Ok(false)` when the dimensions already match.
pub fn resize_to(buffer: &mut PixelBuffer, width: u32, height: u32) -> OpsResult<bool> {
    let (src_w, src_h) = buffer.dimensions();
    if (src_w, src_h) == (width, height) {
        return Ok(false);
    }

    *buffer = resize::resize(buffer, width, height)?;
    info!(src_w, src_h, width, height, "resized image");
    Ok(true)
}

/// Brings `subject` to the channel order and dimensions of `reference`.
pub fn align(subject: &mut PixelBuffer, reference: &PixelBuffer) -> OpsResult<Alignment> {
    let converted = convert_channel_order(subject, reference.order())?;
    let (width, height) = reference.dimensions();
    let resized = resize_to(subject, width, height)?;

    let alignment = Alignment { converted, resized };
    debug!(?alignment, "aligned");
    Ok(alignment)
}
