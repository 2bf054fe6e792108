//! Planar floating-point image buffer.
//!
//! [`PixelBuffer`] is the only image container in soq. It holds one dense,
//! row-major `f32` plane per channel and a [`ChannelOrder`] naming those
//! channels:
//!
//! ```text
//! plane 0: [B B B B ...]  <- row 0, row 1, ...
//! plane 1: [G G G G ...]
//! plane 2: [R R R R ...]
//! order:   "BGR"
//! ```
//!
//! Sample values keep the range they were decoded with (0..255 for 8-bit
//! sources); nothing here rescales them.
//!
//! The type is a pure shape/storage abstraction. Colour conversion, resizing
//! and statistics live in `soq-ops` and always produce a new buffer.
//!
//! # Example
//!
//! ```rust
//! use soq_core::{ChannelOrder, PixelBuffer};
//!
//! let buf = PixelBuffer::new(4, 2, 3).unwrap();
//! assert_eq!(buf.dimensions(), (4, 2));
//! assert_eq!(buf.order(), ChannelOrder::RGB);
//! assert!(buf.plane(1).iter().all(|&v| v == 0.0));
//!
//! let other = PixelBuffer::like_shape(&buf).unwrap();
//! assert!(other.same_shape(&buf));
//! ```

use crate::{ChannelOrder, Error, Result, MAX_CHANNELS};

/// Planar `f32` image with a labelled channel order.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    order: ChannelOrder,
    planes: Vec<Vec<f32>>,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer with the standard order for `channels`
    /// (`Y`, `YA`, `RGB` or `RGBA`).
    ///
    /// # Errors
    ///
    /// - [`Error::ChannelMismatch`] if `channels` is outside 1..=4
    /// - [`Error::InvalidDimensions`] for a zero or overflowing size
    /// - [`Error::AllocationFailed`] if the planes cannot be reserved
    pub fn new(width: u32, height: u32, channels: usize) -> Result<Self> {
        let order = ChannelOrder::standard(channels)
            .ok_or_else(|| Error::channel_mismatch(MAX_CHANNELS, channels))?;
        Self::with_order(width, height, order)
    }

    /// Creates a zero-filled buffer whose channel count is `order.len()`.
    pub fn with_order(width: u32, height: u32, order: ChannelOrder) -> Result<Self> {
        let channels = order.len();
        if channels == 0 {
            return Err(Error::channel_mismatch(1, 0));
        }
        let samples = plane_len(width, height)?;
        let mut planes = Vec::with_capacity(channels);
        for _ in 0..channels {
            planes.push(zeroed_plane(samples)?);
        }
        Ok(Self {
            width,
            height,
            order,
            planes,
        })
    }

    /// Creates a zero-filled buffer with the width, height, channel count and
    /// channel order of `other`.
    pub fn like_shape(other: &PixelBuffer) -> Result<Self> {
        Self::with_order(other.width, other.height, other.order)
    }

    /// Wraps existing planes.
    ///
    /// # Errors
    ///
    /// Fails when the plane count differs from `order.len()` or a plane does not
    /// hold exactly `width * height` samples.
    pub fn from_planes(
        width: u32,
        height: u32,
        order: ChannelOrder,
        planes: Vec<Vec<f32>>,
    ) -> Result<Self> {
        let samples = plane_len(width, height)?;
        if order.is_empty() || planes.len() != order.len() {
            return Err(Error::channel_mismatch(order.len(), planes.len()));
        }
        if let Some(bad) = planes.iter().find(|p| p.len() != samples) {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples per plane, got {}", samples, bad.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            order,
            planes,
        })
    }

    /// Builds a buffer from pixel-interleaved samples (`[c0 c1 c2 c0 c1 c2 ...]`),
    /// the layout decoders produce.
    pub fn from_interleaved(
        width: u32,
        height: u32,
        order: ChannelOrder,
        samples: &[f32],
    ) -> Result<Self> {
        let channels = order.len();
        let pixels = plane_len(width, height)?;
        if channels == 0 || samples.len() != pixels * channels {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!(
                    "expected {} interleaved samples, got {}",
                    pixels * channels,
                    samples.len()
                ),
            ));
        }

        let mut planes = Vec::with_capacity(channels);
        for _ in 0..channels {
            let mut plane = Vec::new();
            plane
                .try_reserve_exact(pixels)
                .map_err(|e| Error::allocation_failed(pixels * size_of::<f32>(), e.to_string()))?;
            planes.push(plane);
        }
        for pixel in samples.chunks_exact(channels) {
            for (plane, &v) in planes.iter_mut().zip(pixel) {
                plane.push(v);
            }
        }

        Ok(Self {
            width,
            height,
            order,
            planes,
        })
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Returns the channel order label.
    #[inline]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Returns the number of pixels in one plane.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns channel `c` as a row-major slice.
    ///
    /// # Panics
    ///
    /// Panics if `c >= self.channels()`.
    #[inline]
    pub fn plane(&self, c: usize) -> &[f32] {
        &self.planes[c]
    }

    /// Returns channel `c` mutably.
    #[inline]
    pub fn plane_mut(&mut self, c: usize) -> &mut [f32] {
        &mut self.planes[c]
    }

    /// Returns all planes in channel order.
    #[inline]
    pub fn planes(&self) -> &[Vec<f32>] {
        &self.planes
    }

    /// Consumes the buffer, returning its planes.
    pub fn into_planes(self) -> Vec<Vec<f32>> {
        self.planes
    }

    /// Returns `true` when `other` has the same dimensions, channel count and
    /// channel order.
    #[inline]
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
            && self.channels() == other.channels()
            && self.order == other.order
    }
}

/// Samples per plane, rejecting empty or overflowing sizes.
fn plane_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|n| n.checked_mul(size_of::<f32>() * MAX_CHANNELS).is_some())
        .ok_or_else(|| Error::invalid_dimensions(width, height, "sample count overflows"))
}

fn zeroed_plane(samples: usize) -> Result<Vec<f32>> {
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(samples)
        .map_err(|e| Error::allocation_failed(samples * size_of::<f32>(), e.to_string()))?;
    plane.resize(samples, 0.0);
    Ok(plane)
}
