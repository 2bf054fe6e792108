//! Channel-order conversions and the colour mapping table.
//!
//! The table is a process-wide, read-only map from a normalized
//! `(from, to)` [`ChannelOrder`] pair to a [`Conversion`]. It is built once on
//! first use and never mutated.
//!
//! | from   | to     | conversion              |
//! |--------|--------|-------------------------|
//! | `RGB`  | `YUV`  | [`Conversion::RgbToYuv`] |
//! | `BGR`  | `YUV`  | [`Conversion::BgrToYuv`] |
//! | `YUV`  | `RGB`  | [`Conversion::YuvToRgb`] |
//! | `YUV`  | `BGR`  | [`Conversion::YuvToBgr`] |
//! | `RGB`  | `BGR`  | [`Conversion::SwapRedBlue`] |
//! | `BGR`  | `RGB`  | [`Conversion::SwapRedBlue`] |
//! | `RGBA` | `BGRA` | [`Conversion::SwapRedBlue`] |
//! | `BGRA` | `RGBA` | [`Conversion::SwapRedBlue`] |
//!
//! # YUV
//!
//! BT.601 luma with chroma centred on 128, so 8-bit samples stay in 0..255.
//! Channel order of a `YUV` buffer is Y, Cr, Cb: the second channel is the
//! red difference and the third the blue difference, as in OpenCV's YCrCb.
//! The `U`/`V` labels name positions, not chroma axes.
//!
//! ```rust
//! use soq_core::ChannelOrder;
//! use soq_ops::color::{lookup, Conversion};
//!
//! assert_eq!(lookup(ChannelOrder::RGB, ChannelOrder::YUV), Some(Conversion::RgbToYuv));
//! assert_eq!(lookup(ChannelOrder::RGB, "XYZ".into()), None);
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use soq_core::{ChannelOrder, PixelBuffer};
use tracing::trace;

use crate::{OpsError, OpsResult};

/// BT.601 luma weights.
pub const KR: f32 = 0.299;
/// BT.601 luma weights.
pub const KG: f32 = 0.587;
/// BT.601 luma weights.
pub const KB: f32 = 0.114;

/// Chroma offset for 8-bit-range samples.
pub const CHROMA_OFFSET: f32 = 128.0;

const CB_SCALE: f32 = 0.564;
const CR_SCALE: f32 = 0.713;
const CR_TO_R: f32 = 1.403;
const CR_TO_G: f32 = -0.714;
const CB_TO_G: f32 = -0.344;
const CB_TO_B: f32 = 1.773;

/// A known conversion between two channel orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Exchange the first and third channel; any further channel is copied.
    SwapRedBlue,
    /// `RGB` to `YUV`.
    RgbToYuv,
    /// `BGR` to `YUV`.
    BgrToYuv,
    /// `YUV` to `RGB`.
    YuvToRgb,
    /// `YUV` to `BGR`.
    YuvToBgr,
}

static COLOUR_MAP: LazyLock<HashMap<(ChannelOrder, ChannelOrder), Conversion>> =
    LazyLock::new(|| {
        use ChannelOrder as O;
        HashMap::from([
            ((O::RGB, O::YUV), Conversion::RgbToYuv),
            ((O::BGR, O::YUV), Conversion::BgrToYuv),
            ((O::YUV, O::RGB), Conversion::YuvToRgb),
            ((O::YUV, O::BGR), Conversion::YuvToBgr),
            ((O::RGB, O::BGR), Conversion::SwapRedBlue),
            ((O::BGR, O::RGB), Conversion::SwapRedBlue),
            ((O::RGBA, O::BGRA), Conversion::SwapRedBlue),
            ((O::BGRA, O::RGBA), Conversion::SwapRedBlue),
        ])
    });

/// Looks up the conversion from `from` to `to`.
///
/// Exact on the normalized labels: no fallback, no chaining.
pub fn lookup(from: ChannelOrder, to: ChannelOrder) -> Option<Conversion> {
    COLOUR_MAP.get(&(from, to)).copied()
}

/// Converts `src` to the order `to` through the table.
///
/// Always returns a new buffer; `src` is left untouched.
///
/// # Errors
///
/// [`OpsError::UnsupportedConversion`] when the pair is not in the table.
pub fn convert(src: &PixelBuffer, to: ChannelOrder) -> OpsResult<PixelBuffer> {
    let from = src.order();
    let conversion = lookup(from, to).ok_or(OpsError::UnsupportedConversion { from, to })?;
    trace!(%from, %to, ?conversion, "colour conversion");
    conversion.apply(src, to)
}

impl Conversion {
    /// Applies the conversion, producing a buffer labelled `to`.
    pub fn apply(&self, src: &PixelBuffer, to: ChannelOrder) -> OpsResult<PixelBuffer> {
        if src.channels() != to.len() || src.channels() < 3 {
            return Err(OpsError::InvalidParameter(format!(
                "{:?} cannot map {} channel(s) of {} to {}",
                self,
                src.channels(),
                src.order(),
                to
            )));
        }

        let (width, height) = src.dimensions();
        let mut out = PixelBuffer::with_order(width, height, to)?;

        match self {
            Conversion::SwapRedBlue => {
                for c in 0..src.channels() {
                    let from = match c {
                        0 => 2,
                        2 => 0,
                        other => other,
                    };
                    out.plane_mut(c).copy_from_slice(src.plane(from));
                }
            }
            Conversion::RgbToYuv => to_yuv(src, &mut out, 0, 2),
            Conversion::BgrToYuv => to_yuv(src, &mut out, 2, 0),
            Conversion::YuvToRgb => from_yuv(src, &mut out, 0, 2),
            Conversion::YuvToBgr => from_yuv(src, &mut out, 2, 0),
        }

        Ok(out)
    }
}

/// Converts one RGB sample to `[y, cr, cb]`, the `YUV` buffer layout.
#[inline]
pub fn rgb_to_yuv(r: f32, g: f32, b: f32) -> [f32; 3] {
    let y = KR * r + KG * g + KB * b;
    let cr = (r - y) * CR_SCALE + CHROMA_OFFSET;
    let cb = (b - y) * CB_SCALE + CHROMA_OFFSET;
    [y, cr, cb]
}

/// Converts one `[y, cr, cb]` sample back to RGB.
#[inline]
pub fn yuv_to_rgb(y: f32, cr: f32, cb: f32) -> [f32; 3] {
    let cr = cr - CHROMA_OFFSET;
    let cb = cb - CHROMA_OFFSET;
    [
        y + CR_TO_R * cr,
        y + CR_TO_G * cr + CB_TO_G * cb,
        y + CB_TO_B * cb,
    ]
}

/// `r`/`b` are the plane indices of red and blue in `src`.
fn to_yuv(src: &PixelBuffer, out: &mut PixelBuffer, r: usize, b: usize) {
    let n = src.pixel_count();
    let mut yuv = vec![[0.0f32; 3]; n];
    for (i, dst) in yuv.iter_mut().enumerate() {
        *dst = rgb_to_yuv(src.plane(r)[i], src.plane(1)[i], src.plane(b)[i]);
    }
    scatter(&yuv, out, [0, 1, 2]);
}

/// `r`/`b` are the plane indices of red and blue in `out`.
fn from_yuv(src: &PixelBuffer, out: &mut PixelBuffer, r: usize, b: usize) {
    let n = src.pixel_count();
    let mut rgb = vec![[0.0f32; 3]; n];
    for (i, dst) in rgb.iter_mut().enumerate() {
        *dst = yuv_to_rgb(src.plane(0)[i], src.plane(1)[i], src.plane(2)[i]);
    }
    scatter(&rgb, out, [r, 1, b]);
}

/// Writes triple component `k` into plane `targets[k]`.
fn scatter(triples: &[[f32; 3]], out: &mut PixelBuffer, targets: [usize; 3]) {
    for (k, &plane) in targets.iter().enumerate() {
        for (dst, t) in out.plane_mut(plane).iter_mut().zip(triples) {
            *dst = t[k];
        }
    }
}
