//! Image resize and resampling operations.
//!
//! Separable two-pass resampling (horizontal, then vertical) of single planes
//! with a Catmull-Rom cubic, the filter used to align images before
//! comparison. Kernel contributions are computed once per axis.
//!
//! Source positions outside the image clamp to the nearest edge sample, and
//! weights are renormalized per output sample, so a constant plane stays
//! constant.
//!
//! # Example
//!
//! ```rust
//! use soq_ops::resize::resize_plane;
//!
//! let src = vec![0.5f32; 16 * 16];
//! let dst = resize_plane(&src, 16, 16, 32, 8).unwrap();
//! assert_eq!(dst.len(), 32 * 8);
//! ```

use soq_core::PixelBuffer;
use tracing::debug;

use crate::{OpsError, OpsResult};

/// Support radius of the Catmull-Rom kernel.
const SUPPORT: f32 = 2.0;

/// Catmull-Rom weight at distance `x`: the Keys cubic with `a = -0.5`.
///
/// Interpolating: 1 at 0 and 0 at every other integer.
#[inline]
pub fn catmull_rom(x: f32) -> f32 {
    const A: f32 = -0.5;
    let ax = x.abs();
    if ax < 1.0 {
        ((A + 2.0) * ax - (A + 3.0)) * ax * ax + 1.0
    } else if ax < SUPPORT {
        ((A * ax - 5.0 * A) * ax + 8.0 * A) * ax - 4.0 * A
    } else {
        0.0
    }
}

/// Source indices and normalized weights for one output sample.
#[derive(Debug, Clone)]
struct Contribution {
    taps: Vec<(usize, f32)>,
}

/// Builds the contributions for resampling an axis of `src_len` samples to
/// `dst_len` samples.
fn contributions(src_len: usize, dst_len: usize) -> Vec<Contribution> {
    let scale = src_len as f32 / dst_len as f32;
    // Widen the kernel when shrinking so every source sample contributes.
    let filter_scale = scale.max(1.0);
    let support = SUPPORT * filter_scale;
    let last = src_len as isize - 1;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let lo = (center - support).floor() as isize;
            let hi = (center + support).ceil() as isize;

            let mut taps: Vec<(usize, f32)> = (lo..=hi)
                .filter_map(|sx| {
                    let w = catmull_rom((sx as f32 - center) / filter_scale);
                    (w != 0.0).then(|| (sx.clamp(0, last) as usize, w))
                })
                .collect();

            let total: f32 = taps.iter().map(|&(_, w)| w).sum();
            if total.abs() > f32::EPSILON {
                for tap in &mut taps {
                    tap.1 /= total;
                }
            } else {
                let nearest = (center.round() as isize).clamp(0, last) as usize;
                taps = vec![(nearest, 1.0)];
            }

            Contribution { taps }
        })
        .collect()
}

/// Resizes one row-major plane.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if `src` does not hold `src_w * src_h`
/// samples or any dimension is zero.
pub fn resize_plane(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> OpsResult<Vec<f32>> {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot resize {src_w}x{src_h} to {dst_w}x{dst_h}"
        )));
    }
    if src.len() != src_w * src_h {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            src_w * src_h,
            src.len()
        )));
    }

    let columns = contributions(src_w, dst_w);
    let rows = contributions(src_h, dst_h);

    // Horizontal pass: src_h rows of dst_w samples
    let mut temp = Vec::with_capacity(dst_w * src_h);
    for row in src.chunks_exact(src_w) {
        for c in &columns {
            temp.push(c.taps.iter().map(|&(sx, w)| row[sx] * w).sum::<f32>());
        }
    }

    // Vertical pass
    let mut dst = vec![0.0f32; dst_w * dst_h];
    for (out, r) in dst.chunks_exact_mut(dst_w).zip(&rows) {
        for &(sy, w) in &r.taps {
            let row = &temp[sy * dst_w..(sy + 1) * dst_w];
            for (o, &v) in out.iter_mut().zip(row) {
                *o += v * w;
            }
        }
    }

    Ok(dst)
}

/// Resizes every plane of `src` into a new buffer with the same channel order.
pub fn resize(src: &PixelBuffer, width: u32, height: u32) -> OpsResult<PixelBuffer> {
    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    debug!(src_w, src_h, width, height, "resize");

    let mut out = PixelBuffer::with_order(width, height, src.order())?;
    for c in 0..src.channels() {
        let plane = resize_plane(
            src.plane(c),
            src_w,
            src_h,
            width as usize,
            height as usize,
        )?;
        out.plane_mut(c).copy_from_slice(&plane);
    }
    Ok(out)
}
