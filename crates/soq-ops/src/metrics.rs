//! Full-reference quality metrics: MSE, PSNR and SSIM.
//!
//! Every metric compares two buffers of identical shape and channel order
//! channel by channel, and emits one value per channel, in channel order, with
//! the channel's tag as label.
//!
//! Channels are computed independently (in parallel with the `parallel`
//! feature) and emitted afterwards. Each channel's own reduction runs in
//! storage order, so values do not depend on the thread count.
//!
//! # Example
//!
//! ```rust
//! use soq_core::PixelBuffer;
//! use soq_ops::metrics::Metric;
//! use soq_ops::sink::CollectSink;
//!
//! let a = PixelBuffer::new(8, 8, 3).unwrap();
//! let mut sink = CollectSink::new();
//! Metric::Psnr.run(&a, &a.clone(), &mut sink);
//! assert_eq!(sink.labels(), "RGB");
//! assert!(sink.values().iter().all(|v| v.is_infinite()));
//! ```

use std::fmt;

use soq_core::PixelBuffer;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::field::Field;
use crate::sink::{PsnrSink, ResultSink};
use crate::window::Window;

/// Peak sample value assumed by PSNR and the SSIM constants.
pub const PEAK: f64 = 255.0;

/// SSIM luminance stabilizer, `(0.01 * PEAK)^2`.
pub const SSIM_C1: f64 = 6.5025;

/// SSIM contrast stabilizer, `(0.03 * PEAK)^2`.
pub const SSIM_C2: f64 = 58.5225;

/// A comparison metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Mean squared error.
    Mse,
    /// Peak signal-to-noise ratio in dB.
    Psnr,
    /// Structural similarity index.
    Ssim,
}

impl Metric {
    /// All metrics.
    pub const ALL: [Metric; 3] = [Metric::Mse, Metric::Psnr, Metric::Ssim];

    /// Lower-case name, used as the output prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Mse => "mse",
            Metric::Psnr => "psnr",
            Metric::Ssim => "ssim",
        }
    }

    /// Computes the metric and emits one value per channel into `sink`.
    ///
    /// # Panics
    ///
    /// Panics if the buffers differ in width, height, channel count or order.
    pub fn run(&self, a: &PixelBuffer, b: &PixelBuffer, sink: &mut dyn ResultSink) {
        match self {
            Metric::Mse => mse(a, b, sink),
            Metric::Psnr => psnr(a, b, sink),
            Metric::Ssim => ssim(a, b, sink),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Emits the per-channel MSE.
pub fn mse(a: &PixelBuffer, b: &PixelBuffer, sink: &mut dyn ResultSink) {
    emit(a, &mse_values(a, b), sink);
}

/// Emits the per-channel PSNR, `10 * log10(PEAK^2 / mse)`.
pub fn psnr(a: &PixelBuffer, b: &PixelBuffer, sink: &mut dyn ResultSink) {
    mse(a, b, &mut PsnrSink::new(sink));
}

/// Emits the per-channel mean SSIM.
pub fn ssim(a: &PixelBuffer, b: &PixelBuffer, sink: &mut dyn ResultSink) {
    emit(a, &ssim_values(a, b), sink);
}

/// Per-channel mean of `(a - b)^2`.
///
/// # Panics
///
/// Panics if the buffers differ in shape or channel order.
pub fn mse_values(a: &PixelBuffer, b: &PixelBuffer) -> Vec<f64> {
    check_shape(a, b);
    per_channel(a.channels(), |c| plane_mse(a.plane(c), b.plane(c)))
}

/// Per-channel PSNR in dB. Identical channels give `+inf`.
pub fn psnr_values(a: &PixelBuffer, b: &PixelBuffer) -> Vec<f64> {
    mse_values(a, b).into_iter().map(psnr_from_mse).collect()
}

/// Per-channel mean of the SSIM map.
///
/// # Panics
///
/// Panics if the buffers differ in shape or channel order.
pub fn ssim_values(a: &PixelBuffer, b: &PixelBuffer) -> Vec<f64> {
    check_shape(a, b);
    let (width, height) = (a.width() as usize, a.height() as usize);
    let window = Window::ssim();
    per_channel(a.channels(), |c| {
        let x = Field::from_plane(a.plane(c), width, height);
        let y = Field::from_plane(b.plane(c), width, height);
        ssim_map(&window, &x, &y).mean()
    })
}

/// Maps an MSE to PSNR against [`PEAK`]. Zero error is `+inf`.
#[inline]
pub fn psnr_from_mse(mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (PEAK * PEAK / mse).log10()
    }
}

/// The SSIM map of two fields:
/// `((2 mu1 mu2 + C1)(2 s12 + C2)) / ((mu1^2 + mu2^2 + C1)(s1^2 + s2^2 + C2))`.
pub fn ssim_map(window: &Window, x: &Field, y: &Field) -> Field {
    let m = window.moments(x, y);

    let num = m
        .mu1
        .zip_map(&m.mu2, |a, b| 2.0 * a * b + SSIM_C1)
        .zip_map(&m.sigma12, |l, s| l * (2.0 * s + SSIM_C2));
    let den = m
        .mu1
        .zip_map(&m.mu2, |a, b| a * a + b * b + SSIM_C1)
        .zip_map(&m.sigma1_sq.zip_map(&m.sigma2_sq, |s1, s2| s1 + s2), |l, s| {
            l * (s + SSIM_C2)
        });

    num.zip_map(&den, |n, d| n / d)
}

fn plane_mse(a: &[f32], b: &[f32]) -> f64 {
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    sum / a.len() as f64
}

fn check_shape(a: &PixelBuffer, b: &PixelBuffer) {
    assert!(
        a.same_shape(b),
        "metric inputs differ: {}x{} {} vs {}x{} {}",
        a.width(),
        a.height(),
        a.order(),
        b.width(),
        b.height(),
        b.order()
    );
}

fn emit(buf: &PixelBuffer, values: &[f64], sink: &mut dyn ResultSink) {
    let order = buf.order();
    for (c, &value) in values.iter().enumerate() {
        sink.emit(order.tag(c), value);
    }
}

/// Evaluates `f` for each channel index, results in channel order.
#[cfg(feature = "parallel")]
fn per_channel<F>(channels: usize, f: F) -> Vec<f64>
where
    F: Fn(usize) -> f64 + Sync + Send,
{
    debug!(channels, "computing channels in parallel");
    (0..channels).into_par_iter().map(f).collect()
}

/// Evaluates `f` for each channel index, results in channel order.
#[cfg(not(feature = "parallel"))]
fn per_channel<F>(channels: usize, f: F) -> Vec<f64>
where
    F: Fn(usize) -> f64,
{
    debug!(channels, "computing channels");
    (0..channels).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectSink;
    use approx::assert_abs_diff_eq;
    use soq_core::ChannelOrder;

    fn gradient(width: u32, height: u32, channels: usize) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height, channels).unwrap();
        for c in 0..channels {
            for (i, v) in buf.plane_mut(c).iter_mut().enumerate() {
                *v = ((i * 7 + c * 40) % 256) as f32;
            }
        }
        buf
    }

    fn filled(width: u32, height: u32, order: ChannelOrder, value: f32) -> PixelBuffer {
        let planes = vec![vec![value; (width * height) as usize]; order.len()];
        PixelBuffer::from_planes(width, height, order, planes).unwrap()
    }

    fn collect(metric: Metric, a: &PixelBuffer, b: &PixelBuffer) -> CollectSink {
        let mut sink = CollectSink::new();
        metric.run(a, b, &mut sink);
        sink
    }

    #[test]
    fn test_identical_images() {
        for channels in 1..=4 {
            let a = gradient(23, 17, channels);
            let b = a.clone();

            let mse = collect(Metric::Mse, &a, &b);
            assert_eq!(mse.values(), vec![0.0; channels]);

            let psnr = collect(Metric::Psnr, &a, &b);
            assert!(psnr.values().iter().all(|&v| v == f64::INFINITY));

            let ssim = collect(Metric::Ssim, &a, &b);
            assert_eq!(ssim.results().len(), channels);
            for v in ssim.values() {
                assert_abs_diff_eq!(v, 1.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_flat_2x2_images() {
        let a = filled(2, 2, ChannelOrder::RGB, 128.0);
        let b = filled(2, 2, ChannelOrder::RGB, 128.0);
        assert_eq!(mse_values(&a, &b), vec![0.0; 3]);
        assert_eq!(psnr_values(&a, &b), vec![f64::INFINITY; 3]);
        for v in ssim_values(&a, &b) {
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_known_values() {
        let a = filled(6, 5, ChannelOrder::Y, 0.0);
        let b = filled(6, 5, ChannelOrder::Y, 10.0);

        assert_abs_diff_eq!(mse_values(&a, &b)[0], 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            psnr_values(&a, &b)[0],
            10.0 * (65025.0f64 / 100.0).log10(),
            epsilon = 1e-12
        );
        // Flat fields: only the luminance term remains
        assert_abs_diff_eq!(
            ssim_values(&a, &b)[0],
            SSIM_C1 / (100.0 + SSIM_C1),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_labels_follow_channel_order() {
        let a = filled(4, 4, ChannelOrder::BGR, 10.0);
        let b = filled(4, 4, ChannelOrder::BGR, 12.0);
        for metric in Metric::ALL {
            assert_eq!(collect(metric, &a, &b).labels(), "BGR");
        }

        let ya = filled(4, 4, ChannelOrder::YA, 1.0);
        assert_eq!(collect(Metric::Mse, &ya, &ya).labels(), "YA");
    }

    #[test]
    fn test_ssim_decreases_with_noise() {
        let a = gradient(32, 32, 1);
        let mut b = a.clone();
        for (i, v) in b.plane_mut(0).iter_mut().enumerate() {
            *v += if i % 2 == 0 { 20.0 } else { -20.0 };
        }
        let s = ssim_values(&a, &b)[0];
        assert!(s < 1.0);
        assert!(s > -1.0);
        assert_abs_diff_eq!(mse_values(&a, &b)[0], 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_psnr_from_mse() {
        assert_eq!(psnr_from_mse(0.0), f64::INFINITY);
        assert_abs_diff_eq!(psnr_from_mse(PEAK * PEAK), 0.0);
        assert_abs_diff_eq!(psnr_from_mse(65.025), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_metric_names() {
        let names: Vec<_> = Metric::ALL.iter().map(Metric::name).collect();
        assert_eq!(names, ["mse", "psnr", "ssim"]);
        assert_eq!(Metric::Ssim.to_string(), "ssim");
    }

    #[test]
    #[should_panic(expected = "metric inputs differ")]
    fn test_shape_mismatch_panics() {
        let a = filled(4, 4, ChannelOrder::RGB, 0.0);
        let b = filled(4, 2, ChannelOrder::RGB, 0.0);
        mse_values(&a, &b);
    }

    #[test]
    #[should_panic(expected = "metric inputs differ")]
    fn test_order_mismatch_panics() {
        let a = filled(4, 4, ChannelOrder::RGB, 0.0);
        let b = filled(4, 4, ChannelOrder::BGR, 0.0);
        ssim_values(&a, &b);
    }
}
