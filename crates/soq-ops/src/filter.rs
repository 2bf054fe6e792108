//! Separable convolution on [`Field`]s.
//!
//! Provides the Gaussian smoothing that the windowed statistics are built on.
//!
//! # Border handling
//!
//! Samples outside the field are taken by reflect-101 mirroring: the edge
//! sample is not repeated (`dcb|abcd|cba`). The reflection repeats for
//! kernels wider than the field, and an axis of length 1 always reads index 0.
//! Every pass (mean of `x`, of `x^2`, of `x*y`) uses this same policy.
//!
//! # Example
//!
//! ```rust
//! use soq_ops::field::Field;
//! use soq_ops::filter::{convolve, Kernel};
//!
//! let src = Field::filled(16, 16, 0.5);
//! let kernel = Kernel::gaussian(11, 1.5);
//! let blurred = convolve(&src, &kernel);
//! assert!((blurred.at(0, 0) - 0.5).abs() < 1e-12);
//! ```

use crate::field::Field;
use crate::{OpsError, OpsResult};
use tracing::trace;

/// Normalized one-dimensional kernel, applied along both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
}

impl Kernel {
    /// Creates a kernel from explicit weights.
    ///
    /// The length must be odd. Weights are used as given (not normalized).
    pub fn new(weights: Vec<f64>) -> OpsResult<Self> {
        if weights.len() % 2 == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "kernel length must be odd, got {}",
                weights.len()
            )));
        }
        Ok(Self { weights })
    }

    /// Creates a normalized Gaussian kernel.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of taps (made odd by adding one when even)
    /// * `sigma` - Standard deviation in samples
    pub fn gaussian(size: usize, sigma: f64) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let half = (size / 2) as i64;
        let denom = 2.0 * sigma * sigma;

        let mut weights: Vec<f64> = (-half..=half)
            .map(|x| (-((x * x) as f64) / denom).exp())
            .collect();
        let sum: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }

        Self { weights }
    }

    /// Kernel weights, centre at `radius()`.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of taps.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`; kernels have at least one tap.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Returns the kernel radius (half-size).
    #[inline]
    pub fn radius(&self) -> usize {
        self.weights.len() / 2
    }
}

/// Maps a possibly out-of-range index into `0..len` by reflect-101 mirroring.
#[inline]
pub fn reflect_101(mut i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        } else {
            i = 2 * len - 2 - i;
        }
    }
    i as usize
}

/// Convolves `src` with `kernel` horizontally, then vertically.
pub fn convolve(src: &Field, kernel: &Kernel) -> Field {
    trace!(width = src.width(), height = src.height(), taps = kernel.len(), "convolve");
    let temp = convolve_horizontal(src, kernel);
    convolve_vertical(&temp, kernel)
}

/// Blurs one `f32` plane, returning the `f64` result.
///
/// # Panics
///
/// Panics if `plane.len() != width * height`.
pub fn gaussian_blur(plane: &[f32], width: usize, height: usize, kernel: &Kernel) -> Field {
    convolve(&Field::from_plane(plane, width, height), kernel)
}

/// Per-tap source index for every output position along one axis.
fn taps(len: usize, kernel: &Kernel) -> Vec<Vec<usize>> {
    let r = kernel.radius() as isize;
    (0..len as isize)
        .map(|i| (-r..=r).map(|k| reflect_101(i + k, len)).collect())
        .collect()
}

fn convolve_horizontal(src: &Field, kernel: &Kernel) -> Field {
    let (width, height) = (src.width(), src.height());
    let columns = taps(width, kernel);
    let mut dst = Vec::with_capacity(width * height);

    for row in src.data().chunks_exact(width) {
        for idx in &columns {
            let sum: f64 = idx
                .iter()
                .zip(kernel.weights())
                .map(|(&sx, &w)| row[sx] * w)
                .sum();
            dst.push(sum);
        }
    }

    Field::new(width, height, dst)
}

fn convolve_vertical(src: &Field, kernel: &Kernel) -> Field {
    let (width, height) = (src.width(), src.height());
    let rows = taps(height, kernel);
    let data = src.data();
    let mut dst = vec![0.0f64; width * height];

    for (y, idx) in rows.iter().enumerate() {
        let out = &mut dst[y * width..(y + 1) * width];
        for (&sy, &w) in idx.iter().zip(kernel.weights()) {
            let row = &data[sy * width..(sy + 1) * width];
            for (o, &v) in out.iter_mut().zip(row) {
                *o += v * w;
            }
        }
    }

    Field::new(width, height, dst)
}
