//! Gaussian-windowed local statistics.
//!
//! The statistical primitives SSIM is built from:
//!
//! - local mean: `mu = G * x`
//! - local variance: `G * x^2 - mu^2`
//! - local covariance: `G * (x y) - mu_x mu_y`
//!
//! where `G *` is convolution with the window's separable Gaussian. The SSIM
//! window is fixed at 11 taps with sigma 1.5. Borders follow the reflect-101
//! policy of [`crate::filter`].
//!
//! ```rust
//! use soq_ops::field::Field;
//! use soq_ops::window::Window;
//!
//! let x = Field::filled(8, 8, 42.0);
//! let w = Window::ssim();
//! assert!((w.local_mean(&x).at(0, 0) - 42.0).abs() < 1e-9);
//! assert!(w.local_variance(&x).at(3, 3).abs() < 1e-6);
//! ```

use crate::field::Field;
use crate::filter::{convolve, Kernel};

/// Local statistics for a pair of channels.
#[derive(Debug, Clone)]
pub struct Moments {
    /// Local mean of the first channel.
    pub mu1: Field,
    /// Local mean of the second channel.
    pub mu2: Field,
    /// Local variance of the first channel.
    pub sigma1_sq: Field,
    /// Local variance of the second channel.
    pub sigma2_sq: Field,
    /// Local covariance of the two channels.
    pub sigma12: Field,
}

/// A weighting window for local statistics.
#[derive(Debug, Clone)]
pub struct Window {
    kernel: Kernel,
}

impl Window {
    /// Taps of the SSIM window along each axis.
    pub const SSIM_SIZE: usize = 11;
    /// Standard deviation of the SSIM window.
    pub const SSIM_SIGMA: f64 = 1.5;

    /// The canonical 11x11, sigma 1.5 Gaussian window.
    pub fn ssim() -> Self {
        Self::with_kernel(Kernel::gaussian(Self::SSIM_SIZE, Self::SSIM_SIGMA))
    }

    /// A window over an arbitrary separable kernel.
    pub fn with_kernel(kernel: Kernel) -> Self {
        Self { kernel }
    }

    /// Weighted average of each neighbourhood.
    pub fn local_mean(&self, x: &Field) -> Field {
        convolve(x, &self.kernel)
    }

    /// `local_mean(x^2) - local_mean(x)^2`.
    pub fn local_variance(&self, x: &Field) -> Field {
        let mu = self.local_mean(x);
        self.variance_about(x, &mu)
    }

    /// `local_mean(a*b) - local_mean(a) * local_mean(b)`.
    pub fn local_covariance(&self, a: &Field, b: &Field) -> Field {
        let mu_a = self.local_mean(a);
        let mu_b = self.local_mean(b);
        self.covariance_about(a, b, &mu_a, &mu_b)
    }

    /// All five fields for a pair, computing each mean once.
    pub fn moments(&self, a: &Field, b: &Field) -> Moments {
        let mu1 = self.local_mean(a);
        let mu2 = self.local_mean(b);
        let sigma1_sq = self.variance_about(a, &mu1);
        let sigma2_sq = self.variance_about(b, &mu2);
        let sigma12 = self.covariance_about(a, b, &mu1, &mu2);
        Moments {
            mu1,
            mu2,
            sigma1_sq,
            sigma2_sq,
            sigma12,
        }
    }

    fn variance_about(&self, x: &Field, mu: &Field) -> Field {
        self.local_mean(&x.map(|v| v * v))
            .zip_map(mu, |sq, m| sq - m * m)
    }

    fn covariance_about(&self, a: &Field, b: &Field, mu_a: &Field, mu_b: &Field) -> Field {
        let mu_ab = mu_a.zip_map(mu_b, |x, y| x * y);
        self.local_mean(&a.zip_map(b, |x, y| x * y))
            .zip_map(&mu_ab, |p, m| p - m)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::ssim()
    }
}
