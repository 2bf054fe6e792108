//! # soq-ops
//!
//! Image normalization and full-reference quality metrics.
//!
//! # Modules
//!
//! - [`normalize`] - Bringing one image to another's channel order and size
//! - [`color`] - Channel-order conversion table (RGB, BGR, YUV, ...)
//! - [`resize`] - Separable Catmull-Rom resampling
//! - [`filter`] - Gaussian convolution with reflect-101 borders
//! - [`window`] - Windowed local mean, variance and covariance
//! - [`metrics`] - MSE, PSNR and SSIM per channel
//! - [`sink`] - Where per-channel results go
//!
//! # Example
//!
//! ```rust
//! use soq_core::PixelBuffer;
//! use soq_ops::{align, Metric, PrintSink};
//!
//! let reference = PixelBuffer::new(16, 16, 3).unwrap();
//! let mut subject = PixelBuffer::new(8, 8, 3).unwrap();
//! align(&mut subject, &reference).unwrap();
//!
//! let mut out = PrintSink::new("mse", Vec::new());
//! Metric::Mse.run(&subject, &reference, &mut out);
//! let text = String::from_utf8(out.finish().unwrap()).unwrap();
//! assert_eq!(text, "mse.R: 0.0000\nmse.G: 0.0000\nmse.B: 0.0000\n");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod color;
pub mod field;
pub mod filter;
pub mod metrics;
pub mod normalize;
pub mod resize;
pub mod sink;
pub mod window;

pub use error::{OpsError, OpsResult};
pub use metrics::Metric;
pub use normalize::{align, convert_channel_order, resize_to, Alignment};
pub use sink::{CollectSink, DiscardSink, PrintSink, PsnrSink, ResultSink};
pub use window::Window;
