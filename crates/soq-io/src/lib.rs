//! # soq-io
//!
//! Image decoding for soq.
//!
//! Turns PNG and JPEG files into [`PixelBuffer`]s with sample values promoted
//! to `f32` in their stored range (0..255 for 8-bit files, not rescaled) and a
//! channel order describing the decoded layout.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use soq_io::read;
//!
//! let image = read("reference.png")?;
//! println!("{}x{} {}", image.width(), image.height(), image.order());
//! ```
//!
//! # Feature Flags
//!
//! - `png` - PNG support via the `png` crate (default)
//! - `jpeg` - JPEG support via `jpeg-decoder` (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
mod traits;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use traits::ImageReader;

use soq_core::PixelBuffer;
use std::path::Path;
use tracing::debug;

/// Reads an image from a file, auto-detecting the format.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported (or its feature is disabled)
/// - The file is corrupted
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let format = Format::detect(path)?;

    let image = match format {
        #[cfg(feature = "png")]
        Format::Png => png::read(path)?,

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path)?,

        #[allow(unreachable_patterns)]
        _ => return Err(unsupported(path)),
    };

    debug!(
        path = %path.display(),
        ?format,
        width = image.width(),
        height = image.height(),
        order = %image.order(),
        "decoded image"
    );
    Ok(image)
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.xyz");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = read(&path).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat(ref ext) if ext == "xyz"));
    }

    #[test]
    fn test_missing_file() {
        let err = read("/no/such/dir/image.png").unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_read_dispatches_png() {
        let dir = tempfile::tempdir().unwrap();
        // extension lies; magic bytes decide
        let path = dir.path().join("actually_png.jpg");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut encoder = ::png::Encoder::new(std::io::BufWriter::new(file), 1, 1);
            encoder.set_color(::png::ColorType::Rgb);
            encoder.set_depth(::png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[7, 8, 9]).unwrap();
        }

        let image = read(&path).unwrap();
        assert_eq!(image.plane(2), &[9.0]);
    }
}
