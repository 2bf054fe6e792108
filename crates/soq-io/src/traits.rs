//! Reader trait implemented by every decoder.

use crate::IoResult;
use soq_core::PixelBuffer;
use std::path::Path;

/// Trait for image format readers.
///
/// Implementations decode into a [`PixelBuffer`] whose samples keep their
/// stored range (0..255 for 8-bit data, 0..65535 for 16-bit data) and whose
/// channel order reflects the decoded layout.
///
/// # Example
///
/// ```rust,ignore
/// use soq_io::{ImageReader, IoResult};
/// use soq_core::PixelBuffer;
///
/// struct MyFormatReader;
///
/// impl ImageReader for MyFormatReader {
///     fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
///         // Decode implementation
///     }
/// }
/// ```
pub trait ImageReader {
    /// Reads an image from a file path.
    ///
    /// The default implementation loads the whole file and calls
    /// [`read_from_memory`](Self::read_from_memory).
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PixelBuffer> {
        let data = std::fs::read(path.as_ref())?;
        self.read_from_memory(&data)
    }

    /// Reads an image from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer>;
}
