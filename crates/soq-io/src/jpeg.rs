//! JPEG format support.
//!
//! Decodes baseline and progressive JPEG files through `jpeg-decoder`.
//! Colour images come out as `RGB`, greyscale ones as `Y`. CMYK data is
//! converted to `RGB` with the usual `(1 - c) * (1 - k)` approximation.

use crate::{ImageReader, IoError, IoResult};
use soq_core::{ChannelOrder, PixelBuffer};
use std::io::{BufReader, Read};
use tracing::trace;

/// JPEG file reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegReader;

impl JpegReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }

    fn decode<R: Read>(&self, source: R) -> IoResult<PixelBuffer> {
        let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(source));
        let pixels = decoder
            .decode()
            .map_err(|e| IoError::DecodeError(e.to_string()))?;
        let info = decoder
            .info()
            .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

        let (order, samples): (ChannelOrder, Vec<f32>) = match info.pixel_format {
            jpeg_decoder::PixelFormat::RGB24 => {
                (ChannelOrder::RGB, pixels.iter().map(|&v| v as f32).collect())
            }
            jpeg_decoder::PixelFormat::L8 => {
                (ChannelOrder::Y, pixels.iter().map(|&v| v as f32).collect())
            }
            jpeg_decoder::PixelFormat::L16 => (
                ChannelOrder::Y,
                pixels
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) as f32)
                    .collect(),
            ),
            jpeg_decoder::PixelFormat::CMYK32 => (
                ChannelOrder::RGB,
                pixels.chunks_exact(4).flat_map(cmyk_to_rgb).collect(),
            ),
        };

        trace!(width = info.width, height = info.height, %order, "jpeg decoded");
        Ok(PixelBuffer::from_interleaved(
            info.width as u32,
            info.height as u32,
            order,
            &samples,
        )?)
    }
}

impl ImageReader for JpegReader {
    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        self.decode(data)
    }
}

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<std::path::Path>>(path: P) -> IoResult<PixelBuffer> {
    JpegReader::new().read(path)
}

fn cmyk_to_rgb(cmyk: &[u8]) -> [f32; 3] {
    let c = cmyk[0] as f32 / 255.0;
    let m = cmyk[1] as f32 / 255.0;
    let y = cmyk[2] as f32 / 255.0;
    let k = cmyk[3] as f32 / 255.0;
    [
        (1.0 - c) * (1.0 - k) * 255.0,
        (1.0 - m) * (1.0 - k) * 255.0,
        (1.0 - y) * (1.0 - k) * 255.0,
    ]
}
