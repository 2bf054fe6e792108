//! PNG format support.
//!
//! Decodes 8-bit and 16-bit PNG files. Palette images and sub-byte grey
//! depths are expanded to 8 bits per sample. Alpha, stored or from a `tRNS`
//! chunk, is dropped: an image is compared by its colour channels only.
//!
//! | colour type           | order |
//! |-----------------------|-------|
//! | Grayscale / GrayAlpha | `Y`   |
//! | Rgb / Indexed / Rgba  | `RGB` |
//!
//! # Example
//!
//! ```rust,ignore
//! use soq_io::png;
//!
//! let image = png::read("input.png")?;
//! ```

use crate::{ImageReader, IoError, IoResult};
use soq_core::{ChannelOrder, PixelBuffer};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;
use tracing::trace;

/// PNG file reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngReader;

impl PngReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }

    fn decode<R: BufRead + Seek>(&self, source: R) -> IoResult<PixelBuffer> {
        let mut decoder = png::Decoder::new(source);
        decoder.set_transformations(png::Transformations::EXPAND);
        let mut reader = decoder
            .read_info()
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

        let buf_size = reader
            .output_buffer_size()
            .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
        let mut buf = vec![0u8; buf_size];
        let info = reader
            .next_frame(&mut buf)
            .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
        let bytes = &buf[..info.buffer_size()];

        // (order, stored samples per pixel)
        let (order, stride) = match info.color_type {
            png::ColorType::Grayscale => (ChannelOrder::Y, 1),
            png::ColorType::GrayscaleAlpha => (ChannelOrder::Y, 2),
            png::ColorType::Rgb => (ChannelOrder::RGB, 3),
            png::ColorType::Rgba => (ChannelOrder::RGB, 4),
            other => {
                return Err(IoError::UnsupportedBitDepth(format!(
                    "{:?} {:?}",
                    other, info.bit_depth
                )));
            }
        };

        let samples: Vec<f32> = match info.bit_depth {
            png::BitDepth::Eight => bytes.iter().map(|&v| v as f32).collect(),
            png::BitDepth::Sixteen => bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) as f32)
                .collect(),
            depth => {
                return Err(IoError::UnsupportedBitDepth(format!(
                    "{:?} {:?}",
                    info.color_type, depth
                )));
            }
        };

        let samples = drop_alpha(samples, stride, order.len());

        trace!(width = info.width, height = info.height, %order, depth = ?info.bit_depth, "png decoded");
        Ok(PixelBuffer::from_interleaved(info.width, info.height, order, &samples)?)
    }
}

impl ImageReader for PngReader {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PixelBuffer> {
        let file = File::open(path.as_ref())?;
        self.decode(BufReader::new(file))
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PixelBuffer> {
        self.decode(Cursor::new(data))
    }
}

/// Keeps the first `keep` of every `stride` interleaved samples.
fn drop_alpha(samples: Vec<f32>, stride: usize, keep: usize) -> Vec<f32> {
    if stride == keep {
        return samples;
    }
    samples
        .chunks_exact(stride)
        .flat_map(|pixel| &pixel[..keep])
        .copied()
        .collect()
}

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    PngReader::new().read(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufWriter;

    fn write_png(
        path: &Path,
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        data: &[u8],
    ) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }

    #[test]
    fn test_read_rgb_keeps_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        let data = [
            0, 128, 255, //
            10, 20, 30,
        ];
        write_png(&path, 2, 1, png::ColorType::Rgb, png::BitDepth::Eight, &data);

        let image = read(&path).unwrap();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.order(), ChannelOrder::RGB);
        assert_eq!(image.plane(0), &[0.0, 10.0]);
        assert_eq!(image.plane(1), &[128.0, 20.0]);
        assert_eq!(image.plane(2), &[255.0, 30.0]);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let dir = tempfile::tempdir().unwrap();

        let rgba = dir.path().join("rgba.png");
        write_png(
            &rgba,
            2,
            1,
            png::ColorType::Rgba,
            png::BitDepth::Eight,
            &[1, 2, 3, 255, 4, 5, 6, 0],
        );
        let image = read(&rgba).unwrap();
        assert_eq!(image.order(), ChannelOrder::RGB);
        assert_eq!(image.channels(), 3);
        assert_eq!(image.plane(0), &[1.0, 4.0]);
        assert_eq!(image.plane(2), &[3.0, 6.0]);

        let rgba16 = dir.path().join("rgba16.png");
        write_png(
            &rgba16,
            1,
            1,
            png::ColorType::Rgba,
            png::BitDepth::Sixteen,
            &[0, 1, 0, 2, 0, 3, 0xFF, 0xFF],
        );
        let image = read(&rgba16).unwrap();
        assert_eq!(image.order(), ChannelOrder::RGB);
        assert_eq!(image.plane(2), &[3.0]);
    }

    #[test]
    fn test_read_gray() {
        let dir = tempfile::tempdir().unwrap();

        let gray = dir.path().join("gray.png");
        write_png(&gray, 2, 2, png::ColorType::Grayscale, png::BitDepth::Eight, &[9, 8, 7, 6]);
        let image = read(&gray).unwrap();
        assert_eq!(image.order(), ChannelOrder::Y);
        assert_eq!(image.channels(), 1);
        assert_eq!(image.plane(0), &[9.0, 8.0, 7.0, 6.0]);

        let gray_alpha = dir.path().join("ya.png");
        write_png(&gray_alpha, 1, 1, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, &[50, 60]);
        let image = read(&gray_alpha).unwrap();
        assert_eq!(image.order(), ChannelOrder::Y);
        assert_eq!(image.plane(0), &[50.0]);
    }

    #[test]
    fn test_read_sixteen_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.png");
        // one grey pixel, big-endian 0x1234
        write_png(&path, 1, 1, png::ColorType::Grayscale, png::BitDepth::Sixteen, &[0x12, 0x34]);

        let image = read(&path).unwrap();
        assert_eq!(image.plane(0), &[0x1234 as f32]);
    }

    #[test]
    fn test_read_from_memory_matches_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mem.png");
        write_png(&path, 2, 1, png::ColorType::Rgb, png::BitDepth::Eight, &[1, 2, 3, 4, 5, 6]);

        let bytes = std::fs::read(&path).unwrap();
        let from_memory = PngReader::new().read_from_memory(&bytes).unwrap();
        let from_file = read(&path).unwrap();
        assert_eq!(from_memory, from_file);
    }

    #[test]
    fn test_corrupt_data() {
        let err = PngReader::new()
            .read_from_memory(&[0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0])
            .unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }
}
