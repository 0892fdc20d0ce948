//! PNG decoding and deterministic PNG encoding.
//!
//! Sprites arrive from the backend as opaque PNG bytes in whatever colour
//! type the asset package used; decoding always normalises to 8-bit RGBA.
//! Encoding uses fixed settings so identical frames hash identically.

use std::io::{Cursor, Write};
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Decoder, Encoder, FilterType, Transformations};
use thiserror::Error;

use crate::image::RgbaImage;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("PNG decoding error: {0}")]
    Decoding(#[from] png::DecodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Create config optimized for file size (slower, but deterministic).
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Create config optimized for speed (faster, but larger files).
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Decode PNG bytes into an RGBA image.
///
/// Palette, grayscale and 16-bit images are expanded to 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, PngError> {
    let mut decoder = Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let pixel_count = info.width as usize * info.height as usize;
    let rgba = match info.color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => expand(&buf, pixel_count, 3, |p| [p[0], p[1], p[2], 255]),
        ColorType::GrayscaleAlpha => expand(&buf, pixel_count, 2, |p| [p[0], p[0], p[0], p[1]]),
        ColorType::Grayscale => expand(&buf, pixel_count, 1, |p| [p[0], p[0], p[0], 255]),
        ColorType::Indexed => {
            return Err(PngError::InvalidDimensions(
                "palette was not expanded".into(),
            ))
        }
    };

    RgbaImage::from_raw(info.width, info.height, rgba)
        .map_err(|e| PngError::InvalidDimensions(e.to_string()))
}

/// Widen tightly packed pixels of `channels` bytes each into RGBA.
fn expand(buf: &[u8], pixel_count: usize, channels: usize, f: impl Fn(&[u8]) -> [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixel_count * 4);
    for pixel in buf.chunks_exact(channels).take(pixel_count) {
        out.extend_from_slice(&f(pixel));
    }
    out
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<RgbaImage, PngError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

/// Write an RGBA image to a PNG file.
pub fn write_rgba(image: &RgbaImage, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_rgba_to_writer(image, writer, config)
}

/// Write an RGBA image to any writer.
pub fn write_rgba_to_writer<W: Write>(
    image: &RgbaImage,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    if image.width == 0 || image.height == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "cannot encode a {}x{} image",
            image.width, image.height
        )));
    }

    let mut encoder = Encoder::new(writer, image.width, image.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // The png crate writes no timestamps, so output depends only on pixels
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.as_raw())?;

    Ok(())
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode to a Vec<u8> and return the hash.
pub fn write_rgba_to_vec_with_hash(
    image: &RgbaImage,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_rgba_to_writer(image, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RgbaImage {
        let mut image = RgbaImage::new(16, 8);
        for y in 0..8 {
            for x in 0..16 {
                image.set(x, y, [x as u8 * 16, y as u8 * 32, 128, 255 - x as u8]);
            }
        }
        image
    }

    #[test]
    fn test_rgba_deterministic() {
        let image = gradient();
        let config = PngConfig::default();

        let (data1, hash1) = write_rgba_to_vec_with_hash(&image, &config).unwrap();
        let (data2, hash2) = write_rgba_to_vec_with_hash(&image, &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
    }

    #[test]
    fn test_decode_restores_pixels() {
        let image = gradient();
        let (data, _) = write_rgba_to_vec_with_hash(&image, &PngConfig::fast()).unwrap();
        assert_eq!(decode_png(&data).unwrap(), image);
    }

    #[test]
    fn test_decode_rgb_adds_opaque_alpha() {
        let mut data = Vec::new();
        {
            let mut encoder = Encoder::new(&mut data, 2, 1);
            encoder.set_color(ColorType::Rgb);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[10, 20, 30, 40, 50, 60]).unwrap();
        }
        let image = decode_png(&data).unwrap();
        assert_eq!(image.get(0, 0), [10, 20, 30, 255]);
        assert_eq!(image.get(1, 0), [40, 50, 60, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_png(b"definitely not a png").is_err());
    }

    #[test]
    fn test_encode_rejects_empty_image() {
        let result = write_rgba_to_vec_with_hash(&RgbaImage::new(0, 0), &PngConfig::default());
        assert!(matches!(result, Err(PngError::InvalidDimensions(_))));
    }
}
