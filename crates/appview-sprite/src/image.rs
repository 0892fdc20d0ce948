//! RGBA pixel buffers and the drawing surface capability.

use thiserror::Error;

use crate::png::{self, PngConfig, PngError};

/// Errors from pixel buffer operations.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("pixel buffer for {width}x{height} needs {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// An 8-bit RGBA image, row-major, non-premultiplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    data: Vec<u8>,
}

impl RgbaImage {
    /// Create a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Create an image filled with one pixel value.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let size = width as usize * height as usize;
        let mut data = Vec::with_capacity(size * 4);
        for _ in 0..size {
            data.extend_from_slice(&pixel);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap existing RGBA bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Raw RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume into raw RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns true for a 0x0 (or degenerate) image.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get a pixel. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Set a pixel. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&pixel);
    }

    /// Integer nearest-neighbour upscale.
    pub fn scale_nearest(&self, factor: u32) -> RgbaImage {
        let factor = factor.max(1);
        if factor == 1 {
            return self.clone();
        }
        let mut out = RgbaImage::new(self.width * factor, self.height * factor);
        for y in 0..out.height {
            for x in 0..out.width {
                out.set(x, y, self.get(x / factor, y / factor));
            }
        }
        out
    }
}

/// Source-over compositing of one non-premultiplied pixel onto another.
///
/// An opaque source replaces the destination and a transparent source leaves
/// it alone; partial alpha blends.
pub fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = dst[3] as u32;
    // out_alpha scaled by 255
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| {
        let num = s as u32 * sa * 255 + d as u32 * da * (255 - sa);
        ((num + out_a / 2) / out_a) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        ((out_a + 127) / 255) as u8,
    ]
}

/// A drawable pixel surface.
///
/// Composition code only talks to this trait, so any graphics backend that
/// can draw an image at an offset, expose its RGBA pixels and encode itself
/// can stand in for [`RgbaImage`].
pub trait ImageSurface {
    /// Surface size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Draw `image` with its top-left corner at `(x, y)`, clipped to the
    /// surface, using source-over compositing.
    fn draw(&mut self, image: &RgbaImage, x: i32, y: i32);

    /// Current RGBA pixels, row-major.
    fn pixels(&self) -> &[u8];

    /// Replace all pixels.
    fn put_pixels(&mut self, pixels: &[u8]) -> Result<(), ImageError>;

    /// Encode the surface as PNG.
    fn encode_png(&self) -> Result<Vec<u8>, PngError>;
}

impl ImageSurface for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw(&mut self, image: &RgbaImage, x: i32, y: i32) {
        for sy in 0..image.height {
            let dy = y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..image.width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let (dx, dy) = (dx as u32, dy as u32);
                let blended = blend_over(self.get(dx, dy), image.get(sx, sy));
                self.set(dx, dy, blended);
            }
        }
    }

    fn pixels(&self) -> &[u8] {
        &self.data
    }

    fn put_pixels(&mut self, pixels: &[u8]) -> Result<(), ImageError> {
        if pixels.len() != self.data.len() {
            return Err(ImageError::BufferSize {
                width: self.width,
                height: self.height,
                expected: self.data.len(),
                actual: pixels.len(),
            });
        }
        self.data.copy_from_slice(pixels);
        Ok(())
    }

    fn encode_png(&self) -> Result<Vec<u8>, PngError> {
        let mut out = Vec::new();
        png::write_rgba_to_writer(self, &mut out, &PngConfig::default())?;
        Ok(out)
    }
}
