//! Core types for panorama decoding.

use thiserror::Error;

/// Error types for panorama decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// An equirectangular panorama with RGB pixel data.
///
/// Columns map linearly to longitude in `[-pi, pi)`, rows to latitude from
/// `+pi/2` (top) to `-pi/2` (bottom).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanoramaRaster {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl PanoramaRaster {
    /// Create a new raster with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build a raster by evaluating `pixel(row, col)` for every position.
    pub fn from_fn(width: u32, height: u32, mut pixel: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for row in 0..height {
            for col in 0..width {
                pixels.extend_from_slice(&pixel(row, col));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Create a raster from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// RGB triple at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the raster.
    #[inline]
    pub fn pixel(&self, row: u32, col: u32) -> [u8; 3] {
        let idx = (row as usize * self.width as usize + col as usize) * 3;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Bytes in one row of pixels.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * 3
    }
}
