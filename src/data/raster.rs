use std::fmt;
use std::path::Path;

use image::ImageReader;
use tracing::debug;

use crate::error::ResourceError;

/// Read-only grid of 8-bit samples, one per raster pixel.
pub trait IntensityGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Sample at (x, y), or `None` when the pixel is off the canvas.
    /// Callers wrap x themselves; y is never wrapped.
    fn sample(&self, x: i32, y: i32) -> Option<u8>;
}

/// Owned single-channel raster, row-major
#[derive(Clone)]
pub struct GrayRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayRaster {
    /// Wrap a row-major buffer of `width * height` samples
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ResourceError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ResourceError::BufferSize {
                width,
                height,
                len: pixels.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Raster of a single shade
    pub fn filled(width: u32, height: u32, shade: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![shade; width as usize * height as usize],
        }
    }

    /// Decode an image file, converting to 8-bit luma if needed
    pub fn open(path: &Path) -> Result<Self, ResourceError> {
        let reader = ImageReader::open(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = reader.with_guessed_format().map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = reader.decode().map_err(|source| ResourceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let luma = image.into_luma8();
        let (width, height) = luma.dimensions();
        debug!(path = %path.display(), width, height, "decoded country raster");

        Self::from_raw(width, height, luma.into_raw())
    }

    /// Set a pixel, ignoring coordinates off the canvas
    pub fn set(&mut self, x: i32, y: i32, shade: u8) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = shade;
        }
    }

    /// Paint the inclusive rectangle [x0, x1] x [y0, y1], clipped to the canvas
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, shade: u8) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, shade);
            }
        }
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl fmt::Debug for GrayRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrayRaster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl IntensityGrid for GrayRaster {
    #[inline(always)]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn sample(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }
}
