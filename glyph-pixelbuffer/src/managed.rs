//! Managed pixel buffer implementation.
//!
//! [`ManagedPixelBuffer`] owns a block of packed pixels in a `Vec<u8>`. Renderers
//! fill it one decoded row at a time with [`ManagedPixelBuffer::image_rect`].
//!
//! # Example
//!
//! ```
//! use glyph_common::Rect;
//! use glyph_pixelbuffer::{ManagedPixelBuffer, PixelFormat};
//!
//! let mut buffer = ManagedPixelBuffer::new(100, 100, PixelFormat::rgb32());
//! buffer.fill_rect(Rect::new(10, 10, 50, 50), 0x00FF_0000).unwrap();
//! assert_eq!(buffer.pixel(10, 10), Some(0x00FF_0000));
//! assert_eq!(buffer.dimensions(), (100, 100));
//! ```

use crate::PixelFormat;
use anyhow::{anyhow, Result};
use glyph_common::Rect;

/// A pixel buffer that manages its own memory.
///
/// # Memory Layout
///
/// Rows are stored top to bottom with no padding. The stride is measured in
/// **pixels** and always equals the width:
///
/// ```text
/// Total size = W * H * B bytes
/// Pixel at (x, y) starts at offset: (y * W + x) * B
/// ```
#[derive(Debug, Clone)]
pub struct ManagedPixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    /// Raw pixel data (row-major, no padding)
    data: Vec<u8>,
    /// Stride in **pixels**
    stride: usize,
}

impl ManagedPixelBuffer {
    /// Creates a zero-filled pixel buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = width as usize;
        let data = vec![0u8; stride * height as usize * format.bytes_per_pixel()];

        Self {
            width,
            height,
            format,
            data,
            stride,
        }
    }

    /// Returns `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the stride in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Returns the raw packed pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the packed bytes of row `y`, or `None` past the bottom edge.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let row_bytes = self.stride * self.format.bytes_per_pixel();
        let start = y as usize * row_bytes;
        Some(&self.data[start..start + row_bytes])
    }

    /// Returns the pixel value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        self.row(y)
            .map(|row| self.format.read_pixel(&row[x as usize * bpp..]))
    }

    fn validate_rect(&self, rect: Rect) -> Result<()> {
        if rect.x < 0
            || rect.y < 0
            || rect.x as u64 + rect.width as u64 > self.width as u64
            || rect.y as u64 + rect.height as u64 > self.height as u64
        {
            return Err(anyhow!(
                "Rectangle out of bounds: {:?} (buffer size: {}x{})",
                rect,
                self.width,
                self.height
            ));
        }
        Ok(())
    }

    /// Fills a rectangle with a single pixel value.
    pub fn fill_rect(&mut self, rect: Rect, pixel: u32) -> Result<()> {
        self.validate_rect(rect)?;

        let bytes_per_pixel = self.format.bytes_per_pixel();
        let mut packed = [0u8; 4];
        self.format.write_pixel(pixel, &mut packed);
        let packed = &packed[..bytes_per_pixel];

        for y in 0..rect.height as usize {
            let row_offset =
                ((rect.y as usize + y) * self.stride + rect.x as usize) * bytes_per_pixel;
            let row = &mut self.data[row_offset..row_offset + rect.width as usize * bytes_per_pixel];
            for chunk in row.chunks_exact_mut(bytes_per_pixel) {
                chunk.copy_from_slice(packed);
            }
        }

        Ok(())
    }

    /// Copies packed image data into `dest`.
    ///
    /// `stride` is the source stride in **pixels**; 0 means tightly packed.
    pub fn image_rect(&mut self, dest: Rect, pixels: &[u8], stride: usize) -> Result<()> {
        self.validate_rect(dest)?;
        if dest.is_empty() {
            return Ok(());
        }

        let bytes_per_pixel = self.format.bytes_per_pixel();
        let rect_width_bytes = dest.width as usize * bytes_per_pixel;

        let src_stride = if stride == 0 {
            dest.width as usize
        } else {
            stride
        };
        let src_stride_bytes = src_stride * bytes_per_pixel;

        let required_src_bytes = src_stride_bytes * (dest.height as usize - 1) + rect_width_bytes;
        if pixels.len() < required_src_bytes {
            return Err(anyhow!(
                "Insufficient source data: got {} bytes, need at least {}",
                pixels.len(),
                required_src_bytes
            ));
        }

        for y in 0..dest.height as usize {
            let dst_offset =
                ((dest.y as usize + y) * self.stride + dest.x as usize) * bytes_per_pixel;
            let src_offset = y * src_stride_bytes;

            self.data[dst_offset..dst_offset + rect_width_bytes]
                .copy_from_slice(&pixels[src_offset..src_offset + rect_width_bytes]);
        }

        Ok(())
    }

    /// Expands the buffer to tightly packed RGBA8888 with opaque alpha.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for chunk in self.data.chunks_exact(bytes_per_pixel) {
            let [r, g, b] = self.format.to_rgb888(self.format.read_pixel(chunk));
            rgba.extend_from_slice(&[r, g, b, 0xFF]);
        }
        rgba
    }
}
