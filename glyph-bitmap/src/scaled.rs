//! Resampling view over another bitmap.
//!
//! [`ScaledBitmap`] presents any [`Bitmap`] at a different size. Each output
//! pixel maps back to a fractional position in the source image and is
//! interpolated bilinearly from the four surrounding source pixels. All
//! arithmetic is 16.16 fixed point.
//!
//! Pixels equal to the configured transparent color are never blended: when
//! either neighbour is transparent the nearer one is taken as is, so
//! transparent regions keep crisp edges.
//!
//! # Row Cache
//!
//! Interpolation needs two adjacent source rows. They are kept in a two-row
//! cache; moving down by one row swaps the cache and decodes a single new row,
//! which keeps top-to-bottom rendering a single forward pass over the source.

use crate::{Bitmap, DecodeError};
use glyph_pixelbuffer::PixelFormat;

const FP_SHIFT: u32 = 16;
const FP_ONE: u64 = 1 << FP_SHIFT;
const FP_HALF: u64 = FP_ONE / 2;
const FP_MASK: u64 = FP_ONE - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sample {
    rgb: [u8; 3],
    transparent: bool,
}

impl Sample {
    /// Blends towards `other` by `frac` (16.16).
    fn blend(self, other: Sample, frac: u64) -> Sample {
        if self.transparent || other.transparent {
            return if frac < FP_HALF { self } else { other };
        }

        let mut rgb = [0u8; 3];
        for (out, (&a, &b)) in rgb.iter_mut().zip(self.rgb.iter().zip(other.rgb.iter())) {
            *out = ((u64::from(a) * (FP_ONE - frac) + u64::from(b) * frac) >> FP_SHIFT) as u8;
        }
        Sample {
            rgb,
            transparent: false,
        }
    }
}

/// A [`Bitmap`] that resamples an inner bitmap to a new size.
#[derive(Debug)]
pub struct ScaledBitmap<B> {
    inner: B,
    width: u32,
    height: u32,
    /// Source pixels per output pixel, 16.16
    x_scale: u64,
    y_scale: u64,
    transparent: Option<u32>,
    rows: [Vec<u8>; 2],
    /// Source row held in `rows[0]`; `rows[1]` holds the row below it
    cached_row: Option<u32>,
}

impl<B: Bitmap> ScaledBitmap<B> {
    /// Wraps `inner` so that it reads as a `width` x `height` image.
    ///
    /// `transparent` is the pixel value (in the inner bitmap's format) that
    /// must not be blended with its neighbours.
    pub fn new(
        inner: B,
        width: u32,
        height: u32,
        transparent: Option<u32>,
    ) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 || inner.width() == 0 || inner.height() == 0 {
            return Err(DecodeError::InvalidScale {
                from_width: inner.width(),
                from_height: inner.height(),
                to_width: width,
                to_height: height,
            });
        }

        let x_scale = (u64::from(inner.width()) << FP_SHIFT) / u64::from(width);
        let y_scale = (u64::from(inner.height()) << FP_SHIFT) / u64::from(height);
        let stride = inner.stride();

        Ok(Self {
            inner,
            width,
            height,
            x_scale,
            y_scale,
            transparent,
            rows: [vec![0u8; stride], vec![0u8; stride]],
            cached_row: None,
        })
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    /// Loads source rows `row` and `row + 1` (clamped to the last row).
    fn cache_rows(&mut self, row: u32) -> Result<(), DecodeError> {
        let last = self.inner.height() - 1;
        let width = self.inner.width();

        match self.cached_row {
            Some(cached) if cached == row => return Ok(()),
            Some(cached) if cached + 1 == row => {
                self.rows.swap(0, 1);
                self.cached_row = None;
                self.inner
                    .get_run(0, (row + 1).min(last), width, &mut self.rows[1])?;
            }
            _ => {
                self.cached_row = None;
                self.inner.get_run(0, row.min(last), width, &mut self.rows[0])?;
                self.inner
                    .get_run(0, (row + 1).min(last), width, &mut self.rows[1])?;
            }
        }

        self.cached_row = Some(row);
        Ok(())
    }

    fn sample(&self, format: PixelFormat, bytes: &[u8]) -> Sample {
        let value = format.read_pixel(bytes);
        Sample {
            rgb: format.to_rgb888(value),
            transparent: self.transparent == Some(value),
        }
    }

    /// Interpolates along one cached row at fractional source column `column`.
    fn row_sample(&self, format: PixelFormat, which: usize, column: u64) -> Sample {
        let bpp = format.bytes_per_pixel();
        let last = self.inner.width() as usize - 1;
        let col1 = ((column >> FP_SHIFT) as usize).min(last);
        let col2 = (col1 + 1).min(last);

        let row = &self.rows[which];
        let left = self.sample(format, &row[col1 * bpp..]);
        let right = self.sample(format, &row[col2 * bpp..]);
        left.blend(right, column & FP_MASK)
    }
}

impl<B: Bitmap> Bitmap for ScaledBitmap<B> {
    fn pixel_format(&self) -> PixelFormat {
        self.inner.pixel_format()
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_selected(&mut self, selected: bool) {
        self.inner.set_selected(selected);
        // Cached rows were decoded with the old palette
        self.cached_row = None;
    }

    fn get_run(&mut self, x: u32, y: u32, width: u32, out: &mut [u8]) -> Result<(), DecodeError> {
        if y >= self.height || u64::from(x) + u64::from(width) > u64::from(self.width) {
            return Err(DecodeError::OutOfBounds {
                x,
                y,
                width,
                bitmap_width: self.width,
                bitmap_height: self.height,
            });
        }

        let format = self.inner.pixel_format();
        let bpp = format.bytes_per_pixel();
        let needed = width as usize * bpp;
        if out.len() < needed {
            return Err(DecodeError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }

        let row16 = u64::from(y) * self.y_scale;
        self.cache_rows((row16 >> FP_SHIFT) as u32)?;
        let y_frac = row16 & FP_MASK;

        for (i, pixel) in out[..needed].chunks_exact_mut(bpp).enumerate() {
            let column = (u64::from(x) + i as u64) * self.x_scale;
            let top = self.row_sample(format, 0, column);
            let bottom = self.row_sample(format, 1, column);
            let sample = top.blend(bottom, y_frac);

            let value = match self.transparent {
                Some(transparent) if sample.transparent => transparent,
                _ => format.from_rgb888(sample.rgb),
            };
            format.write_pixel(value, pixel);
        }

        Ok(())
    }
}
