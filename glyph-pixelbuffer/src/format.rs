//! Output pixel formats for decoded glyphs.
//!
//! This module defines [`ColorFormat`] and [`PixelFormat`], which describe how a
//! palette value is packed into the bytes handed to a renderer.
//!
//! # Supported Depths
//!
//! Only byte-aligned depths are supported:
//!
//! | Format               | bits_per_pixel | Pixel value layout       |
//! |----------------------|----------------|--------------------------|
//! | [`ColorFormat::Rgb332`] | 8           | `RRRGGGBB`               |
//! | [`ColorFormat::Grey8`]  | 8           | luminance 0-255          |
//! | [`ColorFormat::Rgb565`] | 16          | `RRRRRGGGGGGBBBBB`       |
//! | [`ColorFormat::Rgb24`]  | 24          | `0xRRGGBB`               |
//! | [`ColorFormat::Rgb32`]  | 32          | `0x00RRGGBB`             |
//!
//! Any other depth is rejected by [`PixelFormat::new`] rather than guessed at.
//!
//! # Byte Order
//!
//! Pixel values are always written little-endian, so a 24bpp value `0xAABBCC`
//! is stored as `[0xCC, 0xBB, 0xAA]`.
//!
//! # Example
//!
//! ```
//! use glyph_pixelbuffer::{ColorFormat, PixelFormat};
//!
//! let pf = PixelFormat::new(16, ColorFormat::Rgb565).unwrap();
//! assert_eq!(pf.bytes_per_pixel(), 2);
//!
//! let mut out = [0u8; 2];
//! pf.write_pixel(0xF800, &mut out);
//! assert_eq!(out, [0x00, 0xF8]);
//! assert_eq!(pf.to_rgb888(0xF800), [0xFF, 0x00, 0x00]);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a pixel format cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Depth is not one of 8, 16, 24 or 32 bits.
    #[error("unsupported pixel depth: {0} bits per pixel")]
    UnsupportedDepth(u8),

    /// Depth and color format disagree (e.g. 16bpp with RGB24).
    #[error("{bits_per_pixel} bits per pixel does not match color format {color_format:?}")]
    DepthMismatch {
        bits_per_pixel: u8,
        color_format: ColorFormat,
    },
}

/// Color format tag carried by every bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// 8-bit RGB 3-3-2.
    Rgb332,
    /// 8-bit greyscale.
    Grey8,
    /// 16-bit RGB 5-6-5.
    Rgb565,
    /// 24-bit RGB 8-8-8.
    Rgb24,
    /// 32-bit RGB 8-8-8 with an unused top byte.
    Rgb32,
}

impl ColorFormat {
    /// The only depth this format can be stored at.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Rgb332 | Self::Grey8 => 8,
            Self::Rgb565 => 16,
            Self::Rgb24 => 24,
            Self::Rgb32 => 32,
        }
    }
}

/// A validated output pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    bits_per_pixel: u8,
    color_format: ColorFormat,
}

impl PixelFormat {
    /// Creates a pixel format, failing closed on anything but the four
    /// byte-aligned depths or on a depth that does not match `color_format`.
    pub fn new(bits_per_pixel: u8, color_format: ColorFormat) -> Result<Self, FormatError> {
        if !matches!(bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(FormatError::UnsupportedDepth(bits_per_pixel));
        }
        if color_format.bits_per_pixel() != bits_per_pixel {
            return Err(FormatError::DepthMismatch {
                bits_per_pixel,
                color_format,
            });
        }
        Ok(Self {
            bits_per_pixel,
            color_format,
        })
    }

    /// Pixel format at the native depth of `color_format`.
    pub const fn of(color_format: ColorFormat) -> Self {
        Self {
            bits_per_pixel: color_format.bits_per_pixel(),
            color_format,
        }
    }

    /// Standard 32bpp RGB format.
    pub const fn rgb32() -> Self {
        Self::of(ColorFormat::Rgb32)
    }

    pub const fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    pub const fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    /// Returns bytes-per-pixel (storage width), 1 to 4.
    pub const fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel.div_ceil(8) as usize
    }

    /// Number of bytes needed for `width` packed pixels.
    ///
    /// ```
    /// use glyph_pixelbuffer::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::rgb32().stride(51), 204);
    /// ```
    pub const fn stride(&self, width: u32) -> usize {
        (self.bits_per_pixel as usize * width as usize + 7) / 8
    }

    /// Largest pixel value representable in this format.
    pub const fn max_value(&self) -> u32 {
        match self.bits_per_pixel {
            32 => u32::MAX,
            bits => (1u32 << bits) - 1,
        }
    }

    /// Packs `value` little-endian into the first `bytes_per_pixel()` bytes of
    /// `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than `bytes_per_pixel()`.
    #[inline]
    pub fn write_pixel(&self, value: u32, out: &mut [u8]) {
        let bpp = self.bytes_per_pixel();
        out[..bpp].copy_from_slice(&value.to_le_bytes()[..bpp]);
    }

    /// Reads one little-endian pixel value from the front of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `bytes_per_pixel()`.
    #[inline]
    pub fn read_pixel(&self, bytes: &[u8]) -> u32 {
        let mut raw = [0u8; 4];
        let bpp = self.bytes_per_pixel();
        raw[..bpp].copy_from_slice(&bytes[..bpp]);
        u32::from_le_bytes(raw)
    }

    /// Converts a pixel value in this format to `[R, G, B]`.
    ///
    /// Narrow channels are scaled up with `(c * 255) / channel_max`.
    pub fn to_rgb888(&self, value: u32) -> [u8; 3] {
        match self.color_format {
            ColorFormat::Rgb332 => {
                let r = (value >> 5) & 0x07;
                let g = (value >> 2) & 0x07;
                let b = value & 0x03;
                [
                    ((r * 255) / 7) as u8,
                    ((g * 255) / 7) as u8,
                    ((b * 255) / 3) as u8,
                ]
            }
            ColorFormat::Grey8 => {
                let l = (value & 0xFF) as u8;
                [l, l, l]
            }
            ColorFormat::Rgb565 => {
                let r = (value >> 11) & 0x1F;
                let g = (value >> 5) & 0x3F;
                let b = value & 0x1F;
                [
                    ((r * 255) / 31) as u8,
                    ((g * 255) / 63) as u8,
                    ((b * 255) / 31) as u8,
                ]
            }
            ColorFormat::Rgb24 | ColorFormat::Rgb32 => [
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ],
        }
    }

    /// Converts `[R, G, B]` to a pixel value in this format.
    ///
    /// Greyscale uses the luminance weights 0.299, 0.587 and 0.114.
    pub fn from_rgb888(&self, rgb: [u8; 3]) -> u32 {
        let [r, g, b] = rgb.map(u32::from);
        match self.color_format {
            ColorFormat::Rgb332 => {
                let r = ((r + 2) >> 5).min(0x07);
                let g = ((g + 2) >> 5).min(0x07);
                let b = ((b + 4) >> 6).min(0x03);
                (r << 5) | (g << 2) | b
            }
            ColorFormat::Grey8 => ((299 * r + 587 * g + 114 * b) / 1000).min(255),
            ColorFormat::Rgb565 => ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3),
            ColorFormat::Rgb24 | ColorFormat::Rgb32 => (r << 16) | (g << 8) | b,
        }
    }
}
