//! Static description of a run-length encoded palette bitmap.
//!
//! # Wire Format
//!
//! The pixel data is a flat array of two-byte entries with no header, no row
//! delimiters and no embedded dimensions:
//!
//! ```text
//! +------------+------------+------------+------------+----
//! | npixels    | lookup     | npixels    | lookup     | ...
//! +------------+------------+------------+------------+----
//!   1 byte       1 byte
//! ```
//!
//! Entries cover the image in row-major order, top row first. A run never
//! crosses a row boundary: the run lengths of each row add up to exactly the
//! image width, and the array ends exactly at the last pixel of the last row.
//!
//! Everything else (depth, color format, dimensions and the two palettes) is
//! supplied alongside the array by [`RlePaletteDescriptor`].

use crate::DecodeError;
use glyph_pixelbuffer::{ColorFormat, PixelFormat};
use serde::{Deserialize, Serialize};

/// One run: `npixels` consecutive pixels of palette color `lookup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
#[repr(C)]
pub struct RleEntry {
    /// Run length, 1-255.
    pub npixels: u8,
    /// Index into the active palette.
    pub lookup: u8,
}

impl RleEntry {
    pub const fn new(npixels: u8, lookup: u8) -> Self {
        Self { npixels, lookup }
    }
}

impl From<(u8, u8)> for RleEntry {
    fn from((npixels, lookup): (u8, u8)) -> Self {
        Self::new(npixels, lookup)
    }
}

impl From<RleEntry> for (u8, u8) {
    fn from(entry: RleEntry) -> Self {
        (entry.npixels, entry.lookup)
    }
}

/// Index of the normal palette in [`RlePaletteDescriptor::palettes`].
pub const PALETTE_NORMAL: usize = 0;
/// Index of the selected (highlighted) palette.
pub const PALETTE_SELECTED: usize = 1;

/// Metadata and borrowed data for one RLE palette bitmap.
///
/// Descriptors are normally `static` tables:
///
/// ```
/// use glyph_bitmap::{RleEntry, RlePaletteDescriptor};
/// use glyph_pixelbuffer::ColorFormat;
///
/// static NORMAL: [u32; 2] = [0x11, 0x99];
/// static BRIGHT: [u32; 2] = [0x4c, 0xb2];
/// static RUNS: [RleEntry; 3] = [RleEntry::new(2, 0), RleEntry::new(1, 1), RleEntry::new(1, 0)];
///
/// static GLYPH: RlePaletteDescriptor<'static> = RlePaletteDescriptor {
///     bits_per_pixel: 8,
///     color_format: ColorFormat::Grey8,
///     palette_size: 2,
///     width: 2,
///     height: 2,
///     palettes: [&NORMAL, &BRIGHT],
///     runs: &RUNS,
/// };
///
/// assert!(GLYPH.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RlePaletteDescriptor<'a> {
    /// Output depth: 8, 16, 24 or 32.
    pub bits_per_pixel: u8,
    pub color_format: ColorFormat,
    /// Number of colors in each palette.
    pub palette_size: u16,
    pub width: u32,
    pub height: u32,
    /// Normal and selected palettes, `palette_size` pixel values each.
    pub palettes: [&'a [u32]; 2],
    /// The run stream.
    pub runs: &'a [RleEntry],
}

impl<'a> RlePaletteDescriptor<'a> {
    /// Returns the palette used when `selected` is false or true.
    pub fn palette(&self, selected: bool) -> &'a [u32] {
        if selected {
            self.palettes[PALETTE_SELECTED]
        } else {
            self.palettes[PALETTE_NORMAL]
        }
    }

    /// Number of pixels in the whole image.
    pub fn total_pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Checks the metadata that decoding depends on: a supported pixel depth
    /// and two palettes of `palette_size` colors.
    ///
    /// This does not walk the run stream; see [`validate`](Self::validate).
    pub fn check(&self) -> Result<PixelFormat, DecodeError> {
        let format = PixelFormat::new(self.bits_per_pixel, self.color_format)?;

        let expected = usize::from(self.palette_size);
        let normal = self.palettes[PALETTE_NORMAL].len();
        let selected = self.palettes[PALETTE_SELECTED].len();
        if normal != expected || selected != expected {
            return Err(DecodeError::PaletteLength {
                expected,
                normal,
                selected,
            });
        }

        Ok(format)
    }

    /// Walks the whole run stream and checks the asset contract: the image
    /// is not empty, every row sums to `width`, exactly `height` rows are
    /// produced, no entries are left over, no run is empty, and every lookup
    /// is inside the palette.
    pub fn validate(&self) -> Result<(), DecodeError> {
        self.check()?;

        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }

        let palette_size = usize::from(self.palette_size);
        let mut row = 0u32;
        let mut col = 0u32;

        for (entry, run) in self.runs.iter().enumerate() {
            if row >= self.height {
                return Err(DecodeError::TrailingRuns {
                    leftover: self.runs.len() - entry,
                });
            }
            if run.npixels == 0 {
                return Err(DecodeError::EmptyRun { entry });
            }
            if usize::from(run.lookup) >= palette_size {
                return Err(DecodeError::PaletteIndex {
                    index: run.lookup,
                    palette_size,
                });
            }

            let run_length = u32::from(run.npixels);
            if run_length > self.width - col {
                return Err(DecodeError::RowInvariantViolation {
                    entry,
                    run_length: run.npixels,
                    row,
                    col,
                });
            }

            col += run_length;
            if col == self.width {
                col = 0;
                row += 1;
            }
        }

        if row < self.height {
            return Err(DecodeError::StreamExhausted { row, col });
        }

        Ok(())
    }
}
