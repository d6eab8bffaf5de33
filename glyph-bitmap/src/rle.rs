//! Decoder for run-length encoded palette bitmaps.
//!
//! [`RlePaletteBitmap`] turns the run stream of an [`RlePaletteDescriptor`] into
//! packed pixels, one horizontal run at a time.
//!
//! # Cursor
//!
//! The run stream has no row index, so the decoder keeps a cursor: the logical
//! `(row, col)` position plus the current run entry and how many of its pixels
//! are still unread. The cursor only moves forward. Requests at or after the
//! cursor resume from it; requests before it restart from the first entry:
//!
//! ```text
//! seek_row(target):
//!   target > row, or target == row at col 0  -> skip forward
//!   otherwise                                -> reset, skip target * width
//! ```
//!
//! Drawing an image top to bottom therefore costs one pass over the stream,
//! while jumping backwards near the end of a large image rescans almost all of
//! it.
//!
//! # States
//!
//! | State       | Meaning                                     |
//! |-------------|---------------------------------------------|
//! | `Reset`     | Cursor at the first pixel                   |
//! | `Streaming` | Some, but not all, pixels consumed          |
//! | `Exhausted` | Cursor past the last pixel (`row == height`) |
//!
//! Any advance or copy from `Exhausted` fails with
//! [`DecodeError::StreamExhausted`].
//!
//! # Example
//!
//! ```
//! use glyph_bitmap::{Bitmap, RleEntry, RlePaletteBitmap, RlePaletteDescriptor};
//! use glyph_pixelbuffer::ColorFormat;
//!
//! let runs = [RleEntry::new(2, 0), RleEntry::new(1, 1), RleEntry::new(1, 0)];
//! let descriptor = RlePaletteDescriptor {
//!     bits_per_pixel: 8,
//!     color_format: ColorFormat::Grey8,
//!     palette_size: 2,
//!     width: 2,
//!     height: 2,
//!     palettes: [&[0x11u32, 0x99], &[0x4c, 0xb2]],
//!     runs: &runs,
//! };
//!
//! let mut bitmap = RlePaletteBitmap::new(&descriptor).unwrap();
//! let mut row = [0u8; 2];
//! bitmap.get_run(0, 1, 2, &mut row).unwrap();
//! assert_eq!(row, [0x99, 0x11]);
//! ```

use crate::{Bitmap, DecodeError, RleEntry, RlePaletteDescriptor};
use glyph_pixelbuffer::PixelFormat;

/// Where the decode cursor sits relative to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Reset,
    Streaming,
    Exhausted,
}

/// Stateful accessor over one [`RlePaletteDescriptor`].
///
/// The descriptor is borrowed, never copied. Several decoders may share one
/// descriptor; each decoder's cursor is its own and is not safe to share
/// between threads without external locking.
#[derive(Debug, Clone)]
pub struct RlePaletteBitmap<'a> {
    bitmap: &'a RlePaletteDescriptor<'a>,
    format: PixelFormat,
    /// Active palette
    lut: &'a [u32],
    selected: bool,
    row: u32,
    col: u32,
    /// Index of the current run entry
    rle: usize,
    /// Unread pixels in the current run entry
    remaining: u8,
}

impl<'a> RlePaletteBitmap<'a> {
    /// Creates a decoder positioned at the first pixel, using the normal
    /// palette.
    ///
    /// Fails on an unsupported pixel depth or on palettes that do not hold
    /// `palette_size` colors. The run stream itself is checked lazily.
    pub fn new(bitmap: &'a RlePaletteDescriptor<'a>) -> Result<Self, DecodeError> {
        let format = bitmap.check()?;

        let mut decoder = Self {
            bitmap,
            format,
            lut: bitmap.palette(false),
            selected: false,
            row: 0,
            col: 0,
            rle: 0,
            remaining: 0,
        };
        decoder.reset();
        Ok(decoder)
    }

    /// Returns the descriptor this decoder reads from.
    pub fn descriptor(&self) -> &'a RlePaletteDescriptor<'a> {
        self.bitmap
    }

    /// Returns true if the selected palette is active.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Current `(row, col)` of the cursor.
    pub fn position(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    pub fn state(&self) -> CursorState {
        if self.row >= self.bitmap.height {
            CursorState::Exhausted
        } else if self.row == 0 && self.col == 0 {
            CursorState::Reset
        } else {
            CursorState::Streaming
        }
    }

    /// Returns the cursor to the first pixel of the image.
    pub fn reset(&mut self) {
        self.row = 0;
        self.col = 0;
        self.rle = 0;
        self.remaining = self.bitmap.runs.first().map_or(0, |entry| entry.npixels);
    }

    /// Number of pixels between the cursor and the end of the image.
    pub fn pixels_left(&self) -> u64 {
        let consumed = u64::from(self.row) * u64::from(self.bitmap.width) + u64::from(self.col);
        self.bitmap.total_pixels().saturating_sub(consumed)
    }

    /// Consumes `npixels` pixels without producing output, crossing run and
    /// row boundaries as needed.
    ///
    /// Fails without moving the cursor if fewer than `npixels` pixels remain in
    /// the image. A malformed run stream may fail part way, leaving the cursor
    /// somewhere ahead of where it started.
    pub fn advance(&mut self, npixels: u32) -> Result<(), DecodeError> {
        self.skip_pixels(u64::from(npixels))
    }

    /// Positions the cursor at column 0 of `row`.
    pub fn seek_row(&mut self, row: u32) -> Result<(), DecodeError> {
        if row >= self.bitmap.height {
            return Err(DecodeError::OutOfBounds {
                x: 0,
                y: row,
                width: 0,
                bitmap_width: self.bitmap.width,
                bitmap_height: self.bitmap.height,
            });
        }

        // The stream can only be walked forwards
        if row < self.row || (row == self.row && self.col > 0) {
            tracing::debug!(
                "RLE: seek back from row {} col {} to row {}, rescanning",
                self.row,
                self.col,
                row
            );
            self.reset();
        }

        let skip =
            u64::from(row - self.row) * u64::from(self.bitmap.width) - u64::from(self.col);
        self.skip_pixels(skip)
    }

    /// Writes the next `npixels` pixels into `out` through the active palette
    /// and advances the cursor past them.
    ///
    /// `out` must hold at least `npixels * bytes_per_pixel` bytes. The copy may
    /// span several run entries and a row boundary.
    pub fn copy_pixels(&mut self, npixels: u32, out: &mut [u8]) -> Result<(), DecodeError> {
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let needed = npixels as usize * bytes_per_pixel;
        if out.len() < needed {
            return Err(DecodeError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        self.ensure_available(u64::from(npixels))?;

        let mut offset = 0usize;
        let mut left = npixels;
        while left > 0 {
            let (lookup, count) = self.next_span(left)?;
            let color = *self
                .lut
                .get(usize::from(lookup))
                .ok_or(DecodeError::PaletteIndex {
                    index: lookup,
                    palette_size: self.lut.len(),
                })?;

            let mut packed = [0u8; 4];
            self.format.write_pixel(color, &mut packed);

            let end = offset + count as usize * bytes_per_pixel;
            for pixel in out[offset..end].chunks_exact_mut(bytes_per_pixel) {
                pixel.copy_from_slice(&packed[..bytes_per_pixel]);
            }

            offset = end;
            left -= count;
        }

        Ok(())
    }

    fn ensure_available(&self, npixels: u64) -> Result<(), DecodeError> {
        if npixels > self.pixels_left() {
            return Err(DecodeError::StreamExhausted {
                row: self.row,
                col: self.col,
            });
        }
        Ok(())
    }

    fn skip_pixels(&mut self, npixels: u64) -> Result<(), DecodeError> {
        self.ensure_available(npixels)?;

        let mut left = npixels;
        while left > 0 {
            let max = u32::try_from(left).unwrap_or(u32::MAX);
            let (_, count) = self.next_span(max)?;
            left -= u64::from(count);
        }

        Ok(())
    }

    /// Consumes up to `max` pixels (`max > 0`) from the current run, moving on
    /// to the next entry first if the current one is used up.
    ///
    /// Returns the palette index and the number of pixels consumed.
    fn next_span(&mut self, max: u32) -> Result<(u8, u32), DecodeError> {
        if self.row >= self.bitmap.height {
            return Err(DecodeError::StreamExhausted {
                row: self.row,
                col: self.col,
            });
        }

        while self.remaining == 0 {
            let next = self.rle + 1;
            let Some(entry) = self.bitmap.runs.get(next) else {
                return Err(DecodeError::StreamExhausted {
                    row: self.row,
                    col: self.col,
                });
            };
            self.rle = next;
            self.remaining = entry.npixels;
        }

        let entry: RleEntry = self.bitmap.runs[self.rle];
        let remaining = u32::from(self.remaining);
        if remaining > self.bitmap.width - self.col {
            return Err(DecodeError::RowInvariantViolation {
                entry: self.rle,
                run_length: entry.npixels,
                row: self.row,
                col: self.col,
            });
        }

        let count = max.min(remaining);
        // count <= remaining <= 255
        self.remaining -= count as u8;
        self.col += count;
        if self.col == self.bitmap.width {
            self.col = 0;
            self.row += 1;
        }

        Ok((entry.lookup, count))
    }
}

impl Bitmap for RlePaletteBitmap<'_> {
    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn width(&self) -> u32 {
        self.bitmap.width
    }

    fn height(&self) -> u32 {
        self.bitmap.height
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        self.lut = self.bitmap.palette(selected);
    }

    fn get_run(&mut self, x: u32, y: u32, width: u32, out: &mut [u8]) -> Result<(), DecodeError> {
        if y >= self.bitmap.height || u64::from(x) + u64::from(width) > u64::from(self.bitmap.width)
        {
            return Err(DecodeError::OutOfBounds {
                x,
                y,
                width,
                bitmap_width: self.bitmap.width,
                bitmap_height: self.bitmap.height,
            });
        }

        tracing::trace!("RLE: run x={} y={} width={}", x, y, width);

        self.seek_row(y)?;
        self.advance(x)?;
        self.copy_pixels(width, out)
    }
}
