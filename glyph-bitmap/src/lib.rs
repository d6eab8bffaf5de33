//! Run-length encoded palette bitmaps.
//!
//! Small UI images (icons, cursors, button glyphs) are stored as a stream of
//! `(npixels, lookup)` runs plus two palettes, a normal one and a brighter
//! "selected" one. This crate decodes them on demand, one horizontal run of
//! packed pixels at a time, without ever holding a full frame.
//!
//! # Architecture
//!
//! - [`Bitmap`]: the accessor interface a renderer draws through.
//! - [`RlePaletteBitmap`]: the decoder. It walks the run stream with a
//!   forward-only cursor.
//! - [`ScaledBitmap`]: presents any [`Bitmap`] at another size.
//! - [`GlyphAsset`]: an owned, validated glyph loaded from TOML.
//!
//! # Example
//!
//! ```
//! use glyph_bitmap::{Bitmap, RleEntry, RlePaletteBitmap, RlePaletteDescriptor};
//! use glyph_pixelbuffer::ColorFormat;
//!
//! static NORMAL: [u32; 2] = [0x0000, 0xFFFF];
//! static BRIGHT: [u32; 2] = [0x39E7, 0xFFFF];
//! static RUNS: [RleEntry; 2] = [RleEntry::new(3, 0), RleEntry::new(1, 1)];
//!
//! static CURSOR: RlePaletteDescriptor<'static> = RlePaletteDescriptor {
//!     bits_per_pixel: 16,
//!     color_format: ColorFormat::Rgb565,
//!     palette_size: 2,
//!     width: 4,
//!     height: 1,
//!     palettes: [&NORMAL, &BRIGHT],
//!     runs: &RUNS,
//! };
//!
//! let mut bitmap = RlePaletteBitmap::new(&CURSOR).unwrap();
//! let mut row = vec![0u8; bitmap.stride()];
//! bitmap.get_run(0, 0, 4, &mut row).unwrap();
//! assert_eq!(row, [0, 0, 0, 0, 0, 0, 0xFF, 0xFF]);
//! ```

pub mod asset;
pub mod descriptor;
pub mod error;
pub mod palette;
pub mod rle;
pub mod scaled;

pub use asset::GlyphAsset;
pub use descriptor::{RleEntry, RlePaletteDescriptor, PALETTE_NORMAL, PALETTE_SELECTED};
pub use error::DecodeError;
pub use rle::{CursorState, RlePaletteBitmap};
pub use scaled::ScaledBitmap;

use glyph_pixelbuffer::{ColorFormat, PixelFormat};

/// Pixel accessor for images a renderer draws run by run.
///
/// Implementations may keep internal state between calls (a decode cursor, a
/// row cache), which is why reads take `&mut self`.
pub trait Bitmap {
    /// Format of the pixels written by [`get_run`](Self::get_run).
    fn pixel_format(&self) -> PixelFormat;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Chooses between the normal and the selected palette. Applies to all
    /// subsequent reads.
    fn set_selected(&mut self, selected: bool);

    /// Writes `width` pixels starting at `(x, y)` into `out`, packed at the
    /// bitmap's pixel format.
    ///
    /// # Errors
    ///
    /// Fails without writing a meaningful result when the run lies outside
    /// the image, `out` is too small, or the underlying data is malformed.
    fn get_run(&mut self, x: u32, y: u32, width: u32, out: &mut [u8]) -> Result<(), DecodeError>;

    fn bits_per_pixel(&self) -> u8 {
        self.pixel_format().bits_per_pixel()
    }

    fn color_format(&self) -> ColorFormat {
        self.pixel_format().color_format()
    }

    /// Bytes in one full row of output.
    fn stride(&self) -> usize {
        self.pixel_format().stride(self.width())
    }
}
