//! Palette helpers.
//!
//! Glyph assets carry two palettes: the normal look and a brighter "selected"
//! look. When an asset only provides the normal palette, the selected one is
//! derived per channel as
//!
//! ```text
//! bright = (3 * c + 0xff) >> 2
//! ```
//!
//! which moves each channel three quarters of the way from white towards its
//! original value.

use glyph_pixelbuffer::PixelFormat;

/// Brightens a single channel.
#[inline]
pub const fn brighten_channel(c: u8) -> u8 {
    ((3 * c as u32 + 0xFF) >> 2) as u8
}

/// Returns the highlighted version of pixel `value` in `format`.
pub fn highlight(value: u32, format: PixelFormat) -> u32 {
    let rgb = format.to_rgb888(value).map(brighten_channel);
    format.from_rgb888(rgb)
}

/// Derives a full selected palette from a normal one.
pub fn highlight_palette(normal: &[u32], format: PixelFormat) -> Vec<u32> {
    normal.iter().map(|&value| highlight(value, format)).collect()
}
