//! Error types for bitmap decoding.

use glyph_pixelbuffer::FormatError;
use thiserror::Error;

/// Errors that can occur while decoding a bitmap.
///
/// None of these are fatal to the caller: a failed [`get_run`](crate::Bitmap::get_run)
/// means "nothing to draw" for that request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Requested row/column/width falls outside the image.
    #[error("run x={x} y={y} width={width} lies outside the {bitmap_width}x{bitmap_height} bitmap")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        bitmap_width: u32,
        bitmap_height: u32,
    },

    /// The run stream ended before the request was satisfied.
    #[error("run stream exhausted at row {row}, column {col}")]
    StreamExhausted { row: u32, col: u32 },

    /// A run crosses the end of its row.
    #[error("run {entry} ({run_length} pixels) overruns row {row} at column {col}")]
    RowInvariantViolation {
        entry: usize,
        run_length: u8,
        row: u32,
        col: u32,
    },

    /// A run refers to a color beyond the end of the palette.
    #[error("palette index {index} out of range for {palette_size} colors")]
    PaletteIndex { index: u8, palette_size: usize },

    /// Output buffer cannot hold the requested pixels.
    #[error("output buffer holds {available} bytes, {needed} needed")]
    BufferTooSmall { needed: usize, available: usize },

    /// Pixel depth or color format is not supported.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The normal and selected palettes do not both hold `palette_size` colors.
    #[error("palettes hold {normal} and {selected} colors, expected {expected}")]
    PaletteLength {
        expected: usize,
        normal: usize,
        selected: usize,
    },

    /// Run entries remain after the last pixel of the last row.
    #[error("{leftover} run entries remain after the last row")]
    TrailingRuns { leftover: usize },

    /// A run entry has a length of zero.
    #[error("run {entry} has zero length")]
    EmptyRun { entry: usize },

    /// The bitmap has no pixels.
    #[error("bitmap has zero size {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// A scaled view was requested with a zero dimension.
    #[error("cannot scale a {from_width}x{from_height} bitmap to {to_width}x{to_height}")]
    InvalidScale {
        from_width: u32,
        from_height: u32,
        to_width: u32,
        to_height: u32,
    },
}

impl DecodeError {
    /// Returns true if the error points at a defective asset rather than a
    /// bad request.
    #[must_use]
    pub fn is_malformed_asset(&self) -> bool {
        matches!(
            self,
            Self::StreamExhausted { .. }
                | Self::RowInvariantViolation { .. }
                | Self::PaletteIndex { .. }
                | Self::PaletteLength { .. }
                | Self::TrailingRuns { .. }
                | Self::EmptyRun { .. }
                | Self::EmptyImage { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        assert!(DecodeError::StreamExhausted { row: 1, col: 0 }.is_malformed_asset());
        assert!(DecodeError::EmptyRun { entry: 3 }.is_malformed_asset());
        assert!(DecodeError::EmptyImage {
            width: 4,
            height: 0
        }
        .is_malformed_asset());
        assert!(!DecodeError::BufferTooSmall {
            needed: 4,
            available: 2
        }
        .is_malformed_asset());
        assert!(!DecodeError::Format(FormatError::UnsupportedDepth(12)).is_malformed_asset());
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::OutOfBounds {
            x: 1,
            y: 0,
            width: 2,
            bitmap_width: 2,
            bitmap_height: 2,
        };
        assert_eq!(
            err.to_string(),
            "run x=1 y=0 width=2 lies outside the 2x2 bitmap"
        );

        let err = DecodeError::from(FormatError::UnsupportedDepth(4));
        assert!(err.to_string().contains("4 bits per pixel"));
    }
}
