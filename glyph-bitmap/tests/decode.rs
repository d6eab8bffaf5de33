//! End-to-end decoding tests for RlePaletteBitmap.

mod common;

use common::{encode, TestGlyph};
use glyph_bitmap::{
    Bitmap, CursorState, DecodeError, RleEntry, RlePaletteBitmap, RlePaletteDescriptor,
};
use glyph_pixelbuffer::{ColorFormat, PixelFormat};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn format_strategy() -> impl Strategy<Value = ColorFormat> {
    prop_oneof![
        Just(ColorFormat::Rgb332),
        Just(ColorFormat::Grey8),
        Just(ColorFormat::Rgb565),
        Just(ColorFormat::Rgb24),
        Just(ColorFormat::Rgb32),
    ]
}

fn glyph_strategy() -> impl Strategy<Value = TestGlyph> {
    (format_strategy(), 1usize..40, 1usize..12, 1usize..8).prop_flat_map(
        |(format, width, height, colors)| {
            let max = PixelFormat::of(format).max_value();
            (
                prop::collection::vec(0..=max, colors),
                prop::collection::vec(0..=max, colors),
                prop::collection::vec(
                    prop::collection::vec(0..colors as u8, width),
                    height,
                ),
            )
                .prop_map(move |(normal, selected, indices)| {
                    TestGlyph::new(format, normal, selected, indices)
                })
        },
    )
}

fn read_row(bitmap: &mut RlePaletteBitmap<'_>, y: u32) -> Vec<u8> {
    let width = bitmap.width();
    let mut row = vec![0u8; bitmap.stride()];
    bitmap.get_run(0, y, width, &mut row).unwrap();
    row
}

proptest! {
    #[test]
    fn prop_full_image_round_trip(glyph in glyph_strategy()) {
        let desc = glyph.descriptor();
        prop_assert!(desc.validate().is_ok());

        let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();
        for y in 0..glyph.height {
            prop_assert_eq!(read_row(&mut bitmap, y), glyph.expected(0, y, glyph.width, false));
        }
        prop_assert_eq!(bitmap.state(), CursorState::Exhausted);
    }

    #[test]
    fn prop_random_access_is_idempotent(
        glyph in glyph_strategy(),
        requests in prop::collection::vec((0u32..40, 0u32..12, 0u32..40), 1..20),
    ) {
        let desc = glyph.descriptor();
        let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();

        for (x, y, width) in requests {
            let x = x % glyph.width;
            let y = y % glyph.height;
            let width = width % (glyph.width - x + 1);

            let mut first = vec![0u8; width as usize * glyph.bytes_per_pixel()];
            let mut second = first.clone();
            bitmap.get_run(x, y, width, &mut first).unwrap();
            bitmap.get_run(x, y, width, &mut second).unwrap();

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first, glyph.expected(x, y, width, false));
        }
    }

    #[test]
    fn prop_selected_palette_shares_indices(glyph in glyph_strategy(), y in 0u32..12) {
        let y = y % glyph.height;
        let desc = glyph.descriptor();
        let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();

        bitmap.set_selected(true);
        prop_assert_eq!(read_row(&mut bitmap, y), glyph.expected(0, y, glyph.width, true));
        bitmap.set_selected(false);
        prop_assert_eq!(read_row(&mut bitmap, y), glyph.expected(0, y, glyph.width, false));
    }

    #[test]
    fn prop_out_of_bounds_rejected(glyph in glyph_strategy(), overshoot in 1u32..5) {
        let desc = glyph.descriptor();
        let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();
        let mut out = vec![0u8; (glyph.width + overshoot) as usize * glyph.bytes_per_pixel()];

        let wide = bitmap.get_run(0, 0, glyph.width + overshoot, &mut out);
        prop_assert!(
            matches!(wide, Err(DecodeError::OutOfBounds { .. })),
            "expected OutOfBounds, got {:?}",
            wide
        );
        let low = bitmap.get_run(0, glyph.height + overshoot - 1, 1, &mut out);
        prop_assert!(
            matches!(low, Err(DecodeError::OutOfBounds { .. })),
            "expected OutOfBounds, got {:?}",
            low
        );
    }
}

#[test]
fn test_encode_splits_long_runs() {
    let runs = encode(&[vec![3; 300], vec![1, 1, 2]]);
    assert_eq!(
        runs,
        vec![
            RleEntry::new(255, 3),
            RleEntry::new(45, 3),
            RleEntry::new(2, 1),
            RleEntry::new(1, 2),
        ]
    );
}

#[test]
fn test_rgb32_packs_four_bytes() {
    let glyph = TestGlyph::new(
        ColorFormat::Rgb32,
        vec![0x0102_0304, 0xFFEE_DDCC],
        vec![0x0000_0000, 0x8000_0001],
        vec![vec![0, 1, 1], vec![1, 0, 0]],
    );
    let desc = glyph.descriptor();
    let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();

    assert_eq!(
        read_row(&mut bitmap, 0),
        vec![0x04, 0x03, 0x02, 0x01, 0xCC, 0xDD, 0xEE, 0xFF, 0xCC, 0xDD, 0xEE, 0xFF]
    );
    bitmap.set_selected(true);
    assert_eq!(read_row(&mut bitmap, 1), glyph.expected(0, 1, 3, true));
}

const GREYS: [u32; 2] = [0x11, 0x99];
const BRIGHT_GREYS: [u32; 2] = [0x4C, 0xB2];

fn two_by_two(runs: &[RleEntry]) -> RlePaletteDescriptor<'_> {
    RlePaletteDescriptor {
        bits_per_pixel: 8,
        color_format: ColorFormat::Grey8,
        palette_size: 2,
        width: 2,
        height: 2,
        palettes: [&GREYS, &BRIGHT_GREYS],
        runs,
    }
}

#[test]
fn test_two_by_two_scenario() {
    let runs = [RleEntry::new(2, 0), RleEntry::new(1, 1), RleEntry::new(1, 0)];
    let desc = two_by_two(&runs);
    let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();

    let mut row = [0u8; 2];
    bitmap.get_run(0, 1, 2, &mut row).unwrap();
    assert_eq!(row, [0x99, 0x11]);

    let mut pixel = [0u8; 1];
    bitmap.get_run(1, 0, 1, &mut pixel).unwrap();
    assert_eq!(pixel, [0x11]);

    bitmap.set_selected(true);
    bitmap.get_run(0, 1, 2, &mut row).unwrap();
    assert_eq!(row, [0xB2, 0x4C]);

    let overhang = bitmap.get_run(1, 0, 2, &mut row);
    assert!(matches!(overhang, Err(DecodeError::OutOfBounds { .. })));
}

#[test]
fn test_seek_matches_sequential_decoding() {
    let indices: Vec<Vec<u8>> = (0..10u8)
        .map(|y| (0..6u8).map(|x| (x / 2 + y) % 3).collect())
        .collect();
    let glyph = TestGlyph::new(
        ColorFormat::Rgb565,
        vec![0x0000, 0xF800, 0x07E0],
        vec![0xFFFF, 0xFFE0, 0x07FF],
        indices,
    );
    let desc = glyph.descriptor();

    let mut sequential = RlePaletteBitmap::new(&desc).unwrap();
    let rows: Vec<Vec<u8>> = (0..10).map(|y| read_row(&mut sequential, y)).collect();

    let mut seeking = RlePaletteBitmap::new(&desc).unwrap();
    seeking.seek_row(7).unwrap();
    assert_eq!(seeking.position(), (7, 0));
    let mut row = vec![0u8; seeking.stride()];
    seeking.copy_pixels(6, &mut row).unwrap();
    assert_eq!(row, rows[7]);
    assert_eq!(row, glyph.expected(0, 7, 6, false));
}

#[test]
fn test_backward_seek_rescans() {
    let indices: Vec<Vec<u8>> = (0..10u8).map(|y| vec![y % 2; 4]).collect();
    let glyph = TestGlyph::new(ColorFormat::Grey8, vec![10, 20], vec![30, 40], indices);
    let desc = glyph.descriptor();
    let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();

    assert_eq!(read_row(&mut bitmap, 9), vec![20; 4]);
    assert_eq!(bitmap.state(), CursorState::Exhausted);

    assert_eq!(read_row(&mut bitmap, 2), vec![10; 4]);
    assert_eq!(bitmap.position(), (3, 0));
    assert_eq!(bitmap.state(), CursorState::Streaming);

    bitmap.reset();
    assert_eq!(bitmap.state(), CursorState::Reset);
    assert_eq!(bitmap.pixels_left(), 40);
}

#[test]
fn test_validate_catches_broken_row_sum() {
    let runs = [RleEntry::new(1, 0), RleEntry::new(2, 1), RleEntry::new(1, 0)];
    let desc = two_by_two(&runs);
    let err = desc.validate().unwrap_err();
    assert!(err.is_malformed_asset());

    let mut bitmap = RlePaletteBitmap::new(&desc).unwrap();
    let mut row = [0u8; 2];
    assert!(matches!(
        bitmap.get_run(0, 0, 2, &mut row),
        Err(DecodeError::RowInvariantViolation { .. })
    ));
}
