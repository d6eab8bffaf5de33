//! Shared helpers for the glyph-bitmap integration tests.

#![allow(dead_code)]

use glyph_bitmap::{RleEntry, RlePaletteDescriptor};
use glyph_pixelbuffer::ColorFormat;

/// Greedy RLE encoder: one run per stretch of equal indices, split at row
/// ends and at 255 pixels.
pub fn encode(rows: &[Vec<u8>]) -> Vec<RleEntry> {
    let mut runs = Vec::new();
    for row in rows {
        let mut iter = row.iter().copied().peekable();
        while let Some(lookup) = iter.next() {
            let mut npixels = 1u8;
            while npixels < u8::MAX && iter.peek() == Some(&lookup) {
                iter.next();
                npixels += 1;
            }
            runs.push(RleEntry::new(npixels, lookup));
        }
    }
    runs
}

/// An owned glyph used to build descriptors in tests.
#[derive(Debug, Clone)]
pub struct TestGlyph {
    pub color_format: ColorFormat,
    pub width: u32,
    pub height: u32,
    pub normal: Vec<u32>,
    pub selected: Vec<u32>,
    pub indices: Vec<Vec<u8>>,
    pub runs: Vec<RleEntry>,
}

impl TestGlyph {
    pub fn new(
        color_format: ColorFormat,
        normal: Vec<u32>,
        selected: Vec<u32>,
        indices: Vec<Vec<u8>>,
    ) -> Self {
        let height = indices.len() as u32;
        let width = indices.first().map_or(0, |row| row.len() as u32);
        let runs = encode(&indices);
        Self {
            color_format,
            width,
            height,
            normal,
            selected,
            indices,
            runs,
        }
    }

    pub fn descriptor(&self) -> RlePaletteDescriptor<'_> {
        RlePaletteDescriptor {
            bits_per_pixel: self.color_format.bits_per_pixel(),
            color_format: self.color_format,
            palette_size: self.normal.len() as u16,
            width: self.width,
            height: self.height,
            palettes: [self.normal.as_slice(), self.selected.as_slice()],
            runs: &self.runs,
        }
    }

    /// Expected bytes for `width` pixels at `(x, y)`, packed little-endian.
    pub fn expected(&self, x: u32, y: u32, width: u32, selected: bool) -> Vec<u8> {
        let palette = if selected { &self.selected } else { &self.normal };
        let bytes_per_pixel = self.bytes_per_pixel();
        let row = &self.indices[y as usize];
        row[x as usize..(x + width) as usize]
            .iter()
            .flat_map(|&index| palette[usize::from(index)].to_le_bytes()[..bytes_per_pixel].to_vec())
            .collect()
    }

    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.color_format.bits_per_pixel() / 8)
    }
}
