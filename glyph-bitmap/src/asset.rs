//! Owned glyph assets loaded at run time.
//!
//! Compiled-in glyphs are `static` [`RlePaletteDescriptor`]s. Tools that work
//! on glyph files instead deserialize a [`GlyphAsset`] from TOML:
//!
//! ```toml
//! name = "checker"
//! bits_per_pixel = 8
//! color_format = "grey8"
//! width = 2
//! height = 2
//! normal = [0x11, 0x99]
//! # selected = [...]   (derived from `normal` when omitted)
//! runs = [[1, 0], [1, 1], [1, 1], [1, 0]]
//! ```
//!
//! Every asset is validated on load, so the descriptor it lends out always
//! satisfies the run stream contract.

use crate::palette::highlight_palette;
use crate::{RleEntry, RlePaletteDescriptor};
use anyhow::{bail, Context, Result};
use glyph_pixelbuffer::{ColorFormat, PixelFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest palette addressable by an 8-bit lookup.
pub const MAX_PALETTE_SIZE: usize = 256;

/// A glyph that owns its palettes and run stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphAsset {
    #[serde(default)]
    pub name: String,
    pub bits_per_pixel: u8,
    pub color_format: ColorFormat,
    pub width: u32,
    pub height: u32,
    /// Normal palette.
    pub normal: Vec<u32>,
    /// Selected palette; same length as `normal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Vec<u32>>,
    pub runs: Vec<RleEntry>,
}

impl GlyphAsset {
    /// Parses and validates an asset.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut asset: GlyphAsset = toml::from_str(source).context("Failed to parse glyph asset")?;

        if asset.normal.len() > MAX_PALETTE_SIZE {
            bail!(
                "Glyph '{}' has {} colors, at most {} are addressable",
                asset.name,
                asset.normal.len(),
                MAX_PALETTE_SIZE
            );
        }

        let format = PixelFormat::new(asset.bits_per_pixel, asset.color_format)
            .with_context(|| format!("Glyph '{}' has an invalid pixel format", asset.name))?;

        if asset.selected.is_none() {
            tracing::debug!("Deriving selected palette for glyph '{}'", asset.name);
            asset.selected = Some(highlight_palette(&asset.normal, format));
        }

        asset
            .descriptor()
            .validate()
            .with_context(|| format!("Glyph '{}' is malformed", asset.name))?;

        Ok(asset)
    }

    /// Reads and validates an asset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut asset = Self::from_toml_str(&source)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        if asset.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                asset.name = stem.to_string_lossy().into_owned();
            }
        }
        Ok(asset)
    }

    /// Borrows the asset as a descriptor for [`RlePaletteBitmap`](crate::RlePaletteBitmap).
    pub fn descriptor(&self) -> RlePaletteDescriptor<'_> {
        let selected = self.selected.as_deref().unwrap_or(self.normal.as_slice());
        RlePaletteDescriptor {
            bits_per_pixel: self.bits_per_pixel,
            color_format: self.color_format,
            palette_size: self.normal.len() as u16,
            width: self.width,
            height: self.height,
            palettes: [self.normal.as_slice(), selected],
            runs: &self.runs,
        }
    }
}
