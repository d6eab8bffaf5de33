//! Rendering glyph assets into pixel buffers and PNG files.
//!
//! A glyph is drawn the way a UI image widget draws it: one run per row
//! through the [`Bitmap`] interface, top to bottom, into a frame buffer at an
//! origin. Pixels matching the transparent color are replaced by the
//! background, and the area around the glyph is padded with it.
//!
//! Several assets are rendered in parallel. Each worker builds its own
//! decoder; only the immutable asset is shared.

use crate::config::{Config, Rgb, Size};
use anyhow::{anyhow, bail, Context, Result};
use glyph_bitmap::{Bitmap, GlyphAsset, RlePaletteBitmap, ScaledBitmap};
use glyph_common::{Point, Rect};
use glyph_pixelbuffer::ManagedPixelBuffer;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-glyph rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub selected: bool,
    pub scale: Option<Size>,
    pub transparent: Option<Rgb>,
    pub background: Rgb,
    pub margin: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            selected: config.render.selected,
            scale: config.render.scale,
            transparent: config.render.transparent,
            background: config.output.background,
            margin: config.output.margin,
        }
    }
}

/// Draws `bitmap` into `buffer` with its top-left corner at `origin`.
///
/// The part of the bitmap outside the buffer is clipped. Pixel values equal
/// to `transparent` become `background`. Rows that fail to decode are left
/// as `background` and counted in the return value.
pub fn draw_bitmap<B: Bitmap>(
    bitmap: &mut B,
    buffer: &mut ManagedPixelBuffer,
    origin: Point,
    background: u32,
    transparent: Option<u32>,
) -> Result<u32> {
    let format = bitmap.pixel_format();
    if *buffer.format() != format {
        return Err(anyhow!(
            "Bitmap format {:?} does not match buffer format {:?}",
            format,
            buffer.format()
        ));
    }

    let (buffer_width, buffer_height) = buffer.dimensions();
    let image = placement(origin, bitmap.width(), bitmap.height())?;
    let Some(dest) = image.intersection(&Rect::from_size(buffer_width, buffer_height)) else {
        debug!("Bitmap at {:?} lies outside the buffer", origin);
        return Ok(0);
    };

    let bytes_per_pixel = format.bytes_per_pixel();
    let mut row = vec![0u8; dest.width as usize * bytes_per_pixel];
    let x = (dest.x - origin.x) as u32;
    let mut failed = 0;

    for dy in 0..dest.height {
        let y = (dest.y - origin.y) as u32 + dy;

        match bitmap.get_run(x, y, dest.width, &mut row) {
            Ok(()) => {
                if let Some(transparent) = transparent {
                    for pixel in row.chunks_exact_mut(bytes_per_pixel) {
                        if format.read_pixel(pixel) == transparent {
                            format.write_pixel(background, pixel);
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Failed to decode row {}: {}", y, e);
                failed += 1;
                for pixel in row.chunks_exact_mut(bytes_per_pixel) {
                    format.write_pixel(background, pixel);
                }
            }
        }

        buffer.image_rect(
            Rect::new(dest.x, dest.y + dy as i32, dest.width, 1),
            &row,
            0,
        )?;
    }

    Ok(failed)
}

/// Rectangle covered by a `width` x `height` bitmap at `origin`. Both far
/// edges must be representable as `i32` coordinates.
fn placement(origin: Point, width: u32, height: u32) -> Result<Rect> {
    let edge = |start: i32, extent: u32| {
        i32::try_from(extent)
            .ok()
            .and_then(|extent| start.checked_add(extent))
    };
    if edge(origin.x, width).is_none() || edge(origin.y, height).is_none() {
        bail!(
            "Bitmap of {}x{} at {:?} exceeds the coordinate range",
            width,
            height,
            origin
        );
    }
    Ok(Rect::new(origin.x, origin.y, width, height))
}

/// Renders one asset into a new buffer sized to the glyph plus margins.
pub fn render_asset(asset: &GlyphAsset, options: &RenderOptions) -> Result<ManagedPixelBuffer> {
    let descriptor = asset.descriptor();
    let mut bitmap = RlePaletteBitmap::new(&descriptor)
        .with_context(|| format!("Cannot decode glyph '{}'", asset.name))?;
    bitmap.set_selected(options.selected);

    let format = bitmap.pixel_format();
    let background = format.from_rgb888(options.background.0);
    let transparent = options.transparent.map(|color| format.from_rgb888(color.0));

    let (width, height) = match options.scale {
        Some(size) => (size.width, size.height),
        None => (bitmap.width(), bitmap.height()),
    };
    let margin = options.margin;
    let padded = |extent: u32| {
        margin
            .checked_mul(2)
            .and_then(|border| extent.checked_add(border))
            .filter(|&padded| i32::try_from(padded).is_ok())
    };
    let (Some(buffer_width), Some(buffer_height)) = (padded(width), padded(height)) else {
        bail!(
            "Glyph '{}' is too large to render: {}x{} with a {}px margin",
            asset.name,
            width,
            height,
            margin
        );
    };
    let mut buffer = ManagedPixelBuffer::new(buffer_width, buffer_height, format);
    buffer.fill_rect(Rect::from_size(buffer_width, buffer_height), background)?;

    let origin = Point::new(margin as i32, margin as i32);
    let failed = match options.scale {
        Some(size) => {
            let mut scaled = ScaledBitmap::new(bitmap, size.width, size.height, transparent)?;
            draw_bitmap(&mut scaled, &mut buffer, origin, background, transparent)?
        }
        None => draw_bitmap(&mut bitmap, &mut buffer, origin, background, transparent)?,
    };

    if failed > 0 {
        warn!("Glyph '{}': {} rows could not be decoded", asset.name, failed);
    }

    Ok(buffer)
}

/// Writes `buffer` as an RGBA PNG.
pub fn write_png(buffer: &ManagedPixelBuffer, path: &Path) -> Result<()> {
    let (width, height) = buffer.dimensions();
    let image = image::RgbaImage::from_raw(width, height, buffer.to_rgba8())
        .ok_or_else(|| anyhow!("Pixel data does not fill a {}x{} image", width, height))?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Loads, renders and writes one asset file. Returns the PNG path.
pub fn render_file(path: &Path, config: &Config) -> Result<PathBuf> {
    let asset = GlyphAsset::load(path)?;
    let buffer = render_asset(&asset, &RenderOptions::from(config))?;

    let name = if asset.name.is_empty() {
        "glyph"
    } else {
        asset.name.as_str()
    };
    let out = config.output.directory.join(format!("{name}.png"));
    write_png(&buffer, &out)?;

    debug!("Rendered {} -> {}", path.display(), out.display());
    Ok(out)
}

/// Outcome of rendering one asset file.
#[derive(Debug)]
pub struct RenderOutcome {
    pub asset: PathBuf,
    pub result: Result<PathBuf>,
}

/// Renders every asset in parallel.
///
/// Failures are logged and reported per asset; one bad asset does not stop
/// the others.
pub fn render_all(paths: &[PathBuf], config: &Config) -> Result<Vec<RenderOutcome>> {
    std::fs::create_dir_all(&config.output.directory).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output.directory.display()
        )
    })?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.render.parallelism)
        .build()
        .context("Failed to start render workers")?;
    info!(
        "Rendering {} assets on {} workers",
        paths.len(),
        pool.current_num_threads()
    );

    let outcomes: Vec<RenderOutcome> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = render_file(path, config);
                if let Err(e) = &result {
                    warn!("{}: {:#}", path.display(), e);
                }
                RenderOutcome {
                    asset: path.clone(),
                    result,
                }
            })
            .collect()
    });

    Ok(outcomes)
}
