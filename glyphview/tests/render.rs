//! End-to-end rendering of the bundled assets to PNG.

use glyph_bitmap::GlyphAsset;
use glyphview::config::{Config, Rgb, Size};
use glyphview::{render_all, render_asset, RenderOptions};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn asset_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("assets")
        .join(name)
}

#[test]
fn test_bundled_assets_load() {
    for name in ["arrow.toml", "checker.toml"] {
        let asset = GlyphAsset::load(asset_path(name)).unwrap();
        assert!(asset.descriptor().validate().is_ok(), "{name} is malformed");
    }
    let config = Config::from_file(asset_path("glyphview.toml")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.output.margin, 2);
}

#[test]
fn test_render_all_writes_pngs() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::builder()
        .directory(dir.path())
        .background(Rgb([0x00, 0x00, 0x00]))
        .transparent(Rgb([0xFF, 0x00, 0xFF]))
        .margin(1)
        .parallelism(2)
        .build()
        .unwrap();

    let paths = vec![asset_path("arrow.toml"), asset_path("checker.toml")];
    let outcomes = render_all(&paths, &config).unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.result.is_ok()));

    let checker = image::open(dir.path().join("checker.png")).unwrap().to_rgba8();
    assert_eq!(checker.dimensions(), (6, 6));
    // Margin and transparent pixels both show the background
    assert_eq!(checker.get_pixel(0, 0).0, [0x00, 0x00, 0x00, 0xFF]);
    assert_eq!(checker.get_pixel(3, 1).0, [0x00, 0x00, 0x00, 0xFF]);
    assert_eq!(checker.get_pixel(1, 1).0, [0x00, 0x00, 0xFF, 0xFF]);
    assert_eq!(checker.get_pixel(4, 4).0, [0x00, 0xFF, 0x00, 0xFF]);

    let arrow = image::open(dir.path().join("arrow.png")).unwrap().to_rgba8();
    assert_eq!(arrow.dimensions(), (7, 7));
    assert_eq!(arrow.get_pixel(0, 0).0, [0x00, 0x00, 0x00, 0xFF]);
    assert_eq!(arrow.get_pixel(3, 1).0, [0x00, 0x00, 0x00, 0xFF]);
    assert_eq!(arrow.get_pixel(1, 1).0, [0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_render_all_reports_bad_asset() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.toml");
    std::fs::write(
        &broken,
        "bits_per_pixel = 8\ncolor_format = \"grey8\"\nwidth = 2\nheight = 1\nnormal = [0]\nruns = [[3, 0]]\n",
    )
    .unwrap();

    let config = Config::builder().directory(dir.path()).build().unwrap();
    let outcomes = render_all(&[broken, asset_path("arrow.toml")], &config).unwrap();

    assert!(outcomes[0].result.is_err());
    assert!(outcomes[1].result.is_ok());
}

#[test]
fn test_selected_and_scaled_render() {
    let asset = GlyphAsset::load(asset_path("arrow.toml")).unwrap();
    let options = RenderOptions {
        selected: true,
        scale: Some(Size {
            width: 10,
            height: 10,
        }),
        ..RenderOptions::default()
    };

    let buffer = render_asset(&asset, &options).unwrap();
    assert_eq!(buffer.dimensions(), (10, 10));
    // Arrow shaft in the selected palette
    assert_eq!(buffer.pixel(4, 9), Some(0x3F));
    assert_eq!(buffer.pixel(0, 0), Some(0xFF));
}
