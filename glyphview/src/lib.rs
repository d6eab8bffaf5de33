//! glyphview: decode RLE palette glyph assets and write PNG previews.
//!
//! The binary is a thin wrapper over this library:
//!
//! - [`args`]: command-line flags
//! - [`config`]: TOML configuration, defaults and validation
//! - [`render`]: drawing glyphs into pixel buffers and writing PNGs

pub mod args;
pub mod config;
pub mod render;

pub use config::{Config, ConfigError};
pub use render::{render_all, render_asset, RenderOptions, RenderOutcome};
