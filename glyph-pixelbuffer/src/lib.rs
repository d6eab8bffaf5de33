//! Pixel formats and frame buffers for decoded glyphs.
//!
//! This crate provides the output side of glyph decoding: [`PixelFormat`]
//! describes how a palette value is packed into bytes, and
//! [`ManagedPixelBuffer`] is an owned image that decoded rows are copied into.

pub mod format;
pub mod managed;

pub use format::{ColorFormat, FormatError, PixelFormat};
pub use managed::ManagedPixelBuffer;
