//! pixgrid-export: Pure image encoders (sans-IO)
//!
//! Turns converted images into bytes. Supports PNG and JPEG files
//! chosen by output extension, plus PNG data URLs for inline previews.

pub mod format;
pub mod raster;

pub use format::{ExportError, OutputFormat};
pub use raster::{JPEG_QUALITY, encode, encode_png, png_data_url};
