//! Raster encoders.
//!
//! Pure functions from an RGBA image to encoded bytes. Nothing here
//! touches the filesystem.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use pixgrid_pipeline::RgbaImage;

use crate::format::{ExportError, OutputFormat};

/// JPEG quality used for `.jpg`/`.jpeg` output.
pub const JPEG_QUALITY: u8 = 95;

/// Encode `image` in `format`.
///
/// JPEG has no alpha channel, so alpha is dropped (not composited)
/// before encoding.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the encoder fails.
pub fn encode(image: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        OutputFormat::Png => encode_png(image),
        OutputFormat::Jpeg => encode_jpeg(image),
    }
}

/// Encode `image` as PNG.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the encoder fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}

fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

/// Encode `image` as a `data:image/png;base64,...` URL.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if PNG encoding fails.
pub fn png_data_url(image: &RgbaImage) -> Result<String, ExportError> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
