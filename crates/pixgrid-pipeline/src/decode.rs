//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG) and produces an RGBA image,
//! the unit every pipeline stage consumes.

use crate::types::{PipelineError, RgbaImage};

/// Decode raw image bytes into RGBA.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
#[must_use = "returns the decoded image"]
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.into_rgba8())
}
