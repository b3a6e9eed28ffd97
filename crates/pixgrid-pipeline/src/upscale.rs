//! Integer nearest-neighbor upscale.
//!
//! Every source pixel becomes a `scale_factor x scale_factor` block of
//! identical pixels. This is what gives the output its hard-edged
//! "pixel" look.

use crate::types::{Dimensions, PipelineError, RgbaImage, Stage};

/// Enlarge `image` by `scale_factor` in both axes.
///
/// Destination `(x, y)` copies source `(x / scale_factor, y / scale_factor)`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidScaleFactor`] if `scale_factor` is
/// zero and [`PipelineError::DimensionOverflow`] if the enlarged
/// dimensions do not fit in `u32` or the RGBA buffer they need is
/// larger than the address space.
pub fn upscale_nearest(image: &RgbaImage, scale_factor: u32) -> Result<RgbaImage, PipelineError> {
    if scale_factor == 0 {
        return Err(PipelineError::InvalidScaleFactor(scale_factor));
    }

    let source = Dimensions::of(image);
    let overflow = || PipelineError::DimensionOverflow {
        stage: Stage::Upscale,
    };
    let width = source.width.checked_mul(scale_factor).ok_or_else(overflow)?;
    let height = source.height.checked_mul(scale_factor).ok_or_else(overflow)?;
    u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(4))
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(overflow)?;

    Ok(RgbaImage::from_fn(width, height, |x, y| {
        *image.get_pixel(x / scale_factor, y / scale_factor)
    }))
}
