//! pixgrid-pipeline: Pure pixel-art conversion pipeline (sans-IO).
//!
//! Converts an RGBA image into blocky, color-reduced pixel art through:
//! downscale -> optional quantize -> upscale.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! images and byte slices. File handling lives in the CLI, image
//! encoding in `pixgrid-export`, and session storage in
//! `pixgrid-session`.

pub mod decode;
pub mod diagnostics;
pub mod downscale;
pub mod pipeline;
pub mod quantize;
pub mod types;
pub mod upscale;

pub use decode::decode;
pub use diagnostics::{Clock, PipelineDiagnostics, convert_with_diagnostics};
pub use pipeline::{Pipeline, StagedResult};
pub use quantize::QuantizeLevels;
pub use types::{ConvertParams, Dimensions, PipelineError, RgbaImage, Stage};

/// Run the full conversion pipeline.
///
/// # Pipeline steps
///
/// 1. Downscale to `params.pixel_size` wide, preserving aspect ratio,
///    by center-sampled nearest neighbor
/// 2. Reduce each RGB channel to evenly spaced levels (skipped when
///    `params.color_count` is zero)
/// 3. Enlarge by `params.scale_factor` into solid square blocks
///
/// The source is never modified. The output measures
/// `pixel_size * scale_factor` by
/// `floor(height * pixel_size / width) * scale_factor`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidTargetWidth`] if `pixel_size` is zero
/// or wider than the source, [`PipelineError::DegenerateHeight`] if the
/// downscaled image would have no rows, [`PipelineError::InvalidScaleFactor`]
/// if `scale_factor` is zero, and [`PipelineError::DimensionOverflow`] if
/// the output dimensions do not fit in `u32`.
pub fn convert(source: &RgbaImage, params: &ConvertParams) -> Result<RgbaImage, PipelineError> {
    Ok(Pipeline::new(source, *params)
        .downscale()?
        .quantize()
        .upscale()?
        .into_output())
}
