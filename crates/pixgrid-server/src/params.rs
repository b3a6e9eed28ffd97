//! Conversion request parameters and the defaults applied to them.
//!
//! Clients send signed integers. Zero or negative `size` and `scale`
//! fall back to the conventional defaults; negative `colors` means the
//! same as zero (no quantization). The pipeline itself never sees an
//! unresolved value.

use pixgrid_pipeline::downscale::target_dimensions;
use pixgrid_pipeline::{ConvertParams, Dimensions};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::Limits;

/// Body of `/api/convert` and `/api/download`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    /// Id returned by `/api/upload`.
    pub session_id: String,
    /// Downscaled width; `<= 0` selects the default.
    #[serde(default)]
    pub size: i64,
    /// Block size; `<= 0` selects the default.
    #[serde(default)]
    pub scale: i64,
    /// Color reduction strength; `<= 0` disables quantization.
    #[serde(default)]
    pub colors: i64,
}

impl ConvertRequest {
    /// Turn raw request values into pipeline parameters for `source`.
    ///
    /// A `size` wider than the source is narrowed to the source width.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`] if `size` exceeds
    /// `limits.max_pixel_size` or the longest side of the output would
    /// exceed `limits.max_output_side`, and [`ApiError::Pipeline`] if
    /// the source cannot be downscaled to the requested width.
    pub fn resolve(&self, source: Dimensions, limits: &Limits) -> Result<ConvertParams, ApiError> {
        let size = if self.size <= 0 {
            ConvertParams::DEFAULT_PIXEL_SIZE
        } else {
            u32::try_from(self.size)
                .ok()
                .filter(|&s| s <= limits.max_pixel_size)
                .ok_or_else(|| {
                    ApiError::BadRequest(format!(
                        "size {} exceeds the maximum of {}",
                        self.size, limits.max_pixel_size
                    ))
                })?
        };

        let scale = if self.scale <= 0 {
            u64::from(ConvertParams::DEFAULT_SCALE_FACTOR)
        } else {
            self.scale.unsigned_abs()
        };

        let colors = u32::try_from(self.colors.max(0)).unwrap_or(u32::MAX);

        let size = size.min(source.width);
        let grid = target_dimensions(source, size)?;
        let longest = u64::from(grid.width.max(grid.height)).saturating_mul(scale);
        if longest > u64::from(limits.max_output_side) {
            return Err(ApiError::BadRequest(format!(
                "output side of {longest} pixels exceeds the maximum of {}",
                limits.max_output_side
            )));
        }
        // longest <= max_output_side and grid sides are >= 1, so scale fits.
        let scale = u32::try_from(scale).unwrap_or(u32::MAX);

        Ok(ConvertParams::new(size, scale, colors))
    }
}
