//! Shared types for the pixgrid conversion pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can pass images through
/// the pipeline without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing image.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parameters for a single conversion.
///
/// These are request-scoped and never stored alongside the source
/// image. The pipeline does not substitute defaults: a zero
/// `pixel_size` or `scale_factor` is rejected by the stage that
/// consumes it. Callers apply their own defaulting policy before
/// building the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertParams {
    /// Target width of the downscaled image, before upscaling.
    /// Height follows from the source aspect ratio.
    pub pixel_size: u32,

    /// Block size of the final nearest-neighbor upscale.
    pub scale_factor: u32,

    /// Coarse color reduction knob. `0` disables quantization.
    ///
    /// This is not an exact palette size; see
    /// [`QuantizeLevels`](crate::quantize::QuantizeLevels).
    pub color_count: u32,
}

impl ConvertParams {
    /// Conventional target width used when a caller supplies none.
    pub const DEFAULT_PIXEL_SIZE: u32 = 64;

    /// Conventional upscale factor used when a caller supplies none.
    pub const DEFAULT_SCALE_FACTOR: u32 = 8;

    /// Bundle conversion parameters.
    #[must_use]
    pub const fn new(pixel_size: u32, scale_factor: u32, color_count: u32) -> Self {
        Self {
            pixel_size,
            scale_factor,
            color_count,
        }
    }

    /// Limit `pixel_size` to the source width so the downscale stage is
    /// never asked to enlarge.
    #[must_use]
    pub fn clamp_pixel_size(self, source_width: u32) -> Self {
        Self {
            pixel_size: self.pixel_size.min(source_width),
            ..self
        }
    }

    /// Whether the quantize stage will run for these parameters.
    #[must_use]
    pub const fn quantizes(&self) -> bool {
        self.color_count > 0
    }
}

/// A stage of the conversion pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Aspect-preserving nearest-neighbor downscale.
    Downscale,
    /// Per-channel color level reduction.
    Quantize,
    /// Integer block upscale.
    Upscale,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downscale => f.write_str("downscale"),
            Self::Quantize => f.write_str("quantize"),
            Self::Upscale => f.write_str("upscale"),
        }
    }
}

/// Errors that can occur while decoding or converting an image.
///
/// A failing stage abandons the whole conversion; no partially
/// converted image is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The source image has no pixels.
    #[error("source image has zero width or height")]
    EmptyImage,

    /// Downscale target width is zero or wider than the source.
    #[error("target width {target_width} must be between 1 and the source width {source_width}")]
    InvalidTargetWidth {
        /// Requested target width.
        target_width: u32,
        /// Width of the source image.
        source_width: u32,
    },

    /// Preserving the aspect ratio at the target width leaves no rows.
    #[error("target width {target_width} leaves no rows for a {source_dimensions} source")]
    DegenerateHeight {
        /// Requested target width.
        target_width: u32,
        /// Dimensions of the source image.
        source_dimensions: Dimensions,
    },

    /// Upscale factor is zero.
    #[error("scale factor must be at least 1, got {0}")]
    InvalidScaleFactor(u32),

    /// Output dimensions do not fit in `u32`.
    #[error("{stage} output dimensions overflow")]
    DimensionOverflow {
        /// Stage that computed the dimensions.
        stage: Stage,
    },
}

impl PipelineError {
    /// The stage that rejected its input, if the failure came from one.
    ///
    /// Decode failures happen before any stage runs and return `None`.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::ImageDecode(_) | Self::EmptyInput => None,
            Self::EmptyImage | Self::InvalidTargetWidth { .. } | Self::DegenerateHeight { .. } => {
                Some(Stage::Downscale)
            }
            Self::InvalidScaleFactor(_) => Some(Stage::Upscale),
            Self::DimensionOverflow { stage } => Some(*stage),
        }
    }
}
