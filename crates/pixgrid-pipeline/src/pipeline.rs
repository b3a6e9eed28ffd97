//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::convert`] which runs the whole conversion in one
//! call, [`Pipeline`] lets the caller drive execution one step at a time:
//!
//! ```rust
//! # use pixgrid_pipeline::{ConvertParams, Pipeline, PipelineError, RgbaImage};
//! # fn run(source: &RgbaImage) -> Result<(), PipelineError> {
//! let params = ConvertParams::new(64, 8, 16);
//! let staged = Pipeline::new(source, params)
//!     .downscale()?
//!     .quantize()
//!     .upscale()?
//!     .into_result();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline
//! state (or `Result` for fallible stages). The type system only
//! allows the stages to run in order: downscale, then the optional
//! quantize, then upscale. Quantizing before downscaling would sample
//! different pixels and is not expressible.

use crate::quantize::{QuantizeLevels, quantize_colors};
use crate::types::{ConvertParams, Dimensions, PipelineError, RgbaImage};

/// Entry point for the staged pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Start a conversion of `source` with `params`.
    ///
    /// Nothing is computed until [`Pending::downscale`] is called.
    pub const fn new(source: &RgbaImage, params: ConvertParams) -> Pending<'_> {
        Pending { params, source }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing; call .downscale() to continue"]
pub struct Pending<'a> {
    params: ConvertParams,
    source: &'a RgbaImage,
}

impl Pending<'_> {
    /// The source image.
    #[must_use]
    pub const fn source(&self) -> &RgbaImage {
        self.source
    }

    /// Downscale to `params.pixel_size` and advance to [`Downscaled`].
    ///
    /// # Errors
    ///
    /// Propagates the downscale stage's parameter checks; see
    /// [`crate::downscale::downscale`].
    pub fn downscale(self) -> Result<Downscaled, PipelineError> {
        let downscaled = crate::downscale::downscale(self.source, self.params.pixel_size)?;
        Ok(Downscaled {
            params: self.params,
            source: Dimensions::of(self.source),
            downscaled,
        })
    }
}

// ───────────────────────── Stage 1: Downscaled ───────────────────────

/// Pipeline state after downscaling to the target width.
#[must_use = "pipeline stages are consumed by advancing; call .quantize() to continue"]
pub struct Downscaled {
    params: ConvertParams,
    source: Dimensions,
    downscaled: RgbaImage,
}

impl Downscaled {
    /// The downscaled image.
    #[must_use]
    pub const fn downscaled(&self) -> &RgbaImage {
        &self.downscaled
    }

    /// Apply color quantization, or pass through when
    /// `params.color_count` is zero.
    pub fn quantize(self) -> Quantized {
        let quantized = self
            .params
            .quantizes()
            .then(|| quantize_colors(&self.downscaled, self.params.color_count));
        Quantized {
            params: self.params,
            source: self.source,
            downscaled: self.downscaled,
            quantized,
        }
    }
}

// ───────────────────────── Stage 2: Quantized ────────────────────────

/// Pipeline state after the (optional) quantize stage.
#[must_use = "pipeline stages are consumed by advancing; call .upscale() to continue"]
pub struct Quantized {
    params: ConvertParams,
    source: Dimensions,
    downscaled: RgbaImage,
    quantized: Option<RgbaImage>,
}

impl Quantized {
    /// The quantized image, `None` when quantization was disabled.
    #[must_use]
    pub const fn quantized(&self) -> Option<&RgbaImage> {
        self.quantized.as_ref()
    }

    /// Levels used by the quantize stage, `None` when disabled.
    #[must_use]
    pub fn levels(&self) -> Option<QuantizeLevels> {
        QuantizeLevels::for_color_count(self.params.color_count)
    }

    /// The image the upscale stage will enlarge.
    #[must_use]
    pub fn small(&self) -> &RgbaImage {
        self.quantized.as_ref().unwrap_or(&self.downscaled)
    }

    /// Block-upscale by `params.scale_factor` and advance to [`Upscaled`].
    ///
    /// # Errors
    ///
    /// Propagates the upscale stage's parameter checks; see
    /// [`crate::upscale::upscale_nearest`].
    pub fn upscale(self) -> Result<Upscaled, PipelineError> {
        let output = crate::upscale::upscale_nearest(self.small(), self.params.scale_factor)?;
        Ok(Upscaled {
            result: StagedResult {
                params: self.params,
                source: self.source,
                downscaled: self.downscaled,
                quantized: self.quantized,
                output,
            },
        })
    }
}

// ───────────────────────── Stage 3: Upscaled ─────────────────────────

/// Terminal pipeline state.
#[must_use = "call .into_result() or .into_output() to take the converted image"]
pub struct Upscaled {
    result: StagedResult,
}

impl Upscaled {
    /// The final converted image.
    #[must_use]
    pub const fn output(&self) -> &RgbaImage {
        &self.result.output
    }

    /// Take every intermediate.
    #[must_use]
    pub fn into_result(self) -> StagedResult {
        self.result
    }

    /// Take only the final image, dropping intermediates.
    #[must_use]
    pub fn into_output(self) -> RgbaImage {
        self.result.output
    }
}

/// Result of a conversion with every intermediate stage output preserved.
#[derive(Debug, Clone)]
pub struct StagedResult {
    /// Parameters the conversion ran with.
    pub params: ConvertParams,
    /// Source image dimensions.
    pub source: Dimensions,
    /// Stage 1: downscaled image.
    pub downscaled: RgbaImage,
    /// Stage 2: quantized image (`None` when `color_count == 0`).
    pub quantized: Option<RgbaImage>,
    /// Stage 3: block-upscaled output.
    pub output: RgbaImage,
}

impl StagedResult {
    /// Dimensions of the final output.
    #[must_use]
    pub fn output_dimensions(&self) -> Dimensions {
        Dimensions::of(&self.output)
    }
}
