//! Pipeline diagnostics: timing and counts for each stage.
//!
//! [`convert_with_diagnostics`] runs the same staged pipeline as
//! [`crate::convert`] while recording how long each stage took and
//! what it produced. Useful for choosing `pixel_size` and
//! `scale_factor` limits, since conversion cost grows with both.
//!
//! Time is read through the [`Clock`] trait so this crate stays free
//! of platform timing concerns; callers supply an implementation.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pipeline::{Pipeline, StagedResult};
use crate::types::{ConvertParams, Dimensions, PipelineError, RgbaImage};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic time for stage measurements.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: downscale.
    pub downscale: StageDiagnostics,
    /// Stage 2: quantize (only when `color_count > 0`).
    pub quantize: Option<StageDiagnostics>,
    /// Stage 3: upscale.
    pub upscale: StageDiagnostics,
    /// Total wall-clock duration of the conversion (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Downscale metrics.
    Downscale {
        /// Source dimensions.
        from: Dimensions,
        /// Downscaled dimensions.
        to: Dimensions,
    },
    /// Quantize metrics.
    Quantize {
        /// Requested color count.
        color_count: u32,
        /// Levels per RGB channel.
        levels_per_channel: u32,
        /// Distance between adjacent levels.
        step: u32,
        /// Colors the levels can produce (`levels^3`).
        palette_size: u64,
        /// Distinct RGBA values actually present after quantization.
        distinct_colors: usize,
    },
    /// Upscale metrics.
    Upscale {
        /// Block size.
        scale_factor: u32,
        /// Output dimensions.
        to: Dimensions,
    },
}

/// High-level summary of a conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source image dimensions.
    pub source: Dimensions,
    /// Downscaled ("pixel") grid dimensions.
    pub grid: Dimensions,
    /// Final output dimensions.
    pub output: Dimensions,
    /// Output pixel count.
    pub output_pixel_count: u64,
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {} -> grid {} -> output {} ({} pixels)",
            self.summary.source,
            self.summary.grid,
            self.summary.output,
            self.summary.output_pixel_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);

        let mut stages = vec![("Downscale", &self.downscale)];
        if let Some(ref q) = self.quantize {
            stages.push(("Quantize", q));
        }
        stages.push(("Upscale", &self.upscale));

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Downscale { from, to } => format!("{from} -> {to}"),
        StageMetrics::Quantize {
            color_count,
            levels_per_channel,
            step,
            palette_size,
            distinct_colors,
        } => format!(
            "colors={color_count} levels={levels_per_channel} step={step} \
             palette={palette_size} distinct={distinct_colors}"
        ),
        StageMetrics::Upscale { scale_factor, to } => format!("x{scale_factor} -> {to}"),
    }
}

/// Number of distinct RGBA values in `image`.
fn distinct_colors(image: &RgbaImage) -> usize {
    image.pixels().map(|p| p.0).collect::<HashSet<_>>().len()
}

/// Run the staged pipeline, measuring each stage with `clock`.
///
/// # Errors
///
/// Returns the same errors as [`crate::convert`].
pub fn convert_with_diagnostics<C: Clock>(
    source: &RgbaImage,
    params: ConvertParams,
    clock: &C,
) -> Result<(StagedResult, PipelineDiagnostics), PipelineError> {
    let total_start = clock.now();

    let pending = Pipeline::new(source, params);
    let from = Dimensions::of(pending.source());

    let start = clock.now();
    let downscaled = pending.downscale()?;
    let downscale = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Downscale {
            from,
            to: Dimensions::of(downscaled.downscaled()),
        },
    };

    let start = clock.now();
    let quantized = downscaled.quantize();
    let quantize_duration = clock.elapsed(&start);
    let quantize = quantized
        .levels()
        .zip(quantized.quantized())
        .map(|(levels, image)| StageDiagnostics {
            duration: quantize_duration,
            metrics: StageMetrics::Quantize {
                color_count: params.color_count,
                levels_per_channel: levels.levels_per_channel,
                step: levels.step,
                palette_size: levels.palette_size(),
                distinct_colors: distinct_colors(image),
            },
        });

    let start = clock.now();
    let staged = quantized.upscale()?.into_result();
    let output = staged.output_dimensions();
    let upscale = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Upscale {
            scale_factor: params.scale_factor,
            to: output,
        },
    };

    let diagnostics = PipelineDiagnostics {
        downscale,
        quantize,
        upscale,
        total_duration: clock.elapsed(&total_start),
        summary: PipelineSummary {
            source: staged.source,
            grid: Dimensions::of(&staged.downscaled),
            output,
            output_pixel_count: output.pixel_count(),
        },
    };

    Ok((staged, diagnostics))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::cell::Cell;

    use image::Rgba;

    use super::*;

    /// Clock that advances one millisecond per reading.
    struct TickingClock {
        ticks: Cell<u64>,
    }

    impl TickingClock {
        const fn new() -> Self {
            Self {
                ticks: Cell::new(0),
            }
        }
    }

    impl Clock for TickingClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.ticks.get() + 1;
            self.ticks.set(t);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.now() - since)
        }
    }

    fn photo() -> RgbaImage {
        RgbaImage::from_fn(100, 50, |x, y| {
            let r = u8::try_from(x * 2).unwrap_or(255);
            let g = u8::try_from(y * 5).unwrap_or(255);
            Rgba([r, g, 90, 255])
        })
    }

    #[test]
    fn records_every_stage() {
        let (staged, diag) =
            convert_with_diagnostics(&photo(), ConvertParams::new(50, 4, 8), &TickingClock::new())
                .unwrap();

        assert_eq!(staged.output.dimensions(), (200, 100));
        assert_eq!(
            diag.summary.grid,
            Dimensions {
                width: 50,
                height: 25
            }
        );
        assert_eq!(diag.summary.output_pixel_count, 20_000);
        assert!(matches!(
            diag.downscale.metrics,
            StageMetrics::Downscale { from, .. } if from == (Dimensions { width: 100, height: 50 })
        ));

        let Some(StageDiagnostics {
            metrics:
                StageMetrics::Quantize {
                    levels_per_channel,
                    step,
                    palette_size,
                    distinct_colors,
                    ..
                },
            ..
        }) = diag.quantize
        else {
            panic!("expected quantize diagnostics, got {:?}", diag.quantize);
        };
        assert_eq!(levels_per_channel, 2);
        assert_eq!(step, 255);
        assert_eq!(palette_size, 8);
        assert!(distinct_colors <= 8);

        assert!(diag.total_duration >= diag.downscale.duration + diag.upscale.duration);
    }

    #[test]
    fn quantize_is_absent_when_disabled() {
        let (_, diag) =
            convert_with_diagnostics(&photo(), ConvertParams::new(20, 2, 0), &TickingClock::new())
                .unwrap();
        assert!(diag.quantize.is_none());
        assert!(!diag.report().contains("Quantize"));
    }

    #[test]
    fn report_lists_stages() {
        let (_, diag) =
            convert_with_diagnostics(&photo(), ConvertParams::new(50, 4, 16), &TickingClock::new())
                .unwrap();
        let report = diag.report();
        assert!(report.contains("Downscale"));
        assert!(report.contains("Quantize"));
        assert!(report.contains("Upscale"));
        assert!(report.contains("100x50 -> grid 50x25 -> output 200x100"));
    }

    #[test]
    fn diagnostics_serialize_to_json() {
        let (_, diag) =
            convert_with_diagnostics(&photo(), ConvertParams::new(10, 3, 9), &TickingClock::new())
                .unwrap();
        let json = serde_json::to_value(&diag).unwrap();
        assert!(json["total_duration"].is_f64());
        assert_eq!(json["summary"]["output"]["width"], 30);
    }

    #[test]
    fn errors_propagate() {
        let result =
            convert_with_diagnostics(&photo(), ConvertParams::new(0, 3, 9), &TickingClock::new());
        assert!(matches!(
            result,
            Err(PipelineError::InvalidTargetWidth { .. })
        ));
    }
}
