//! pixgrid: convert an image file into pixel art.
//!
//! Loads a PNG or JPEG, downscales it to `--size` pixels wide, reduces
//! its colors, enlarges it by `--scale` into hard-edged blocks, and
//! writes the result in the format named by the output extension.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin pixgrid -- -i photo.jpg -o art.png --size 48 --colors 24
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use pixgrid_export::OutputFormat;
use pixgrid_pipeline::diagnostics::{Clock, PipelineDiagnostics};
use pixgrid_pipeline::{ConvertParams, Dimensions};

/// Turn a photograph into blocky, color-reduced pixel art.
#[derive(Parser)]
#[command(name = "pixgrid", version)]
struct Cli {
    /// Input image file (PNG or JPEG).
    #[arg(short, long)]
    input: PathBuf,

    /// Output image file; `.png`, `.jpg` or `.jpeg` selects the format.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Target width in pixels before upscaling (height follows the
    /// aspect ratio). Limited to the input width.
    #[arg(long, default_value_t = ConvertParams::DEFAULT_PIXEL_SIZE, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    size: u32,

    /// Upscale factor: each downscaled pixel becomes a SCALE x SCALE block.
    #[arg(long, default_value_t = ConvertParams::DEFAULT_SCALE_FACTOR, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    scale: u32,

    /// Color reduction strength (0 disables quantization).
    #[arg(long, default_value_t = DEFAULT_COLORS)]
    colors: u32,

    /// Print a per-stage timing report.
    #[arg(long)]
    report: bool,

    /// Print per-stage diagnostics as JSON (implies --report).
    #[arg(long)]
    json: bool,
}

/// Colors used when `--colors` is not given.
const DEFAULT_COLORS: u32 = 16;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {msg}");
            ExitCode::FAILURE
        }
    }
}

/// Convert `cli.input` into `cli.output`, reporting progress on stderr.
fn run(cli: &Cli) -> Result<(), String> {
    // Reject the output name before doing any work.
    let format = OutputFormat::from_path(&cli.output).map_err(|e| e.to_string())?;

    let bytes = std::fs::read(&cli.input)
        .map_err(|e| format!("could not read {}: {e}", cli.input.display()))?;
    let source = pixgrid_pipeline::decode(&bytes)
        .map_err(|e| format!("could not load {}: {e}", cli.input.display()))?;
    eprintln!("Loaded image: {} pixels", Dimensions::of(&source));

    let params = params_for(cli, source.width());
    if params.pixel_size < cli.size {
        eprintln!(
            "Size {} exceeds the image width; using {}",
            cli.size, params.pixel_size
        );
    }

    let (staged, diagnostics) =
        pixgrid_pipeline::convert_with_diagnostics(&source, params, &StdClock)
            .map_err(|e| format!("conversion failed: {e}"))?;

    eprintln!(
        "Downscaled to: {} pixels",
        Dimensions::of(&staged.downscaled)
    );
    if params.quantizes() {
        eprintln!("Reduced to {} colors", params.color_count);
    }
    eprintln!("Upscaled to: {} pixels", staged.output_dimensions());

    let encoded = pixgrid_export::encode(&staged.output, format).map_err(|e| e.to_string())?;
    write_output(&cli.output, &encoded)?;
    eprintln!("Saved to: {}", cli.output.display());

    if cli.json || cli.report {
        print_diagnostics(&diagnostics, cli.json)?;
    }

    Ok(())
}

/// Conversion parameters from the command line, with the target width
/// limited to the source width.
fn params_for(cli: &Cli, source_width: u32) -> ConvertParams {
    ConvertParams::new(cli.size, cli.scale, cli.colors).clamp_pixel_size(source_width)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), String> {
    std::fs::write(path, bytes).map_err(|e| format!("could not write {}: {e}", path.display()))
}

fn print_diagnostics(diagnostics: &PipelineDiagnostics, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(diagnostics)
            .map_err(|e| format!("could not serialize diagnostics: {e}"))?;
        println!("{text}");
    } else {
        println!("{}", diagnostics.report());
    }
    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;
    use image::Rgba;
    use pixgrid_pipeline::RgbaImage;

    use super::*;

    /// Unique scratch path under the system temp directory.
    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pixgrid-cli-{}-{name}", std::process::id()))
    }

    fn write_photo(path: &Path, w: u32, h: u32) {
        let img = RgbaImage::from_fn(w, h, |x, y| {
            let r = u8::try_from(x % 256).unwrap_or(255);
            let g = u8::try_from(y % 256).unwrap_or(255);
            Rgba([r, g, 40, 255])
        });
        std::fs::write(path, pixgrid_export::encode_png(&img).unwrap()).unwrap();
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["pixgrid", "-i", "in.png"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("output.png"));
        assert_eq!(cli.size, 64);
        assert_eq!(cli.scale, 8);
        assert_eq!(cli.colors, 16);
        assert!(!cli.report);
        assert!(!cli.json);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["pixgrid"]).is_err());
    }

    #[test]
    fn zero_size_and_scale_are_rejected() {
        assert!(Cli::try_parse_from(["pixgrid", "-i", "a.png", "--size", "0"]).is_err());
        assert!(Cli::try_parse_from(["pixgrid", "-i", "a.png", "--scale", "0"]).is_err());
    }

    #[test]
    fn zero_colors_is_allowed() {
        let cli = Cli::try_parse_from(["pixgrid", "-i", "a.png", "--colors", "0"]).unwrap();
        assert_eq!(cli.colors, 0);
    }

    #[test]
    fn size_is_limited_to_source_width() {
        let cli = Cli::try_parse_from(["pixgrid", "-i", "a.png", "--size", "500"]).unwrap();
        assert_eq!(params_for(&cli, 120).pixel_size, 120);
        assert_eq!(params_for(&cli, 800).pixel_size, 500);
    }

    #[test]
    fn converts_a_file() {
        let input = scratch("in.png");
        let output = scratch("out.png");
        write_photo(&input, 80, 40);

        let cli = Cli::try_parse_from([
            OsStr::new("pixgrid"),
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
            OsStr::new("--size"),
            OsStr::new("20"),
            OsStr::new("--scale"),
            OsStr::new("3"),
        ])
        .unwrap();
        run(&cli).unwrap();

        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (60, 30));

        std::fs::remove_file(input).unwrap();
        std::fs::remove_file(output).unwrap();
    }

    #[test]
    fn unsupported_output_fails_before_reading_input() {
        let cli = Cli::try_parse_from(["pixgrid", "-i", "does-not-exist.png", "-o", "out.gif"])
            .unwrap();
        let err = run(&cli).unwrap_err();
        assert!(err.contains("unsupported output format"), "{err}");
    }

    #[test]
    fn oversized_output_is_an_error() {
        let input = scratch("huge-in.png");
        let output = scratch("huge-out.png");
        write_photo(&input, 64, 32);

        let cli = Cli::try_parse_from([
            OsStr::new("pixgrid"),
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
            OsStr::new("--scale"),
            OsStr::new("60000000"),
        ])
        .unwrap();
        let err = run(&cli).unwrap_err();
        assert!(err.contains("conversion failed"), "{err}");
        assert!(!output.exists());

        std::fs::remove_file(input).unwrap();
    }

    #[test]
    fn missing_input_is_reported() {
        let output = scratch("never.png");
        let cli = Cli::try_parse_from([
            OsStr::new("pixgrid"),
            OsStr::new("-i"),
            OsStr::new("does-not-exist.png"),
            OsStr::new("-o"),
            output.as_os_str(),
        ])
        .unwrap();
        let err = run(&cli).unwrap_err();
        assert!(err.contains("does-not-exist.png"), "{err}");
        assert!(!output.exists());
    }
}
