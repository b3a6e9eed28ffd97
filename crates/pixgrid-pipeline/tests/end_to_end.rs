//! Integration test: decode an encoded photo and run it through every stage.

#![allow(clippy::unwrap_used)]

use image::Rgba;
use pixgrid_pipeline::{ConvertParams, Pipeline, RgbaImage, convert, decode};

fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )
    .unwrap();
    buf
}

/// Smooth two-axis gradient, so every stage has something to change.
fn photo() -> RgbaImage {
    RgbaImage::from_fn(100, 50, |x, y| {
        let r = u8::try_from(x * 255 / 99).unwrap_or(255);
        let g = u8::try_from(y * 255 / 49).unwrap_or(255);
        let b = u8::try_from((x + y) * 255 / 148).unwrap_or(255);
        Rgba([r, g, b, 255])
    })
}

#[test]
fn hundred_by_fifty_to_eight_color_blocks() {
    let bytes = encode_png(&photo());
    let source = decode(&bytes).unwrap();
    assert_eq!(source.dimensions(), (100, 50));

    let staged = Pipeline::new(&source, ConvertParams::new(50, 4, 8))
        .downscale()
        .unwrap()
        .quantize()
        .upscale()
        .unwrap()
        .into_result();

    assert_eq!(staged.downscaled.dimensions(), (50, 25));
    let output = &staged.output;
    assert_eq!(output.dimensions(), (200, 100));

    let mut palette = std::collections::HashSet::new();
    for by in 0..25 {
        for bx in 0..50 {
            let anchor = *output.get_pixel(bx * 4, by * 4);
            for dy in 0..4 {
                for dx in 0..4 {
                    assert_eq!(*output.get_pixel(bx * 4 + dx, by * 4 + dy), anchor);
                }
            }
            assert!(anchor.0[..3].iter().all(|&c| c == 0 || c == 255));
            assert_eq!(anchor.0[3], 255);
            palette.insert(anchor.0);
        }
    }
    assert!(palette.len() <= 8);
    assert!(palette.len() > 1);
}

#[test]
fn one_call_form_matches_staged_output() {
    let source = photo();
    let params = ConvertParams::new(33, 3, 27);
    let staged = Pipeline::new(&source, params)
        .downscale()
        .unwrap()
        .quantize()
        .upscale()
        .unwrap()
        .into_output();
    assert_eq!(convert(&source, &params).unwrap(), staged);
}

#[test]
fn conversion_is_deterministic() {
    let source = photo();
    let params = ConvertParams::new(20, 5, 16);
    assert_eq!(
        convert(&source, &params).unwrap(),
        convert(&source, &params).unwrap()
    );
}
