//! Aspect-preserving nearest-neighbor downscale.
//!
//! Reduces the source image to a fixed target width. The target height
//! follows from the source aspect ratio with integer truncation, so it
//! can fall short of the exact ratio by a fraction of a pixel.
//!
//! Each destination pixel copies exactly one source pixel: the one
//! under the *center* of the source region that the destination cell
//! covers. No blending is performed, which keeps edges crisp once the
//! result is block-upscaled.
//!
//! The stage is only defined for shrinking (or keeping) the width.
//! Requests wider than the source are rejected rather than upscaled.

use crate::types::{Dimensions, PipelineError, RgbaImage};

/// Dimensions produced by downscaling `source` to `target_width`.
///
/// `height = floor(source.height * target_width / source.width)`.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyImage`] if the source has no pixels,
/// [`PipelineError::InvalidTargetWidth`] if `target_width` is zero or
/// exceeds the source width, and [`PipelineError::DegenerateHeight`]
/// if the truncated height is zero.
pub fn target_dimensions(source: Dimensions, target_width: u32) -> Result<Dimensions, PipelineError> {
    if source.width == 0 || source.height == 0 {
        return Err(PipelineError::EmptyImage);
    }
    if target_width == 0 || target_width > source.width {
        return Err(PipelineError::InvalidTargetWidth {
            target_width,
            source_width: source.width,
        });
    }

    let height = u64::from(source.height) * u64::from(target_width) / u64::from(source.width);
    // target_width <= source.width, so height <= source.height fits in u32.
    #[allow(clippy::cast_possible_truncation)]
    let height = height as u32;
    if height == 0 {
        return Err(PipelineError::DegenerateHeight {
            target_width,
            source_dimensions: source,
        });
    }

    Ok(Dimensions {
        width: target_width,
        height,
    })
}

/// Map a destination coordinate to the source coordinate under the
/// center of its cell.
///
/// `floor((dst + 0.5) * scale)`, clamped to the last source index to
/// absorb floating-point overshoot at the far edge.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
fn center_sample(dst: u32, scale: f64, source_len: u32) -> u32 {
    let src = ((f64::from(dst) + 0.5) * scale) as u32;
    src.min(source_len - 1)
}

/// Downscale `image` to `target_width` using center-sampled
/// nearest-neighbor selection.
///
/// Alpha is carried along with the sampled pixel unchanged.
///
/// # Errors
///
/// See [`target_dimensions`].
pub fn downscale(image: &RgbaImage, target_width: u32) -> Result<RgbaImage, PipelineError> {
    let source = Dimensions::of(image);
    let target = target_dimensions(source, target_width)?;

    let scale_x = f64::from(source.width) / f64::from(target.width);
    let scale_y = f64::from(source.height) / f64::from(target.height);

    Ok(RgbaImage::from_fn(target.width, target.height, |x, y| {
        let src_x = center_sample(x, scale_x, source.width);
        let src_y = center_sample(y, scale_y, source.height);
        *image.get_pixel(src_x, src_y)
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgba;

    use super::*;

    /// Every pixel encodes its own coordinates, so sampled positions
    /// can be read back from the output.
    #[allow(clippy::cast_possible_truncation)]
    fn coordinate_image(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn width_is_exact_and_height_truncates() {
        let img = coordinate_image(100, 50);
        let out = downscale(&img, 50).unwrap();
        assert_eq!(out.dimensions(), (50, 25));

        // 33 * 10 / 100 = 3.3 -> 3
        let img = coordinate_image(100, 33);
        let out = downscale(&img, 10).unwrap();
        assert_eq!(out.dimensions(), (10, 3));
    }

    #[test]
    fn portrait_preserves_aspect_ratio() {
        let img = coordinate_image(60, 120);
        let out = downscale(&img, 15).unwrap();
        assert_eq!(out.dimensions(), (15, 30));
    }

    #[test]
    fn samples_cell_centers_not_corners() {
        // Halving: destination x maps to floor((x + 0.5) * 2) = 2x + 1.
        let img = coordinate_image(8, 8);
        let out = downscale(&img, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let p = out.get_pixel(x, y);
                assert_eq!(u32::from(p[0]), 2 * x + 1, "x at ({x}, {y})");
                assert_eq!(u32::from(p[1]), 2 * y + 1, "y at ({x}, {y})");
            }
        }
    }

    #[test]
    fn non_integer_ratio_uses_center_formula() {
        // scale_x = 10 / 3; centers at 1.67, 5.0, 8.33 -> 1, 5, 8.
        let img = coordinate_image(10, 10);
        let out = downscale(&img, 3).unwrap();
        let xs: Vec<u8> = (0..3).map(|x| out.get_pixel(x, 0)[0]).collect();
        assert_eq!(xs, vec![1, 5, 8]);
    }

    #[test]
    fn same_width_is_identity() {
        let img = coordinate_image(13, 7);
        let out = downscale(&img, 13).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn alpha_is_carried_through() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 77]));
        let out = downscale(&img, 2).unwrap();
        assert!(out.pixels().all(|p| *p == Rgba([10, 20, 30, 77])));
    }

    #[test]
    fn zero_target_width_is_rejected() {
        let img = coordinate_image(10, 10);
        let result = downscale(&img, 0);
        assert!(matches!(
            result,
            Err(PipelineError::InvalidTargetWidth {
                target_width: 0,
                source_width: 10
            })
        ));
    }

    #[test]
    fn target_wider_than_source_is_rejected() {
        let img = coordinate_image(10, 10);
        let result = downscale(&img, 11);
        assert!(matches!(
            result,
            Err(PipelineError::InvalidTargetWidth { .. })
        ));
    }

    #[test]
    fn degenerate_height_is_rejected() {
        // 1 * 4 / 100 = 0 rows.
        let img = coordinate_image(100, 1);
        let result = downscale(&img, 4);
        assert!(matches!(
            result,
            Err(PipelineError::DegenerateHeight { target_width: 4, .. })
        ));
    }

    #[test]
    fn empty_source_is_rejected() {
        let img = RgbaImage::new(0, 5);
        assert!(matches!(downscale(&img, 1), Err(PipelineError::EmptyImage)));
    }
}
