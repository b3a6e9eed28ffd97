//! Uniform per-channel color quantization.
//!
//! Each of R, G and B is independently rounded to the nearest of a
//! fixed set of evenly spaced levels; alpha is untouched. There is no
//! palette and no dithering, so banding is expected.
//!
//! The level count is derived from the requested color count as
//! `max(2, color_count / 3)`. This is deliberately *not* a cube root:
//! the number of producible colors is `levels^3`, which rarely equals
//! the request. The formula is kept as-is because output appearance
//! depends on these exact bucket boundaries.

use serde::{Deserialize, Serialize};

use crate::types::RgbaImage;

/// Highest representable level count for an 8-bit channel.
///
/// Beyond this the step would round to zero.
const MAX_LEVELS: u32 = 256;

/// Quantization levels derived from a color count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizeLevels {
    /// Number of distinct values each RGB channel can take.
    pub levels_per_channel: u32,
    /// Distance between adjacent levels.
    pub step: u32,
}

impl QuantizeLevels {
    /// Derive levels for `color_count`.
    ///
    /// Returns `None` when `color_count` is zero (quantization disabled).
    #[must_use]
    pub fn for_color_count(color_count: u32) -> Option<Self> {
        if color_count == 0 {
            return None;
        }
        let levels_per_channel = (color_count / 3).clamp(2, MAX_LEVELS);
        let step = 255 / (levels_per_channel - 1);
        Some(Self {
            levels_per_channel,
            step,
        })
    }

    /// Number of colors these levels can actually produce (`levels^3`).
    #[must_use]
    pub const fn palette_size(&self) -> u64 {
        let l = self.levels_per_channel as u64;
        l * l * l
    }

    /// Round one channel value to the nearest level.
    ///
    /// `min(255, round(value / step) * step)` with halves rounding up.
    #[must_use]
    pub fn quantize_channel(&self, value: u8) -> u8 {
        let v = u32::from(value);
        let level = (2 * v + self.step) / (2 * self.step);
        u8::try_from(level * self.step).unwrap_or(u8::MAX)
    }
}

/// Reduce the colors of `image` according to `color_count`.
///
/// A `color_count` of zero returns an unchanged copy.
#[must_use]
pub fn quantize_colors(image: &RgbaImage, color_count: u32) -> RgbaImage {
    let Some(levels) = QuantizeLevels::for_color_count(color_count) else {
        return image.clone();
    };

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [
            levels.quantize_channel(r),
            levels.quantize_channel(g),
            levels.quantize_channel(b),
            a,
        ];
    }
    out
}
