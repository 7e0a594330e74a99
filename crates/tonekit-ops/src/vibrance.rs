//! Vibrance: selective saturation.
//!
//! Vibrance starts from the same saturation matrix as the global
//! saturation control, `saturate(vibrance / 100 + 1)`, but applies it per
//! pixel with a strength that depends on the pixel itself:
//!
//! ```text
//! s      = max(r, g, b) - min(r, g, b)
//! w      = (1 - s)^2 * (1 - SKIN_PROTECTION * skin(hue))
//! output = clamp(in + w * (M * in - in))
//! ```
//!
//! Muted pixels get nearly the full boost, saturated pixels get little and
//! fully saturated ones none. Hues close to flesh tones are damped further.
//! This per-pixel weight is why vibrance cannot be folded into the global
//! color matrix.

#[allow(unused_imports)]
use tracing::{debug, trace};

use tonekit_core::{clamp_unit, RgbImage};
use tonekit_math::ycc::{channel_spread, hue_distance, LumaChroma};
use tonekit_math::{saturation_matrix, Mat3x4};

/// Center of the flesh-tone hue band, in turns of the luma/chroma plane.
pub const SKIN_HUE: f32 = 0.375;

/// Half-width of the flesh-tone hue band, in turns.
pub const SKIN_HUE_WIDTH: f32 = 0.1;

/// Fraction of the boost withheld at the center of the flesh-tone band.
pub const SKIN_PROTECTION: f32 = 0.5;

/// Per-pixel vibrance stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibranceTransform {
    matrix: Mat3x4,
}

impl VibranceTransform {
    /// Creates the transform for a vibrance setting in `[-100, 100]`.
    pub fn new(vibrance: f32) -> Self {
        Self::from_matrix(saturation_matrix(vibrance / 100.0 + 1.0).to_3x4())
    }

    /// Creates the transform from a prepared vibrance matrix.
    pub fn from_matrix(matrix: Mat3x4) -> Self {
        Self { matrix }
    }

    /// The saturation matrix before per-pixel attenuation.
    pub fn matrix(&self) -> &Mat3x4 {
        &self.matrix
    }

    /// Returns true if the transform leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        self.matrix.is_identity()
    }

    /// Applies vibrance to one pixel.
    #[inline]
    pub fn apply_pixel(&self, rgb: [f32; 3]) -> [f32; 3] {
        let w = weight(rgb);
        let boosted = self.matrix.apply(rgb);
        [
            clamp_unit(rgb[0] + w * (boosted[0] - rgb[0])),
            clamp_unit(rgb[1] + w * (boosted[1] - rgb[1])),
            clamp_unit(rgb[2] + w * (boosted[2] - rgb[2])),
        ]
    }

    /// Applies vibrance to an image, returning a new image.
    pub fn apply(&self, src: &RgbImage) -> RgbImage {
        trace!(width = src.width(), height = src.height(), "vibrance");
        if self.is_identity() {
            return src.clone();
        }
        let mut out = src.clone();
        out.map_pixels(|px| self.apply_pixel(px));
        out
    }
}

/// Boost strength for a pixel, in `[0, 1]`.
///
/// Monotonically decreasing in the pixel's channel spread.
#[inline]
pub fn weight(rgb: [f32; 3]) -> f32 {
    let s = clamp_unit(channel_spread(rgb));
    let muted = (1.0 - s) * (1.0 - s);
    muted * (1.0 - SKIN_PROTECTION * skin_affinity(rgb))
}

/// How close a pixel's hue is to flesh tones, in `[0, 1]`.
#[inline]
pub fn skin_affinity(rgb: [f32; 3]) -> f32 {
    let polar = LumaChroma::from_rgb(rgb).to_polar();
    if polar.chroma <= 0.0 {
        return 0.0;
    }
    (1.0 - hue_distance(polar.hue, SKIN_HUE) / SKIN_HUE_WIDTH).max(0.0)
}
