//! Hue rotation.
//!
//! Each pixel is taken to luma/chroma polar form, its hue angle advanced by
//! a fraction of a full turn, and taken back. Luma and chroma magnitude are
//! held fixed. When the rotated color falls outside the unit cube, chroma
//! is pulled toward the luma axis until it fits, which keeps luma and hue
//! exact and gives up saturation instead.
//!
//! The rotation amount is normalized modulo one turn on construction, so
//! `new(0.5)` and `new(-0.5)` are the same transform.

#[allow(unused_imports)]
use tracing::{debug, trace};

use tonekit_core::{clamp_unit, RgbImage};
use tonekit_math::ycc::{gamut_chroma_scale, LumaChroma};

/// Chroma below which a pixel is treated as grey and left alone.
const GREY_CHROMA: f32 = 1e-6;

/// Per-pixel hue rotation stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueRotateTransform {
    turns: f32,
}

impl HueRotateTransform {
    /// Creates a rotation by `fraction` of a full turn.
    pub fn new(fraction: f32) -> Self {
        let turns = if fraction.is_finite() {
            fraction.rem_euclid(1.0)
        } else {
            0.0
        };
        // rem_euclid can round a tiny negative up to exactly 1.0
        let turns = if turns >= 1.0 { 0.0 } else { turns };
        Self { turns }
    }

    /// Creates a rotation from an angle in degrees.
    pub fn from_degrees(degrees: f32) -> Self {
        Self::new(degrees / 360.0)
    }

    /// Normalized rotation in `[0, 1)` turns.
    pub fn turns(&self) -> f32 {
        self.turns
    }

    /// Returns true if the rotation is a no-op.
    pub fn is_identity(&self) -> bool {
        self.turns == 0.0
    }

    /// Rotates one pixel.
    #[inline]
    pub fn apply_pixel(&self, rgb: [f32; 3]) -> [f32; 3] {
        if self.is_identity() {
            return rgb;
        }
        let polar = LumaChroma::from_rgb(rgb).to_polar();
        if polar.chroma <= GREY_CHROMA {
            return rgb;
        }
        let rotated = polar.rotate(self.turns).to_luma_chroma();
        let fitted = rotated.scale_chroma(gamut_chroma_scale(&rotated));
        let [r, g, b] = fitted.to_rgb();
        [clamp_unit(r), clamp_unit(g), clamp_unit(b)]
    }

    /// Rotates every pixel of an image, returning a new image.
    pub fn apply(&self, src: &RgbImage) -> RgbImage {
        trace!(width = src.width(), height = src.height(), turns = self.turns, "hue rotate");
        if self.is_identity() {
            return src.clone();
        }
        let mut out = src.clone();
        out.map_pixels(|px| self.apply_pixel(px));
        out
    }
}
