//! Per-effect color matrices and their composition.
//!
//! Each builder step appends one effect *after* everything already in the
//! matrix, so the call order is the application order. The hue/saturation
//! operator always builds saturation, then luminosity, then contrast:
//!
//! ```rust
//! use tonekit_math::{ColorMatrixBuilder, Mat4};
//!
//! let m = ColorMatrixBuilder::new()
//!     .saturate(1.2)
//!     .scale_channels(1.1, 1.1, 1.1)
//!     .contrast(20.0, 10.0)
//!     .build();
//! assert_ne!(m, Mat4::IDENTITY);
//! ```
//!
//! # Luma weights
//!
//! Saturation is measured against Rec.709 luma
//! ([`tonekit_core::REC709_LUMA`]). A grey pixel keeps its value under any
//! saturation scale, and a fully desaturated pixel equals its luma.
//!
//! # Contrast curve
//!
//! `out = (in - pivot) * slope + pivot` where
//!
//! ```text
//! slope = 2 ^ (amount / 63.5)             amount in [-127, 127] -> [1/4, 4]
//! pivot = 0.5 * (pivot_bias / 100 + 1)    mid grey after the luminosity scale
//! ```
//!
//! A pivot below [`MIN_PIVOT`] (luminosity at -100 leaves nothing to pivot
//! around) contributes identity.

use crate::Mat4;
use tonekit_core::REC709_LUMA;

/// Smallest contrast pivot that still yields a contrast contribution.
pub const MIN_PIVOT: f32 = 1e-4;

/// Contrast amount that doubles the slope.
pub const CONTRAST_DOUBLING: f32 = 63.5;

/// Saturation matrix: moves each pixel's chroma away from (or toward) its luma.
///
/// `scale = 1` is identity, `scale = 0` maps every pixel to its luma.
pub fn saturation_matrix(scale: f32) -> Mat4 {
    let inv = 1.0 - scale;
    let [wr, wg, wb] = REC709_LUMA;
    let (r, g, b) = (inv * wr, inv * wg, inv * wb);
    Mat4::from_rows([
        [r + scale, g, b, 0.0],
        [r, g + scale, b, 0.0],
        [r, g, b + scale, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Contrast slope for an amount in `[-127, 127]`.
#[inline]
pub fn contrast_slope(amount: f32) -> f32 {
    (amount / CONTRAST_DOUBLING).exp2()
}

/// Contrast pivot for the current luminosity setting.
#[inline]
pub fn contrast_pivot(pivot_bias: f32) -> f32 {
    0.5 * (pivot_bias / 100.0 + 1.0)
}

/// Contrast matrix around the pivot derived from `pivot_bias`.
///
/// Falls back to identity if the pivot degenerates.
pub fn contrast_matrix(amount: f32, pivot_bias: f32) -> Mat4 {
    let pivot = contrast_pivot(pivot_bias);
    let slope = contrast_slope(amount);
    if !(pivot >= MIN_PIVOT) || !slope.is_finite() {
        return Mat4::IDENTITY;
    }
    let offset = pivot * (1.0 - slope);
    Mat4::from_rows([
        [slope, 0.0, 0.0, offset],
        [0.0, slope, 0.0, offset],
        [0.0, 0.0, slope, offset],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Composes two transforms: the result applies `first`, then `second`.
#[inline]
pub fn compose(first: &Mat4, second: &Mat4) -> Mat4 {
    second.mul_mat(first)
}

/// Appends a saturation scale to `matrix`.
#[inline]
pub fn saturate(matrix: &Mat4, scale: f32) -> Mat4 {
    compose(matrix, &saturation_matrix(scale))
}

/// Appends a per-channel multiplicative scale to `matrix`.
#[inline]
pub fn scale_channels(matrix: &Mat4, r: f32, g: f32, b: f32) -> Mat4 {
    compose(matrix, &Mat4::diagonal(r, g, b))
}

/// Appends a contrast curve to `matrix`.
#[inline]
pub fn contrast(matrix: &Mat4, amount: f32, pivot_bias: f32) -> Mat4 {
    compose(matrix, &contrast_matrix(amount, pivot_bias))
}

/// Chained builder over the free functions in this module.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorMatrixBuilder {
    matrix: Mat4,
}

impl ColorMatrixBuilder {
    /// Starts from identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a saturation scale.
    pub fn saturate(self, scale: f32) -> Self {
        Self {
            matrix: saturate(&self.matrix, scale),
        }
    }

    /// Appends a channel scale.
    pub fn scale_channels(self, r: f32, g: f32, b: f32) -> Self {
        Self {
            matrix: scale_channels(&self.matrix, r, g, b),
        }
    }

    /// Appends a contrast curve.
    pub fn contrast(self, amount: f32, pivot_bias: f32) -> Self {
        Self {
            matrix: contrast(&self.matrix, amount, pivot_bias),
        }
    }

    /// Returns the cumulative matrix.
    pub fn build(self) -> Mat4 {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tonekit_core::luminance_rec709;

    fn spread(rgb: [f32; 3]) -> f32 {
        let y = luminance_rec709(rgb);
        rgb.iter().map(|c| (c - y).abs()).sum()
    }

    #[test]
    fn test_saturation_one_is_identity() {
        assert_eq!(saturation_matrix(1.0), Mat4::IDENTITY);
    }

    #[test]
    fn test_saturation_zero_is_grey() {
        let out = saturation_matrix(0.0).transform_rgb([0.8, 0.3, 0.1]);
        let y = luminance_rec709([0.8, 0.3, 0.1]);
        for c in out {
            assert_abs_diff_eq!(c, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_saturation_preserves_luma() {
        let rgb = [0.6, 0.4, 0.2];
        for scale in [0.0, 0.5, 1.5, 2.0] {
            let out = saturation_matrix(scale).transform_rgb(rgb);
            assert_abs_diff_eq!(luminance_rec709(out), luminance_rec709(rgb), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_saturation_monotonic() {
        let rgb = [0.6, 0.4, 0.3];
        let mut last = spread(rgb);
        for step in 1..=10 {
            let scale = 1.0 + step as f32 * 0.1;
            let s = spread(saturation_matrix(scale).transform_rgb(rgb));
            assert!(s > last, "scale {scale}: {s} <= {last}");
            last = s;
        }
    }

    #[test]
    fn test_contrast_zero_is_identity() {
        assert_eq!(contrast_matrix(0.0, 0.0), Mat4::IDENTITY);
        assert_eq!(contrast_matrix(0.0, 40.0), Mat4::IDENTITY);
    }

    #[test]
    fn test_contrast_slope_range() {
        assert_abs_diff_eq!(contrast_slope(127.0), 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(contrast_slope(-127.0), 0.25, epsilon = 1e-6);
        assert!(contrast_slope(10.0) < contrast_slope(11.0));
    }

    #[test]
    fn test_contrast_holds_pivot() {
        let pivot = contrast_pivot(20.0);
        let out = contrast_matrix(60.0, 20.0).transform_rgb([pivot; 3]);
        for c in out {
            assert_abs_diff_eq!(c, pivot, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_contrast_zero_pivot_falls_back_to_identity() {
        assert_eq!(contrast_matrix(80.0, -100.0), Mat4::IDENTITY);
    }

    #[test]
    fn test_builder_order() {
        let built = ColorMatrixBuilder::new()
            .saturate(1.5)
            .scale_channels(0.8, 0.8, 0.8)
            .contrast(30.0, -20.0)
            .build();
        let manual = contrast_matrix(30.0, -20.0) * Mat4::diagonal(0.8, 0.8, 0.8) * saturation_matrix(1.5);
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(built.m[i][j], manual.m[i][j], epsilon = 1e-5);
            }
        }
    }
}
