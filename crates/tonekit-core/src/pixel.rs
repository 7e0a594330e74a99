//! Luma weights and small per-pixel helpers.
//!
//! Every stage that needs "the luma of a pixel" (saturation matrices,
//! vibrance, hue rotation) uses [`REC709_LUMA`]. The weights are observable
//! in rendered output, so they are fixed here once for the whole workspace.

/// Rec.709 luminance coefficient for red channel.
///
/// Used in the standard luminance formula: `Y = 0.2126*R + 0.7152*G + 0.0722*B`
pub const REC709_LUMA_R: f32 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f32 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f32 = 0.0722;

/// Rec.709 luminance coefficients as an array [R, G, B].
///
/// # Example
/// ```
/// use tonekit_core::pixel::REC709_LUMA;
/// let sum: f32 = REC709_LUMA.iter().sum();
/// assert!((sum - 1.0).abs() < 1e-6);
/// ```
pub const REC709_LUMA: [f32; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Calculate Rec.709 luminance from RGB values.
///
/// # Example
/// ```
/// use tonekit_core::luminance_rec709;
/// let y = luminance_rec709([1.0, 1.0, 1.0]);
/// assert!((y - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn luminance_rec709(rgb: [f32; 3]) -> f32 {
    rgb[0] * REC709_LUMA_R + rgb[1] * REC709_LUMA_G + rgb[2] * REC709_LUMA_B
}

/// Clamps a channel value into the valid `[0, 1]` range.
///
/// NaN maps to 0 so a degenerate input never poisons a tile.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
