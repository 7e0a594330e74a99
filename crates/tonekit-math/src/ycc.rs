//! Luma / opponent-chroma polar form.
//!
//! A pixel is split into its Rec.709 luma `Y` and two opponent chroma
//! differences `cb = B - Y`, `cr = R - Y`. In polar form the chroma pair
//! becomes a magnitude and a hue angle, measured in turns (`1.0` is a full
//! circle). Green is recovered from the luma equation, so `Y` survives a
//! round trip regardless of what happens to the chroma pair.
//!
//! ```rust
//! use tonekit_math::ycc::LumaChroma;
//!
//! let p = LumaChroma::from_rgb([0.8, 0.4, 0.2]).to_polar();
//! let back = p.to_luma_chroma().to_rgb();
//! assert!((back[1] - 0.4).abs() < 1e-5);
//! ```

use std::f32::consts::TAU;
use tonekit_core::{REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R};

/// Rectangular luma/chroma form of a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaChroma {
    /// Rec.709 luma.
    pub luma: f32,
    /// Blue difference, `B - Y`.
    pub cb: f32,
    /// Red difference, `R - Y`.
    pub cr: f32,
}

/// Polar luma/chroma form of a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaChromaPolar {
    /// Rec.709 luma.
    pub luma: f32,
    /// Chroma magnitude, `hypot(cb, cr)`.
    pub chroma: f32,
    /// Hue angle in turns, in `[0, 1)`.
    pub hue: f32,
}

impl LumaChroma {
    /// Splits an RGB pixel.
    #[inline]
    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        let [r, g, b] = rgb;
        let luma = r * REC709_LUMA_R + g * REC709_LUMA_G + b * REC709_LUMA_B;
        Self {
            luma,
            cb: b - luma,
            cr: r - luma,
        }
    }

    /// Recombines into RGB.
    #[inline]
    pub fn to_rgb(&self) -> [f32; 3] {
        let r = self.luma + self.cr;
        let b = self.luma + self.cb;
        let g = (self.luma - REC709_LUMA_R * r - REC709_LUMA_B * b) / REC709_LUMA_G;
        [r, g, b]
    }

    /// Converts to polar form.
    #[inline]
    pub fn to_polar(&self) -> LumaChromaPolar {
        let chroma = self.cb.hypot(self.cr);
        let hue = if chroma > 0.0 {
            (self.cr.atan2(self.cb) / TAU).rem_euclid(1.0)
        } else {
            0.0
        };
        LumaChromaPolar {
            luma: self.luma,
            chroma,
            hue,
        }
    }

    /// Scales chroma toward the luma axis.
    #[inline]
    pub fn scale_chroma(&self, k: f32) -> Self {
        Self {
            luma: self.luma,
            cb: self.cb * k,
            cr: self.cr * k,
        }
    }
}

impl LumaChromaPolar {
    /// Returns the same color with its hue advanced by `turns`, modulo one turn.
    #[inline]
    pub fn rotate(&self, turns: f32) -> Self {
        Self {
            hue: (self.hue + turns).rem_euclid(1.0),
            ..*self
        }
    }

    /// Converts back to rectangular form.
    #[inline]
    pub fn to_luma_chroma(&self) -> LumaChroma {
        let (sin, cos) = (self.hue * TAU).sin_cos();
        LumaChroma {
            luma: self.luma,
            cb: self.chroma * cos,
            cr: self.chroma * sin,
        }
    }
}

/// Largest chroma scale in `[0, 1]` that keeps every channel inside `[0, 1]`.
///
/// Luma outside `[0, 1]` cannot be fixed by scaling chroma and yields `0`.
pub fn gamut_chroma_scale(lc: &LumaChroma) -> f32 {
    let y = lc.luma;
    if !(0.0..=1.0).contains(&y) {
        return 0.0;
    }
    let rgb = lc.to_rgb();
    let mut k = 1.0f32;
    for c in rgb {
        let d = c - y;
        if c > 1.0 && d > 0.0 {
            k = k.min((1.0 - y) / d);
        } else if c < 0.0 && d < 0.0 {
            k = k.min(-y / d);
        }
    }
    k.clamp(0.0, 1.0)
}

/// Spread between the largest and smallest channel.
///
/// This is the saturation measure used by vibrance: `0` for greys, `1`
/// for fully saturated primaries and secondaries.
#[inline]
pub fn channel_spread(rgb: [f32; 3]) -> f32 {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    let min = rgb[0].min(rgb[1]).min(rgb[2]);
    max - min
}

/// Shortest distance between two hue angles, in turns (`0..=0.5`).
#[inline]
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(1.0);
    d.min(1.0 - d)
}
