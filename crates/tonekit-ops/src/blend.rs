//! Front/back composition.
//!
//! A blended operation renders a transformed "front" image from its input
//! and composes it over the untouched input ("back"):
//!
//! ```text
//! amount = opacity * mask(x, y)
//! output = back + amount * (mode(front, back) - back)
//! ```
//!
//! With [`BlendMode::Normal`] this is plain interpolation between back and
//! front. The back image is only read.
//!
//! ```rust
//! use tonekit_core::RgbImage;
//! use tonekit_ops::{BlendComposer, BlendState, CpuPrimitives};
//!
//! let back = RgbImage::filled(2, 2, [0.2, 0.2, 0.2]);
//! let front = RgbImage::filled(2, 2, [0.6, 0.6, 0.6]);
//! let out = BlendComposer::new(&CpuPrimitives)
//!     .compose(&back, &front, &BlendState::with_opacity(0.5))
//!     .unwrap();
//! assert!((out.pixel(0, 0)[0] - 0.4).abs() < 1e-6);
//! ```

#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult, Primitives};
use tonekit_core::{MaskImage, RgbImage};

/// Blend mode applied between front and back before opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum BlendMode {
    /// Front replaces back.
    #[default]
    Normal,
    /// Multiply (darken).
    Multiply,
    /// Screen (lighten).
    Screen,
    /// Overlay (contrast, keyed on back).
    Overlay,
    /// Soft light.
    SoftLight,
    /// Hard light (contrast, keyed on front).
    HardLight,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Absolute difference.
    Difference,
}

impl BlendMode {
    /// All modes, in menu order.
    pub const ALL: [BlendMode; 9] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::SoftLight,
        Self::HardLight,
        Self::Darken,
        Self::Lighten,
        Self::Difference,
    ];

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::SoftLight => "softlight",
            Self::HardLight => "hardlight",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::Difference => "difference",
        }
    }
}

impl std::str::FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == lower)
            .ok_or_else(|| format!("unknown blend mode '{s}'"))
    }
}

/// Blends one channel of `front` (a) with `back` (b).
#[inline]
pub fn blend_channel(mode: BlendMode, a: f32, b: f32) -> f32 {
    match mode {
        BlendMode::Normal => a,
        BlendMode::Multiply => a * b,
        BlendMode::Screen => 1.0 - (1.0 - a) * (1.0 - b),
        BlendMode::Overlay => {
            if b < 0.5 {
                2.0 * a * b
            } else {
                1.0 - 2.0 * (1.0 - a) * (1.0 - b)
            }
        }
        BlendMode::SoftLight => {
            if a < 0.5 {
                b - (1.0 - 2.0 * a) * b * (1.0 - b)
            } else {
                let d = if b < 0.25 {
                    ((16.0 * b - 12.0) * b + 4.0) * b
                } else {
                    b.sqrt()
                };
                b + (2.0 * a - 1.0) * (d - b)
            }
        }
        BlendMode::HardLight => {
            if a < 0.5 {
                2.0 * a * b
            } else {
                1.0 - 2.0 * (1.0 - a) * (1.0 - b)
            }
        }
        BlendMode::Darken => a.min(b),
        BlendMode::Lighten => a.max(b),
        BlendMode::Difference => (a - b).abs(),
    }
}

/// Opacity, optional mask and mode of a blended operation.
///
/// Owned by the hosting operator framework; the hue/saturation operator
/// only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendState {
    /// Global opacity in `[0, 1]`.
    pub opacity: f32,
    /// Optional per-pixel mask in `[0, 1]`, same size as the image.
    pub mask: Option<MaskImage>,
    /// Blend mode.
    pub mode: BlendMode,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            mask: None,
            mode: BlendMode::Normal,
        }
    }
}

impl BlendState {
    /// Normal blend at the given opacity.
    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity,
            ..Self::default()
        }
    }

    /// Sets the mask.
    pub fn with_mask(mut self, mask: MaskImage) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Sets the blend mode.
    pub fn with_mode(mut self, mode: BlendMode) -> Self {
        self.mode = mode;
        self
    }

    /// Opacity clamped into `[0, 1]`. NaN counts as fully transparent.
    pub fn effective_opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            0.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        }
    }

    /// Returns true if the front image cannot show through.
    pub fn is_transparent(&self) -> bool {
        self.effective_opacity() <= 0.0
    }

    /// Fails unless the mask, if any, is `dims` in size.
    pub fn check_mask(&self, dims: (u32, u32)) -> OpsResult<()> {
        match &self.mask {
            Some(mask) if mask.dimensions() != dims => Err(OpsError::Image(
                tonekit_core::Error::dimension_mismatch(dims, mask.dimensions()),
            )),
            _ => Ok(()),
        }
    }

    /// Cuts the mask down to a tile so the state can travel with that tile.
    pub fn for_tile(&self, tile: tonekit_core::Rect) -> OpsResult<Self> {
        let mask = match &self.mask {
            Some(m) => Some(m.crop(tile)?),
            None => None,
        };
        Ok(Self {
            opacity: self.opacity,
            mask,
            mode: self.mode,
        })
    }
}

/// Composes a front image over its back image through the host primitive.
pub struct BlendComposer<'a, P: Primitives + ?Sized> {
    primitives: &'a P,
}

impl<'a, P: Primitives + ?Sized> BlendComposer<'a, P> {
    /// Creates a composer over the given primitives.
    pub fn new(primitives: &'a P) -> Self {
        Self { primitives }
    }

    /// Produces `interpolate(back, mode(front, back), opacity * mask)`.
    pub fn compose(&self, back: &RgbImage, front: &RgbImage, state: &BlendState) -> OpsResult<RgbImage> {
        state.check_mask(back.dimensions())?;
        if state.is_transparent() && back.dimensions() == front.dimensions() {
            trace!("blend: fully transparent, passing back through");
            return Ok(back.clone());
        }
        self.primitives.blend(back, front, state)
    }
}
