//! The fixed render pipeline of the hue/saturation operator.
//!
//! ```text
//!  back ──► band_combine(C·L·S) ──► vibrance? ──► hue rotate? ──► front
//!    │                                                              │
//!    └──────────────────────────► blend ◄───────────────────────────┘
//! ```
//!
//! A [`TransformPipeline`] is derived from one [`ParamSnapshot`] and is
//! immutable afterwards, so it can be shared across render threads and
//! evaluated on tiles in any order.

#[allow(unused_imports)]
use tracing::{debug, trace};

use tonekit_core::RgbImage;
use tonekit_math::{ColorMatrixBuilder, Mat3x4, Mat4};
use tonekit_ops::hue_rotate::HueRotateTransform;
use tonekit_ops::tiling::render_tiled;
use tonekit_ops::vibrance::VibranceTransform;
use tonekit_ops::{BlendComposer, BlendState, OpsResult, Primitives};

use crate::AdjustResult;
use crate::param::ParamKind;
use crate::params::ParamSnapshot;

/// Derived transform state for one parameter snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPipeline {
    snapshot: ParamSnapshot,
    color_matrix: Mat4,
    band_combine: Mat3x4,
    vibrance: Option<VibranceTransform>,
    hue: Option<HueRotateTransform>,
}

impl TransformPipeline {
    /// Derives the pipeline for `snapshot`.
    ///
    /// The color matrix is composed saturation first, then the luminosity
    /// scale, then contrast pivoted on the luminosity setting. Stages whose
    /// parameter is zero are left out.
    pub fn from_snapshot(snapshot: ParamSnapshot) -> Self {
        let hue = snapshot.get(ParamKind::Hue);
        let saturation = snapshot.get(ParamKind::Saturation);
        let vibrance = snapshot.get(ParamKind::Vibrance);
        let luminosity = snapshot.get(ParamKind::Luminosity);
        let contrast = snapshot.get(ParamKind::Contrast);

        let mut builder = ColorMatrixBuilder::new();
        if saturation != 0.0 {
            builder = builder.saturate(saturation / 100.0 + 1.0);
        }
        if luminosity != 0.0 {
            let lit = luminosity / 100.0 + 1.0;
            builder = builder.scale_channels(lit, lit, lit);
        }
        if contrast != 0.0 {
            builder = builder.contrast(contrast, luminosity);
        }
        let color_matrix = builder.build();

        let vibrance = (vibrance != 0.0).then(|| VibranceTransform::new(vibrance));
        let hue = Some(HueRotateTransform::from_degrees(hue)).filter(|h| !h.is_identity());

        debug!(?snapshot, vibrance = vibrance.is_some(), hue = hue.is_some(), "pipeline built");
        Self {
            snapshot,
            band_combine: color_matrix.to_3x4(),
            color_matrix,
            vibrance,
            hue,
        }
    }

    /// Snapshot this pipeline was built from.
    pub fn snapshot(&self) -> ParamSnapshot {
        self.snapshot
    }

    /// Composed 4x4 color matrix.
    pub fn color_matrix(&self) -> &Mat4 {
        &self.color_matrix
    }

    /// The 3x4 matrix handed to the band-combine primitive.
    pub fn band_combine_matrix(&self) -> &Mat3x4 {
        &self.band_combine
    }

    /// Vibrance stage, if vibrance is non-zero.
    pub fn vibrance(&self) -> Option<&VibranceTransform> {
        self.vibrance.as_ref()
    }

    /// Vibrance matrix before per-pixel weighting; identity when disabled.
    pub fn vibrance_matrix(&self) -> Mat3x4 {
        self.vibrance.map_or(Mat3x4::IDENTITY, |v| *v.matrix())
    }

    /// Hue rotation in turns, `0` when disabled.
    pub fn hue_turn(&self) -> f32 {
        self.hue.map_or(0.0, |h| h.turns())
    }

    /// Returns true if the front image equals the back image.
    pub fn is_identity(&self) -> bool {
        self.band_combine.is_identity() && self.vibrance.is_none() && self.hue.is_none()
    }

    /// Renders the transformed "front" image from `back`.
    pub fn front<P: Primitives + ?Sized>(&self, primitives: &P, back: &RgbImage) -> AdjustResult<RgbImage> {
        Ok(self.render_front(primitives, back)?)
    }

    /// Renders the front image and blends it over `back`.
    pub fn render<P: Primitives + ?Sized>(
        &self,
        primitives: &P,
        back: &RgbImage,
        state: &BlendState,
    ) -> AdjustResult<RgbImage> {
        Ok(self.render_blended(primitives, back, state)?)
    }

    /// Same as [`render`](Self::render), evaluated tile by tile in parallel.
    ///
    /// The result is identical to a single-pass render.
    pub fn render_tiled<P: Primitives + ?Sized>(
        &self,
        primitives: &P,
        back: &RgbImage,
        state: &BlendState,
        tile_size: u32,
    ) -> AdjustResult<RgbImage> {
        // crop would accept a larger mask tile by tile
        state.check_mask(back.dimensions())?;
        let out = render_tiled(back, tile_size, |tile, rect| {
            self.render_blended(primitives, tile, &state.for_tile(rect)?)
        })?;
        Ok(out)
    }

    fn render_front<P: Primitives + ?Sized>(&self, primitives: &P, back: &RgbImage) -> OpsResult<RgbImage> {
        trace!(backend = primitives.name(), width = back.width(), height = back.height(), "front");
        let mut front = primitives.band_combine(back, &self.band_combine)?;
        if let Some(vibrance) = &self.vibrance {
            front = vibrance.apply(&front);
        }
        if let Some(hue) = &self.hue {
            front = hue.apply(&front);
        }
        Ok(front)
    }

    fn render_blended<P: Primitives + ?Sized>(
        &self,
        primitives: &P,
        back: &RgbImage,
        state: &BlendState,
    ) -> OpsResult<RgbImage> {
        let front = self.render_front(primitives, back)?;
        BlendComposer::new(primitives).compose(back, &front, state)
    }
}

impl From<ParamSnapshot> for TransformPipeline {
    fn from(snapshot: ParamSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}
