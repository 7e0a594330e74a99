//! Host rendering primitives.
//!
//! The hue/saturation operator does not own a pixel engine. It asks the
//! host for two generic primitives:
//!
//! - `band_combine`: apply a 3x4 affine matrix to every pixel
//! - `blend`: compose a transformed front image over the untouched back
//!
//! [`CpuPrimitives`] is the reference implementation, parallelized with
//! rayon. Both primitives are pure: they read their inputs and return a
//! fresh buffer, so tiles can be evaluated in any order on any thread.

use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::blend::{blend_channel, BlendState};
use crate::{OpsError, OpsResult};
use tonekit_core::{clamp_unit, RgbImage};
use tonekit_math::Mat3x4;

/// Per-pixel primitives supplied by the host renderer.
pub trait Primitives: Send + Sync {
    /// Backend name.
    fn name(&self) -> &'static str;

    /// Applies `matrix` to every pixel of `src` as the homogeneous
    /// point (r, g, b, 1), clamping the result into `[0, 1]`.
    fn band_combine(&self, src: &RgbImage, matrix: &Mat3x4) -> OpsResult<RgbImage>;

    /// Composes `front` over `back` under `state`.
    ///
    /// `back` is never modified. Images and mask must share dimensions.
    fn blend(&self, back: &RgbImage, front: &RgbImage, state: &BlendState) -> OpsResult<RgbImage>;
}

/// CPU primitives using rayon for parallelization.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuPrimitives;

impl CpuPrimitives {
    /// Creates the CPU backend.
    pub fn new() -> Self {
        Self
    }
}

impl Primitives for CpuPrimitives {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn band_combine(&self, src: &RgbImage, matrix: &Mat3x4) -> OpsResult<RgbImage> {
        trace!(width = src.width(), height = src.height(), "band_combine");
        if matrix.is_identity() {
            return Ok(src.clone());
        }

        let mut dst = RgbImage::new(src.width(), src.height());
        dst.data_mut()
            .par_chunks_exact_mut(3)
            .zip(src.data().par_chunks_exact(3))
            .for_each(|(out, inp)| {
                let px = matrix.apply([inp[0], inp[1], inp[2]]);
                out[0] = clamp_unit(px[0]);
                out[1] = clamp_unit(px[1]);
                out[2] = clamp_unit(px[2]);
            });
        Ok(dst)
    }

    fn blend(&self, back: &RgbImage, front: &RgbImage, state: &BlendState) -> OpsResult<RgbImage> {
        trace!(width = back.width(), height = back.height(), mode = ?state.mode, "blend");
        if back.dimensions() != front.dimensions() {
            return Err(OpsError::Image(tonekit_core::Error::dimension_mismatch(
                back.dimensions(),
                front.dimensions(),
            )));
        }
        state.check_mask(back.dimensions())?;

        let opacity = state.effective_opacity();
        let mode = state.mode;
        let mut dst = RgbImage::new(back.width(), back.height());
        let out = dst.data_mut();

        match &state.mask {
            Some(mask) => {
                out.par_chunks_exact_mut(3)
                    .zip(back.data().par_chunks_exact(3))
                    .zip(front.data().par_chunks_exact(3))
                    .zip(mask.data().par_iter())
                    .for_each(|(((o, b), f), m)| {
                        let amount = opacity * clamp_unit(*m);
                        for ch in 0..3 {
                            o[ch] = mix(b[ch], blend_channel(mode, f[ch], b[ch]), amount);
                        }
                    });
            }
            None => {
                out.par_chunks_exact_mut(3)
                    .zip(back.data().par_chunks_exact(3))
                    .zip(front.data().par_chunks_exact(3))
                    .for_each(|((o, b), f)| {
                        for ch in 0..3 {
                            o[ch] = mix(b[ch], blend_channel(mode, f[ch], b[ch]), opacity);
                        }
                    });
            }
        }
        Ok(dst)
    }
}

/// `back + amount * (blended - back)`; exact at both ends.
#[inline]
fn mix(back: f32, blended: f32, amount: f32) -> f32 {
    if amount >= 1.0 {
        blended
    } else if amount <= 0.0 {
        back
    } else {
        back + amount * (blended - back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::BlendMode;
    use approx::assert_abs_diff_eq;
    use tonekit_core::MaskImage;

    fn gradient() -> RgbImage {
        let mut img = RgbImage::new(4, 2);
        for (i, v) in img.data_mut().iter_mut().enumerate() {
            *v = (i % 7) as f32 / 7.0;
        }
        img
    }

    #[test]
    fn test_identity_matrix_is_exact() {
        let src = gradient();
        let out = CpuPrimitives.band_combine(&src, &Mat3x4::IDENTITY).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_matrix_offset_and_clamp() {
        let src = RgbImage::filled(1, 1, [0.5, 0.5, 0.5]);
        let mut m = Mat3x4::IDENTITY;
        m.m[0][3] = 0.25;
        m.m[2][3] = 0.75;
        let out = CpuPrimitives.band_combine(&src, &m).unwrap();
        assert_abs_diff_eq!(out.pixel(0, 0)[0], 0.75);
        assert_eq!(out.pixel(0, 0)[2], 1.0);
    }

    #[test]
    fn test_blend_opacity() {
        let back = RgbImage::filled(2, 2, [0.0, 0.0, 0.0]);
        let front = RgbImage::filled(2, 2, [1.0, 0.5, 0.25]);
        let half = BlendState::with_opacity(0.5);
        let out = CpuPrimitives.blend(&back, &front, &half).unwrap();
        assert_abs_diff_eq!(out.pixel(1, 1)[0], 0.5);
        assert_abs_diff_eq!(out.pixel(1, 1)[2], 0.125);

        let full = CpuPrimitives.blend(&back, &front, &BlendState::default()).unwrap();
        assert_eq!(full, front);
        let none = CpuPrimitives.blend(&back, &front, &BlendState::with_opacity(0.0)).unwrap();
        assert_eq!(none, back);
    }

    #[test]
    fn test_blend_mask() {
        let back = RgbImage::filled(2, 1, [0.2, 0.2, 0.2]);
        let front = RgbImage::filled(2, 1, [0.8, 0.8, 0.8]);
        let mask = MaskImage::from_data(2, 1, vec![0.0, 1.0]).unwrap();
        let state = BlendState::default().with_mask(mask);
        let out = CpuPrimitives.blend(&back, &front, &state).unwrap();
        assert_eq!(out.pixel(0, 0), [0.2, 0.2, 0.2]);
        assert_eq!(out.pixel(1, 0), [0.8, 0.8, 0.8]);
    }

    #[test]
    fn test_blend_mode_multiply() {
        let back = RgbImage::filled(1, 1, [0.5, 0.5, 0.5]);
        let front = RgbImage::filled(1, 1, [0.4, 0.4, 0.4]);
        let state = BlendState::default().with_mode(BlendMode::Multiply);
        let out = CpuPrimitives.blend(&back, &front, &state).unwrap();
        assert_abs_diff_eq!(out.pixel(0, 0)[1], 0.2);
    }

    #[test]
    fn test_blend_nan_opacity_keeps_back() {
        let back = RgbImage::filled(2, 2, [0.3, 0.4, 0.5]);
        let front = RgbImage::filled(2, 2, [0.9, 0.1, 0.2]);
        let state = BlendState::with_opacity(f32::NAN);
        assert!(state.is_transparent());
        assert_eq!(CpuPrimitives.blend(&back, &front, &state).unwrap(), back);

        let over = BlendState::with_opacity(f32::INFINITY);
        assert_eq!(CpuPrimitives.blend(&back, &front, &over).unwrap(), front);
    }

    #[test]
    fn test_blend_dimension_mismatch() {
        let back = RgbImage::new(2, 2);
        let front = RgbImage::new(3, 2);
        let err = CpuPrimitives.blend(&back, &front, &BlendState::default()).unwrap_err();
        assert!(err.to_string().contains("2x2"));
    }
}
