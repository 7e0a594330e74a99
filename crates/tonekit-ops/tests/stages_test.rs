//! Stage tests for tonekit-ops.

use tonekit_core::{MaskImage, Rect, RgbImage};
use tonekit_math::ColorMatrixBuilder;
use tonekit_ops::hue_rotate::HueRotateTransform;
use tonekit_ops::tiling::render_tiled;
use tonekit_ops::vibrance::VibranceTransform;
use tonekit_ops::{BlendComposer, BlendMode, BlendState, CpuPrimitives, Primitives};

fn ramp(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / width as f32;
            let v = y as f32 / height as f32;
            img.set_pixel(x, y, [u, v, 1.0 - 0.5 * (u + v)]);
        }
    }
    img
}

#[test]
fn test_stage_chain_on_cpu() {
    let src = ramp(16, 8);
    let matrix = ColorMatrixBuilder::new().saturate(1.4).contrast(20.0, 0.0).build().to_3x4();
    let front = CpuPrimitives.band_combine(&src, &matrix).unwrap();
    let front = VibranceTransform::new(30.0).apply(&front);
    let front = HueRotateTransform::from_degrees(45.0).apply(&front);

    assert_eq!(front.dimensions(), src.dimensions());
    assert!(front.data().iter().all(|c| (0.0..=1.0).contains(c)));
    assert_ne!(front, src);
}

#[test]
fn test_tiled_equals_whole() {
    let src = ramp(37, 23);
    let matrix = ColorMatrixBuilder::new().saturate(0.6).scale_channels(1.1, 1.1, 1.1).build().to_3x4();
    let vibrance = VibranceTransform::new(-40.0);
    let hue = HueRotateTransform::new(0.2);
    let state = BlendState::with_opacity(0.7).with_mode(BlendMode::Screen);

    let stage = |back: &RgbImage, state: &BlendState| {
        let front = CpuPrimitives.band_combine(back, &matrix)?;
        let front = hue.apply(&vibrance.apply(&front));
        BlendComposer::new(&CpuPrimitives).compose(back, &front, state)
    };

    let whole = stage(&src, &state).unwrap();
    for tile_size in [1, 5, 16, 64] {
        let tiled = render_tiled(&src, tile_size, |tile, _| stage(tile, &state)).unwrap();
        assert_eq!(tiled, whole, "tile size {tile_size}");
    }
}

#[test]
fn test_tiled_with_mask() {
    let src = ramp(10, 6);
    let mut mask = MaskImage::new(10, 6);
    for (i, m) in mask.data_mut().iter_mut().enumerate() {
        *m = (i % 4) as f32 / 3.0;
    }
    let state = BlendState::default().with_mask(mask);
    let front = HueRotateTransform::new(0.5).apply(&src);

    let composer = BlendComposer::new(&CpuPrimitives);
    let whole = composer.compose(&src, &front, &state).unwrap();
    let tiled = render_tiled(&src, 4, |tile, rect: Rect| {
        let front = HueRotateTransform::new(0.5).apply(tile);
        composer.compose(tile, &front, &state.for_tile(rect)?)
    })
    .unwrap();
    assert_eq!(tiled, whole);
}

#[test]
fn test_primitives_as_trait_object() {
    let backend: Box<dyn Primitives> = Box::new(CpuPrimitives::new());
    assert_eq!(backend.name(), "cpu");
    let src = ramp(4, 4);
    let composer = BlendComposer::new(backend.as_ref());
    let out = composer.compose(&src, &src, &BlendState::default()).unwrap();
    assert_eq!(out, src);
}
