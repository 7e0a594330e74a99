//! Behavioral tests for the hue/saturation operator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use approx::assert_abs_diff_eq;
use tonekit_adjust::{
    HueSaturationOperation, OperationVersion, ParamKind, ParamSnapshot, ParamUpdate, ParameterSet,
    TransformPipeline,
};
use tonekit_core::{luminance_rec709, MaskImage, RgbImage};
use tonekit_math::ycc::channel_spread;
use tonekit_ops::{BlendMode, BlendState, CpuPrimitives};

fn test_image(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let u = (x as f32 + 0.5) / width as f32;
            let v = (y as f32 + 0.5) / height as f32;
            img.set_pixel(x, y, [u, 0.3 + 0.4 * v, 1.0 - u * v]);
        }
    }
    img
}

#[test]
fn test_defaults_are_identity_for_every_version() {
    let back = test_image(9, 7);
    for version in OperationVersion::ALL {
        let mut op = HueSaturationOperation::new(version);
        assert!(op.is_neutral_default());
        let out = op.render(&CpuPrimitives, &back, &BlendState::default()).unwrap();
        assert_eq!(out, back, "{version}");
    }
}

#[test]
fn test_version_contracts() {
    use ParamKind::*;
    let keys = |v| HueSaturationOperation::new(v).parameter_keys().to_vec();
    assert_eq!(keys(OperationVersion::V1), vec![Saturation, Luminosity, Contrast]);
    assert_eq!(keys(OperationVersion::V2), vec![Saturation, Hue, Contrast]);
    assert_eq!(keys(OperationVersion::V3), vec![Hue, Saturation, Vibrance, Luminosity, Contrast]);
    assert_eq!(OperationVersion::V2.type_name(), "Hue/Saturation V2");
}

#[test]
fn test_registration_order_does_not_change_output() {
    let mut forward = ParameterSet::new();
    let mut backward = ParameterSet::new();
    for kind in ParamKind::ALL {
        forward.add_parameter_key(kind);
    }
    for kind in ParamKind::ALL.iter().rev() {
        backward.add_parameter_key(*kind);
    }
    let values = [
        (ParamKind::Hue, 40.0),
        (ParamKind::Saturation, 30.0),
        (ParamKind::Vibrance, 25.0),
        (ParamKind::Luminosity, -10.0),
        (ParamKind::Contrast, 15.0),
    ];
    forward.set_parameter_values(&values).unwrap();
    backward.set_parameter_values(&values).unwrap();
    assert_ne!(forward.keys(), backward.keys());

    let back = test_image(6, 6);
    let state = BlendState::default();
    let a = TransformPipeline::from_snapshot(forward.snapshot()).render(&CpuPrimitives, &back, &state).unwrap();
    let b = TransformPipeline::from_snapshot(backward.snapshot()).render(&CpuPrimitives, &back, &state).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_saturation_extremes() {
    let back = test_image(5, 5);

    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    op.set_parameter_value(ParamKind::Saturation, -100.0).unwrap();
    let grey = op.render(&CpuPrimitives, &back, &BlendState::default()).unwrap();
    for (_, _, px) in grey.pixels() {
        assert_abs_diff_eq!(px[0], px[1], epsilon = 1e-5);
        assert_abs_diff_eq!(px[1], px[2], epsilon = 1e-5);
    }
    for ((_, _, g), (_, _, src)) in grey.pixels().zip(back.pixels()) {
        assert_abs_diff_eq!(g[0], luminance_rec709(src), epsilon = 1e-5);
    }

    op.set_parameter_value(ParamKind::Saturation, 0.0).unwrap();
    assert_eq!(op.render(&CpuPrimitives, &back, &BlendState::default()).unwrap(), back);
}

#[test]
fn test_saturation_is_monotonic() {
    let px = [0.55, 0.45, 0.4];
    let mut last = -1.0;
    for s in [-100.0, -50.0, 0.0, 25.0, 50.0] {
        let snap = ParamSnapshot::NEUTRAL.with(ParamKind::Saturation, s);
        let out = TransformPipeline::from_snapshot(snap).band_combine_matrix().apply(px);
        let spread = channel_spread(out);
        assert!(spread >= last, "saturation {s}");
        last = spread;
    }
}

#[test]
fn test_rounding_idempotence() {
    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    for (kind, raw) in [
        (ParamKind::Hue, 12.7),
        (ParamKind::Saturation, -33.5),
        (ParamKind::Contrast, 200.0),
        (ParamKind::Luminosity, 0.49),
    ] {
        op.set_parameter_value(kind, raw).unwrap();
        let stored = op.value(kind).unwrap();
        assert_eq!(op.set_parameter_value(kind, stored).unwrap(), ParamUpdate::Unchanged);
        assert_eq!(op.value(kind), Some(stored));
    }
    assert_eq!(op.value(ParamKind::Hue), Some(13.0));
    assert_eq!(op.value(ParamKind::Contrast), Some(127.0));
}

#[test]
fn test_vibrance_spares_saturated_pixels() {
    let back = RgbImage::from_data(2, 1, vec![0.0, 0.0, 1.0, 0.45, 0.47, 0.52]).unwrap();
    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    op.set_parameter_value(ParamKind::Vibrance, 100.0).unwrap();
    let out = op.render(&CpuPrimitives, &back, &BlendState::default()).unwrap();

    assert_eq!(out.pixel(0, 0), back.pixel(0, 0));
    assert!(channel_spread(out.pixel(1, 0)) > channel_spread(back.pixel(1, 0)));
}

#[test]
fn test_hue_half_turn_either_direction() {
    let back = test_image(8, 8);
    let render = |hue: f32| {
        let mut op = HueSaturationOperation::new(OperationVersion::V3);
        op.set_parameter_value(ParamKind::Hue, hue).unwrap();
        op.render(&CpuPrimitives, &back, &BlendState::default()).unwrap()
    };
    let cw = render(180.0);
    assert_eq!(cw, render(-180.0));
    assert_ne!(cw, back);
}

#[test]
fn test_blend_opacity_and_back_untouched() {
    let back = test_image(4, 4);
    let keep = back.clone();
    let mut op = HueSaturationOperation::new(OperationVersion::V2);
    op.set_parameter_values(&[(ParamKind::Hue, 90.0), (ParamKind::Saturation, 40.0)]).unwrap();

    let front = op.pipeline().front(&CpuPrimitives, &back).unwrap();
    let half = op.render(&CpuPrimitives, &back, &BlendState::with_opacity(0.5)).unwrap();
    for ((_, _, h), ((_, _, f), (_, _, b))) in half.pixels().zip(front.pixels().zip(back.pixels())) {
        for ch in 0..3 {
            assert_abs_diff_eq!(h[ch], 0.5 * (f[ch] + b[ch]), epsilon = 1e-5);
        }
    }
    assert_eq!(back, keep);
}

#[test]
fn test_tiled_equals_single_pass() {
    let back = test_image(41, 29);
    let mut mask = MaskImage::new(41, 29);
    for (i, m) in mask.data_mut().iter_mut().enumerate() {
        *m = (i % 11) as f32 / 10.0;
    }
    let state = BlendState::with_opacity(0.8).with_mask(mask).with_mode(BlendMode::Overlay);

    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    op.set_parameter_values(&[
        (ParamKind::Hue, -60.0),
        (ParamKind::Saturation, 20.0),
        (ParamKind::Vibrance, 35.0),
        (ParamKind::Luminosity, 10.0),
        (ParamKind::Contrast, -25.0),
    ])
    .unwrap();

    let whole = op.render(&CpuPrimitives, &back, &state).unwrap();
    for tile in [1, 7, 16, 128] {
        let tiled = op.render_tiled(&CpuPrimitives, &back, &state, tile).unwrap();
        assert_eq!(tiled, whole, "tile size {tile}");
    }
}

#[test]
fn test_concurrent_snapshots_are_consistent() {
    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    let reader = op.reader();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            let reader = reader.clone();
            let done = &done;
            scope.spawn(move || {
                let mut seen = 0usize;
                while !done.load(Ordering::Acquire) || seen == 0 {
                    let snap = reader.snapshot();
                    // every batch writes the same value to both controls
                    assert_eq!(snap.get(ParamKind::Saturation), snap.get(ParamKind::Contrast));
                    assert_eq!(snap.get(ParamKind::Saturation), -snap.get(ParamKind::Luminosity));
                    seen += 1;
                }
            });
        }

        for round in 0..2000 {
            let v = (round % 200 - 100) as f32;
            op.set_parameter_values(&[
                (ParamKind::Saturation, v),
                (ParamKind::Contrast, v),
                (ParamKind::Luminosity, -v),
            ])
            .unwrap();
        }
        done.store(true, Ordering::Release);
    });

    let last = op.snapshot();
    assert_eq!(reader.snapshot(), last);
}

#[test]
fn test_reader_pipeline_matches_operation() {
    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    op.set_parameter_values(&[(ParamKind::Vibrance, 50.0), (ParamKind::Hue, 45.0)]).unwrap();
    let from_reader = TransformPipeline::from_snapshot(op.reader().snapshot());
    assert_eq!(*op.pipeline(), from_reader);
}

#[test]
fn test_tiles_never_mix_two_updates() {
    let back = test_image(12, 12);
    let state = BlendState::default();
    let neutral = ParamSnapshot::NEUTRAL;
    let first = neutral.with(ParamKind::Saturation, 10.0);
    let second = first.with(ParamKind::Saturation, 50.0).with(ParamKind::Contrast, 20.0);
    let torn = first.with(ParamKind::Contrast, 20.0);

    let render = |snap| {
        TransformPipeline::from_snapshot(snap)
            .render(&CpuPrimitives, &back, &state)
            .unwrap()
    };
    let expected = [render(neutral), render(first), render(second)];
    let mixed = render(torn);
    assert!(expected.iter().all(|img| *img != mixed));

    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    let reader = op.reader();
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..3 {
            let reader = reader.clone();
            let (back, state, done, expected, mixed) = (&back, &state, &done, &expected, &mixed);
            scope.spawn(move || {
                loop {
                    let finished = done.load(Ordering::Acquire);
                    let out = TransformPipeline::from_snapshot(reader.snapshot())
                        .render_tiled(&CpuPrimitives, back, state, 4)
                        .unwrap();
                    assert!(expected.contains(&out));
                    assert_ne!(&out, mixed);
                    if finished {
                        break;
                    }
                }
            });
        }

        for _ in 0..50 {
            op.set_parameter_value(ParamKind::Saturation, 10.0).unwrap();
            op.set_parameter_values(&[(ParamKind::Saturation, 50.0), (ParamKind::Contrast, 20.0)])
                .unwrap();
            op.set_parameter_values(&[(ParamKind::Saturation, 0.0), (ParamKind::Contrast, 0.0)])
                .unwrap();
        }
        done.store(true, Ordering::Release);
    });

    assert_eq!(op.snapshot(), neutral);
}

#[test]
fn test_mask_size_must_match_in_both_render_paths() {
    let back = test_image(4, 4);
    let state = BlendState::with_opacity(0.5).with_mask(MaskImage::new(8, 8));
    let mut op = HueSaturationOperation::new(OperationVersion::V3);
    op.set_parameter_value(ParamKind::Saturation, 40.0).unwrap();

    assert!(op.render(&CpuPrimitives, &back, &state).is_err());
    assert!(op.render_tiled(&CpuPrimitives, &back, &state, 2).is_err());
}
