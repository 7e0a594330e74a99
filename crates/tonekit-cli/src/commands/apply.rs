//! Apply command.
//!
//! Runs the hue/saturation operator over a PNG, tile by tile.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use tonekit_ops::tiling::DEFAULT_TILE_SIZE;
use tonekit_ops::{BlendMode, BlendState, CpuPrimitives};

use super::OperatorArgs;
use crate::io::{self, PngImage};

/// Arguments for the `apply` command.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Input PNG
    pub input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub operator: OperatorArgs,

    /// Opacity of the adjusted image over the original [0, 1]
    #[arg(long, default_value = "1.0")]
    pub opacity: f32,

    /// Blend mode: normal, multiply, screen, overlay, softlight, hardlight,
    /// darken, lighten, difference
    #[arg(long, default_value = "normal")]
    pub mode: BlendMode,

    /// Tile edge in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile: u32,
}

/// Run the apply command.
pub fn run(args: ApplyArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.opacity) {
        bail!("opacity must be in [0, 1], got {}", args.opacity);
    }
    let mut op = args.operator.build()?;

    let source = io::read(&args.input)?;
    let (width, height) = source.rgb.dimensions();
    info!(input = %args.input.display(), width, height, version = %op.operation_type(), "applying");

    let state = BlendState::with_opacity(args.opacity).with_mode(args.mode);
    let start = Instant::now();
    let rgb = op
        .render_tiled(&CpuPrimitives, &source.rgb, &state, args.tile)
        .context("Render failed")?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "rendered");

    let result = PngImage {
        rgb,
        alpha: source.alpha,
        depth: source.depth,
    };
    io::write(&args.output, &result)?;
    info!(output = %args.output.display(), "saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Depth;
    use tonekit_adjust::OperationVersion;
    use tonekit_core::RgbImage;

    fn operator(version: OperationVersion) -> OperatorArgs {
        OperatorArgs {
            version,
            hue: None,
            saturation: None,
            vibrance: None,
            luminosity: None,
            contrast: None,
        }
    }

    fn write_source(path: &std::path::Path) -> PngImage {
        let mut rgb = RgbImage::new(20, 12);
        for y in 0..12 {
            for x in 0..20 {
                rgb.set_pixel(x, y, [x as f32 / 19.0, y as f32 / 11.0, 0.5]);
            }
        }
        let image = PngImage {
            rgb,
            alpha: Some(vec![0.5; 240]),
            depth: Depth::Eight,
        };
        io::write(path, &image).unwrap();
        io::read(path).unwrap()
    }

    #[test]
    fn test_neutral_apply_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        let source = write_source(&input);

        let args = ApplyArgs {
            input,
            output: output.clone(),
            operator: operator(OperationVersion::V1),
            opacity: 1.0,
            mode: BlendMode::Normal,
            tile: 7,
        };
        run(args).unwrap();

        let out = io::read(&output).unwrap();
        assert_eq!(out.rgb, source.rgb);
        assert_eq!(out.alpha, source.alpha);
    }

    #[test]
    fn test_apply_changes_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        let source = write_source(&input);

        let mut operator = operator(OperationVersion::V3);
        operator.hue = Some(120.0);
        operator.vibrance = Some(50.0);
        let args = ApplyArgs {
            input,
            output: output.clone(),
            operator,
            opacity: 0.75,
            mode: BlendMode::Normal,
            tile: 8,
        };
        run(args).unwrap();

        let out = io::read(&output).unwrap();
        assert_eq!(out.rgb.dimensions(), source.rgb.dimensions());
        assert_ne!(out.rgb, source.rgb);
        assert_eq!(out.alpha, source.alpha);
    }

    #[test]
    fn test_rejects_bad_opacity() {
        let dir = tempfile::tempdir().unwrap();
        let args = ApplyArgs {
            input: dir.path().join("missing.png"),
            output: dir.path().join("out.png"),
            operator: operator(OperationVersion::V3),
            opacity: 1.5,
            mode: BlendMode::Normal,
            tile: 8,
        };
        assert!(run(args).is_err());
    }
}
