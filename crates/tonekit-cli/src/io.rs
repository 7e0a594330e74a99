//! PNG reading and writing.
//!
//! 8- and 16-bit images are supported. Grayscale and palette images are
//! expanded to RGB on read. Alpha is kept aside untouched and written back
//! with the processed color channels.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tonekit_core::RgbImage;

/// Sample depth of a PNG file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// 8 bits per sample
    Eight,
    /// 16 bits per sample
    Sixteen,
}

impl Depth {
    fn max_value(self) -> f32 {
        match self {
            Depth::Eight => u8::MAX as f32,
            Depth::Sixteen => u16::MAX as f32,
        }
    }
}

/// A decoded PNG: normalized color, optional alpha and the source depth.
#[derive(Debug, Clone)]
pub struct PngImage {
    /// Color channels in `[0, 1]`
    pub rgb: RgbImage,
    /// Alpha channel in `[0, 1]`, one value per pixel
    pub alpha: Option<Vec<f32>>,
    /// Depth to write back at
    pub depth: Depth,
}

/// Reads a PNG file.
pub fn read(path: &Path) -> Result<PngImage> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    let buf_size = reader
        .output_buffer_size()
        .context("cannot determine output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let bytes = &buf[..info.buffer_size()];

    let depth = match info.bit_depth {
        png::BitDepth::Eight => Depth::Eight,
        png::BitDepth::Sixteen => Depth::Sixteen,
        other => bail!("unsupported bit depth {:?}", other),
    };
    let samples: Vec<f32> = match depth {
        Depth::Eight => bytes.iter().map(|&v| v as f32 / depth.max_value()).collect(),
        Depth::Sixteen => bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]) as f32 / depth.max_value())
            .collect(),
    };

    let (rgb, alpha) = match info.color_type {
        png::ColorType::Rgb => (samples, None),
        png::ColorType::Rgba => split_alpha(&samples, 4, |px| [px[0], px[1], px[2]]),
        png::ColorType::Grayscale => (samples.iter().flat_map(|&g| [g, g, g]).collect(), None),
        png::ColorType::GrayscaleAlpha => split_alpha(&samples, 2, |px| [px[0], px[0], px[0]]),
        other => bail!("unsupported color type {:?}", other),
    };

    let rgb = RgbImage::from_data(info.width, info.height, rgb)?;
    Ok(PngImage { rgb, alpha, depth })
}

fn split_alpha(samples: &[f32], stride: usize, color: impl Fn(&[f32]) -> [f32; 3]) -> (Vec<f32>, Option<Vec<f32>>) {
    let mut rgb = Vec::with_capacity(samples.len() / stride * 3);
    let mut alpha = Vec::with_capacity(samples.len() / stride);
    for px in samples.chunks_exact(stride) {
        rgb.extend_from_slice(&color(px));
        alpha.push(px[stride - 1]);
    }
    (rgb, Some(alpha))
}

/// Writes a PNG file at the image's depth, RGB or RGBA depending on alpha.
pub fn write(path: &Path, image: &PngImage) -> Result<()> {
    let (width, height) = image.rgb.dimensions();
    let channels = if image.alpha.is_some() { 4 } else { 3 };

    let mut samples = Vec::with_capacity(image.rgb.pixel_count() * channels);
    match &image.alpha {
        Some(alpha) => {
            if alpha.len() != image.rgb.pixel_count() {
                bail!("alpha has {} values for {} pixels", alpha.len(), image.rgb.pixel_count());
            }
            for (px, a) in image.rgb.data().chunks_exact(3).zip(alpha) {
                samples.extend_from_slice(px);
                samples.push(*a);
            }
        }
        None => samples.extend_from_slice(image.rgb.data()),
    }

    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(if channels == 4 { png::ColorType::Rgba } else { png::ColorType::Rgb });
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let max = image.depth.max_value();
    let quantize = |v: f32| (v.clamp(0.0, 1.0) * max).round();
    let bytes: Vec<u8> = match image.depth {
        Depth::Eight => {
            encoder.set_depth(png::BitDepth::Eight);
            samples.iter().map(|&v| quantize(v) as u8).collect()
        }
        Depth::Sixteen => {
            encoder.set_depth(png::BitDepth::Sixteen);
            samples.iter().flat_map(|&v| (quantize(v) as u16).to_be_bytes()).collect()
        }
    };

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    writer
        .write_image_data(&bytes)
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    writer.finish().context("Failed to finish PNG stream")?;
    Ok(())
}
