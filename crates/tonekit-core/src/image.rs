//! Pixel buffers for whole images and tiles.
//!
//! [`Image<N>`] stores `N` interleaved `f32` channels per pixel in
//! row-major order, top-to-bottom:
//!
//! ```text
//! Memory: [R G B R G B R G B ...]  <- Row 0
//!         [R G B R G B R G B ...]  <- Row 1
//! ```
//!
//! The buffer lives behind an [`Arc`], so cloning an image (for example to
//! keep the untouched "back" image next to a transformed "front") is cheap,
//! and writes go through copy-on-write. A source tile handed to a worker is
//! never mutated in place.
//!
//! ```rust
//! use tonekit_core::{RgbImage, Rect};
//!
//! let mut img = RgbImage::filled(4, 4, [0.5, 0.25, 0.125]);
//! img.set_pixel(1, 1, [1.0, 0.0, 0.0]);
//!
//! let tile = img.crop(Rect::new(0, 0, 2, 2)).unwrap();
//! assert_eq!(tile.pixel(1, 1), [1.0, 0.0, 0.0]);
//! ```

use crate::{Error, Rect, Result};
use rayon::prelude::*;
use std::sync::Arc;

/// Three-channel color image or tile.
pub type RgbImage = Image<3>;

/// Single-channel image, used for blend masks.
pub type MaskImage = Image<1>;

/// Owned copy-on-write `f32` pixel buffer with `N` channels per pixel.
#[derive(Clone, PartialEq)]
pub struct Image<const N: usize> {
    /// Pixel data buffer (Arc for cheap cloning)
    data: Arc<Vec<f32>>,
    width: u32,
    height: u32,
}

impl<const N: usize> Image<N> {
    /// Creates a new image filled with zeros.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * N;
        Self {
            data: Arc::new(vec![0.0; len]),
            width,
            height,
        }
    }

    /// Creates an image from existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len()` is not
    /// `width * height * N`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * N;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Creates an image filled with a specific pixel value.
    pub fn filled(width: u32, height: u32, pixel: [f32; N]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * N);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns a mutable reference to the pixel data.
    ///
    /// Clones the buffer first if it is shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * N
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; N] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        let mut result = [0.0; N];
        result.copy_from_slice(&self.data[offset..offset + N]);
        result
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [f32; N]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        let data = Arc::make_mut(&mut self.data);
        data[offset..offset + N].copy_from_slice(&pixel);
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [f32; N])> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Applies a function to each pixel in place, in parallel.
    ///
    /// ```rust
    /// use tonekit_core::RgbImage;
    ///
    /// let mut img = RgbImage::filled(8, 8, [0.25, 0.25, 0.25]);
    /// img.map_pixels(|px| [px[0] * 2.0, px[1] * 2.0, px[2] * 2.0]);
    /// assert_eq!(img.pixel(7, 7), [0.5, 0.5, 0.5]);
    /// ```
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn([f32; N]) -> [f32; N] + Sync + Send,
    {
        let data = Arc::make_mut(&mut self.data);
        data.par_chunks_exact_mut(N).for_each(|chunk| {
            let mut pixel = [0.0; N];
            pixel.copy_from_slice(chunk);
            chunk.copy_from_slice(&f(pixel));
        });
    }

    /// Copies a region out into a new image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if `region` doesn't fit the image.
    pub fn crop(&self, region: Rect) -> Result<Self> {
        self.check_region(region)?;
        let row_len = region.width as usize * N;
        let mut data = Vec::with_capacity(row_len * region.height as usize);
        for y in region.y..region.bottom() {
            let start = self.pixel_offset(region.x, y);
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Ok(Self {
            data: Arc::new(data),
            width: region.width,
            height: region.height,
        })
    }

    /// Copies `tile` into this image with its top-left corner at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the tile doesn't fit.
    pub fn paste(&mut self, tile: &Self, x: u32, y: u32) -> Result<()> {
        let region = Rect::new(x, y, tile.width, tile.height);
        self.check_region(region)?;
        let row_len = tile.width as usize * N;
        let width = self.width as usize;
        let data = Arc::make_mut(&mut self.data);
        for (ty, src) in tile.data.chunks_exact(row_len.max(1)).enumerate() {
            let start = ((y as usize + ty) * width + x as usize) * N;
            data[start..start + row_len].copy_from_slice(src);
        }
        Ok(())
    }

    fn check_region(&self, region: Rect) -> Result<()> {
        if region.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(Error::invalid_region(
                region.x,
                region.y,
                region.width,
                region.height,
                self.width,
                self.height,
            ))
        }
    }
}

impl<const N: usize> std::fmt::Debug for Image<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &N)
            .finish()
    }
}
