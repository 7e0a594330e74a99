//! Error types for tonekit-core operations.
//!
//! The color math itself never fails: parameter values reach it pre-clamped
//! and undefined steps fall back to identity. What can fail is structure:
//! buffers of the wrong length, tiles that do not fit the image they are
//! pasted into, masks whose size does not match the image.
//!
//! ```rust
//! use tonekit_core::{Error, Rect, RgbImage};
//!
//! let img = RgbImage::new(2, 2);
//! let err = img.crop(Rect::new(1, 1, 2, 2)).unwrap_err();
//! assert!(matches!(err, Error::InvalidRegion { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or reshaping image buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Region extends beyond image bounds.
    ///
    /// Returned when a tile [`crate::rect::Rect`] doesn't fit within the
    /// image it is cut from or pasted into.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Image dimensions don't match for the operation.
    ///
    /// Returned when an operation requires images of the same size
    /// (blending front over back, applying a mask).
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First image width
        a_width: u32,
        /// First image height
        a_height: u32,
        /// Second image width
        b_width: u32,
        /// Second image height
        b_height: u32,
    },

    /// Invalid image dimensions.
    ///
    /// Returned when the data length does not match `width * height * channels`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }
}
