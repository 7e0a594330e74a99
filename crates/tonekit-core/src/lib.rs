//! # tonekit-core
//!
//! Core types shared by every tonekit crate.
//!
//! - [`Image`] - Copy-on-write `f32` pixel buffer used for whole images and tiles
//! - [`Rect`] - Pixel region used for tile bounds
//! - [`REC709_LUMA`] - The luma weights used by every color stage
//! - [`Error`] - Structural errors (bad dimensions, mismatched buffers)
//!
//! ## Pixel model
//!
//! Pixels are display-referred and normalized: every channel of a valid
//! pixel lies in `[0, 1]`. Color operations clamp their output back into
//! that range, the same way an integer-backed host buffer would.
//!
//! ## Crate Structure
//!
//! ```text
//! tonekit-core (this crate)
//!    ^
//!    |
//!    +-- tonekit-math (color matrices, luma/chroma polar form)
//!    +-- tonekit-ops (host primitives, vibrance, hue rotation, blend, tiling)
//!    +-- tonekit-adjust (parameter set, versions, hue/saturation operation)
//!    +-- tonekit-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

pub use error::*;
pub use image::*;
pub use pixel::{
    clamp_unit, luminance_rec709, REC709_LUMA, REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R,
};
pub use rect::*;

/// Prelude module for convenient imports.
///
/// ```
/// use tonekit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, MaskImage, RgbImage};
    pub use crate::pixel::{luminance_rec709, REC709_LUMA};
    pub use crate::rect::Rect;
}
