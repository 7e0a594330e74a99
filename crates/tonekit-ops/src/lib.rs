//! # tonekit-ops
//!
//! Pixel stages of the hue/saturation operator and the host-side
//! primitives they run on.
//!
//! # Modules
//!
//! - [`primitives`] - [`Primitives`] trait (per-pixel matrix, blend) and the
//!   rayon-backed [`CpuPrimitives`]
//! - [`vibrance`] - saturation boost attenuated by each pixel's own saturation
//! - [`hue_rotate`] - hue rotation in luma/chroma polar form
//! - [`blend`] - front/back composition under opacity, mask and blend mode
//! - [`tiling`] - parallel pull-based tile evaluation
//!
//! # Example
//!
//! ```rust
//! use tonekit_core::RgbImage;
//! use tonekit_ops::{hue_rotate::HueRotateTransform, vibrance::VibranceTransform};
//!
//! let src = RgbImage::filled(4, 4, [0.6, 0.5, 0.45]);
//! let boosted = VibranceTransform::new(40.0).apply(&src);
//! let rotated = HueRotateTransform::new(0.25).apply(&boosted);
//! assert_eq!(rotated.dimensions(), (4, 4));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blend;
pub mod hue_rotate;
pub mod primitives;
pub mod tiling;
pub mod vibrance;

pub use blend::{BlendComposer, BlendMode, BlendState};
pub use error::{OpsError, OpsResult};
pub use primitives::{CpuPrimitives, Primitives};
