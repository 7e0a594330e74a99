//! # tonekit-math
//!
//! Math for the hue/saturation operator:
//!
//! - [`Mat4`] - 4x4 affine color matrix over homogeneous (R, G, B, 1)
//! - [`Mat3x4`] - the reduced form handed to a per-pixel matrix primitive
//! - [`ColorMatrixBuilder`] - saturation, channel scale and contrast matrices,
//!   composed in a fixed order
//! - [`ycc`] - luma/opponent-chroma polar form used by the nonlinear stages
//!
//! # Convention
//!
//! Matrices are stored **row-major** and act on **column vectors**, like
//! the rest of the workspace:
//!
//! ```text
//! | m00 m01 m02 m03 |   | r |
//! | m10 m11 m12 m13 | * | g |
//! | m20 m21 m22 m23 |   | b |
//! | m30 m31 m32 m33 |   | 1 |
//! ```
//!
//! Applying `A` then `B` is `B * A`.
//!
//! ```rust
//! use tonekit_math::ColorMatrixBuilder;
//!
//! let m = ColorMatrixBuilder::new().saturate(0.0).build();
//! let grey = m.transform_rgb([1.0, 0.0, 0.0]);
//! assert!((grey[0] - grey[1]).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod color_matrix;
mod mat4;
pub mod ycc;

pub use color_matrix::*;
pub use mat4::*;
