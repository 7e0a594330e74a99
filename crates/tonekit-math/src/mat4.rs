//! 4x4 affine color matrices and their 3x4 reduced form.
//!
//! [`Mat4`] is where per-effect color matrices are built and composed.
//! Only the top three rows carry information for an affine transform, so
//! before application the matrix is reduced to a [`Mat3x4`]: three output
//! rows, each `[r, g, b, offset]`.

use std::ops::Mul;

/// A 4x4 matrix over homogeneous (R, G, B, 1) coordinates.
///
/// Stored in row-major order, applied to column vectors.
///
/// # Example
///
/// ```rust
/// use tonekit_math::Mat4;
///
/// let v = [0.25, 0.5, 0.75];
/// assert_eq!(Mat4::IDENTITY.transform_rgb(v), v);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// Matrix elements in row-major order: [row0, row1, row2, row3]
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    /// Zero matrix.
    pub const ZERO: Self = Self { m: [[0.0; 4]; 4] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Creates a per-channel scale matrix.
    #[inline]
    pub const fn diagonal(r: f32, g: f32, b: f32) -> Self {
        Self::from_rows([
            [r, 0.0, 0.0, 0.0],
            [0.0, g, 0.0, 0.0],
            [0.0, 0.0, b, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Returns the transpose of this matrix.
    pub fn transpose(&self) -> Self {
        let mut t = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                t.m[i][j] = self.m[j][i];
            }
        }
        t
    }

    /// Multiplies two matrices (`self * other`) with glam.
    ///
    /// With column vectors the result applies `other` first, then `self`.
    #[inline]
    pub fn mul_mat(&self, other: &Self) -> Self {
        Self::from_glam(self.to_glam() * other.to_glam())
    }

    /// Transforms an RGB triplet as the homogeneous point (r, g, b, 1).
    #[inline]
    pub fn transform_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        self.to_3x4().apply(rgb)
    }

    /// Returns true if this is exactly the identity matrix.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Drops the homogeneous row, keeping the three output rows.
    #[inline]
    pub fn to_3x4(&self) -> Mat3x4 {
        Mat3x4 {
            m: [self.m[0], self.m[1], self.m[2]],
        }
    }

    #[inline]
    fn to_glam(self) -> glam::Mat4 {
        // glam is column-major
        glam::Mat4::from_cols_array_2d(&self.transpose().m)
    }

    #[inline]
    fn from_glam(m: glam::Mat4) -> Self {
        Self { m: m.to_cols_array_2d() }.transpose()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Mat4 * Mat4
impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

/// Affine color matrix in its applied form: three rows of `[r, g, b, offset]`.
///
/// This is the shape a per-pixel band-combine primitive consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3x4 {
    /// Output rows for R, G and B.
    pub m: [[f32; 4]; 3],
}

impl Mat3x4 {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Applies the matrix to one RGB triplet. No clamping.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let [r, g, b] = rgb;
        let row = |i: usize| {
            let m = &self.m[i];
            m[0] * r + m[1] * g + m[2] * b + m[3]
        };
        [row(0), row(1), row(2)]
    }

    /// Returns true if this is exactly the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Mat3x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
