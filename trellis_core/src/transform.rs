// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 affine transform.
//!
//! This type covers what the property algebra needs from 3-D affine
//! transforms (identity, multiply, affine inverse, point mapping) without
//! pulling in a full linear-algebra crate. Every matrix built through the
//! constructors here has a bottom row of `[0, 0, 0, 1]`: a 3×3 linear part
//! plus a translation.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point};

use crate::property::{Composable, InvertError};

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// used by GPU APIs. Points are column vectors, so `a * b` applies `b` first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Relative tolerance below which the linear part counts as singular.
    ///
    /// Compared against `|det L| / (|c0| |c1| |c2|)`, which is 1 for any
    /// rotation and independent of uniform scale.
    pub const SINGULAR_EPSILON: f64 = 1e-10;

    /// Creates a transform from four column arrays.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f64; 4], col1: [f64; 4], col2: [f64; 4], col3: [f64; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Creates a transform from a row-major 3×3 linear part and a translation.
    #[must_use]
    pub const fn from_linear_translation(linear: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        let l = linear;
        let t = translation;
        Self {
            cols: [
                [l[0][0], l[1][0], l[2][0], 0.0],
                [l[0][1], l[1][1], l[2][1], 0.0],
                [l[0][2], l[1][2], l[2][2], 0.0],
                [t[0], t[1], t[2], 1.0],
            ],
        }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Returns the row-major 3×3 linear part.
    #[must_use]
    pub const fn linear(self) -> [[f64; 3]; 3] {
        let c = &self.cols;
        [
            [c[0][0], c[1][0], c[2][0]],
            [c[0][1], c[1][1], c[2][1]],
            [c[0][2], c[1][2], c[2][2]],
        ]
    }

    /// Returns the translation part.
    #[must_use]
    pub const fn translation(self) -> [f64; 3] {
        [self.cols[3][0], self.cols[3][1], self.cols[3][2]]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_uniform_scale(s: f64) -> Self {
        Self::from_scale(s, s, s)
    }

    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Whether the bottom row is exactly `[0, 0, 0, 1]`.
    #[must_use]
    pub fn is_affine(&self) -> bool {
        let c = &self.cols;
        c[0][3] == 0.0 && c[1][3] == 0.0 && c[2][3] == 0.0 && c[3][3] == 1.0
    }

    /// Determinant of the 3×3 linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = self.linear();
        m00 * (m11 * m22 - m12 * m21) - m01 * (m10 * m22 - m12 * m20)
            + m02 * (m10 * m21 - m11 * m20)
    }

    /// Returns the affine inverse, or `None` if the linear part is nearly
    /// singular (see [`SINGULAR_EPSILON`](Self::SINGULAR_EPSILON)) or the
    /// matrix is not affine.
    #[must_use]
    pub fn try_inverse(&self) -> Option<Self> {
        self.try_inverse_with_tolerance(Self::SINGULAR_EPSILON)
    }

    /// Like [`try_inverse`](Self::try_inverse) with an explicit relative
    /// tolerance.
    #[must_use]
    pub fn try_inverse_with_tolerance(&self, epsilon: f64) -> Option<Self> {
        if !self.is_affine() {
            return None;
        }
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = self.linear();
        let det = self.determinant();

        // Squared comparison keeps this free of sqrt.
        let norm_sq = |c: [f64; 4]| c[0] * c[0] + c[1] * c[1] + c[2] * c[2];
        let scale_sq = norm_sq(self.cols[0]) * norm_sq(self.cols[1]) * norm_sq(self.cols[2]);
        if !det.is_finite() || det * det <= epsilon * epsilon * scale_sq {
            return None;
        }

        let inv_det = 1.0 / det;
        let i = [
            [
                (m11 * m22 - m12 * m21) * inv_det,
                (m02 * m21 - m01 * m22) * inv_det,
                (m01 * m12 - m02 * m11) * inv_det,
            ],
            [
                (m12 * m20 - m10 * m22) * inv_det,
                (m00 * m22 - m02 * m20) * inv_det,
                (m02 * m10 - m00 * m12) * inv_det,
            ],
            [
                (m10 * m21 - m11 * m20) * inv_det,
                (m01 * m20 - m00 * m21) * inv_det,
                (m00 * m11 - m01 * m10) * inv_det,
            ],
        ];
        let [tx, ty, tz] = self.translation();
        let t = [
            -(i[0][0] * tx + i[0][1] * ty + i[0][2] * tz),
            -(i[1][0] * tx + i[1][1] * ty + i[1][2] * tz),
            -(i[2][0] * tx + i[2][1] * ty + i[2][2] * tz),
        ];
        Some(Self::from_linear_translation(i, t))
    }

    /// Maps a 3-D point (w = 1).
    #[must_use]
    pub fn transform_point3(&self, p: [f64; 3]) -> [f64; 3] {
        let c = &self.cols;
        let mut out = [0.0; 3];
        for (r, o) in out.iter_mut().enumerate() {
            *o = c[0][r] * p[0] + c[1][r] * p[1] + c[2][r] * p[2] + c[3][r];
        }
        out
    }

    /// Maps a point on the z = 0 plane and drops the resulting z.
    #[must_use]
    pub fn transform_point(&self, p: Point) -> Point {
        let [x, y, _] = self.transform_point3([p.x, p.y, 0.0]);
        Point::new(x, y)
    }

    /// Projects onto the XY plane as a 2-D affine map.
    ///
    /// Exact for transforms that keep the z = 0 plane fixed, such as
    /// translations, scales and rotations about Z.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let c = &self.cols;
        Affine::new([c[0][0], c[0][1], c[1][0], c[1][1], c[3][0], c[3][1]])
    }

    /// Whether every entry is within `epsilon` of the corresponding entry of
    /// `other`.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }

    /// Is this transform [NaN]?
    ///
    /// [NaN]: f64::is_nan
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.cols.iter().flatten().any(|v| v.is_nan())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

impl Composable for Transform3d {
    fn identity() -> Self {
        Self::IDENTITY
    }

    fn compose(&self, later: &Self) -> Self {
        *self * *later
    }

    fn try_invert(&self) -> Result<Self, InvertError> {
        self.try_inverse().ok_or(InvertError::Singular)
    }
}
