//! Mathematical types shared between the presenter and the producer.
//!
//! These are the canonical representations used in the region layout:
//! fixed size, `#[repr(C)]`, no hidden padding.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, translation, offset
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Unit quaternion - head orientation on the wire.
///
/// Stored `(x, y, z, w)` to match the 4-float sensor field.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    /// X component (i)
    pub x: f32,
    /// Y component (j)
    pub y: f32,
    /// Z component (k)
    pub z: f32,
    /// W component (scalar)
    pub w: f32,
}

impl Quat {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Converts to array `[x, y, z, w]`
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Quaternion length
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Returns the normalized quaternion, or identity if degenerate.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            return Self::IDENTITY;
        }
        Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
    }

    /// Extracts the orientation quaternion from the rotation part of a
    /// transform (Shepperd's method on the upper 3x3).
    ///
    /// The translation and any scale in the fourth row/column are ignored;
    /// callers are expected to pass rigid transforms.
    #[must_use]
    pub fn from_rotation(m: &Mat4) -> Self {
        let (m00, m01, m02) = (m.at(0, 0), m.at(0, 1), m.at(0, 2));
        let (m10, m11, m12) = (m.at(1, 0), m.at(1, 1), m.at(1, 2));
        let (m20, m21, m22) = (m.at(2, 0), m.at(2, 1), m.at(2, 2));

        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalized()
    }
}

/// 4x4 transform matrix, row-major, column-vector convention.
///
/// Element `(row, col)` lives at `m[row * 4 + col]`; the translation sits
/// in the fourth column (`m[3]`, `m[7]`, `m[11]`).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    /// Row-major elements
    pub m: [f32; 16],
}

impl Mat4 {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Creates from a row-major array
    #[must_use]
    pub const fn from_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Element at `(row, col)`
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    /// Pure translation transform
    #[must_use]
    pub fn from_translation(t: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[3] = t.x;
        out.m[7] = t.y;
        out.m[11] = t.z;
        out
    }

    /// Rotation about the Y axis by `radians`
    #[must_use]
    pub fn from_rotation_y(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0] = cos;
        out.m[2] = sin;
        out.m[8] = -sin;
        out.m[10] = cos;
        out
    }

    /// The translation component (fourth column)
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[3], self.m[7], self.m[11])
    }

    /// Returns a copy with the given translation component
    #[must_use]
    pub fn with_translation(mut self, t: Vec3) -> Self {
        self.m[3] = t.x;
        self.m[7] = t.y;
        self.m[11] = t.z;
        self
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [0.0f32; 16];
        for row in 0..4 {
            for col in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += self.m[row * 4 + k] * rhs.m[k * 4 + col];
                }
                out[row * 4 + col] = acc;
            }
        }
        Self { m: out }
    }
}
