//! 3D vector and rotation matrix types.
//!
//! World frame is gravity aligned and right-handed with +Y up. Horizontal
//! ("planar") quantities live in the X/Z plane.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Lengths below this are treated as zero when normalizing.
pub const EPSILON_LENGTH: f32 = 1e-6;

/// A 3D vector in meters (or a unit direction).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    /// World +X.
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    /// World up.
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    /// World +Z.
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    #[inline]
    pub fn try_normalize(self) -> Option<Vec3> {
        let len = self.length();
        if len > EPSILON_LENGTH && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// Drop the vertical component.
    #[inline]
    pub fn planar(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    /// Horizontal (X/Z) distance to another point.
    #[inline]
    pub fn planar_distance(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// The horizontal perpendicular `(z, 0, -x)`, i.e. this vector rotated
    /// a quarter turn about the vertical axis with the height dropped.
    #[inline]
    pub fn horizontal_normal(self) -> Vec3 {
        Vec3::new(self.z, 0.0, -self.x)
    }

    /// Yaw of the horizontal part, `atan2(x, z)`.
    #[inline]
    pub fn yaw(self) -> f32 {
        self.x.atan2(self.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Column-major 3x3 rotation matrix.
///
/// Columns are the device basis vectors expressed in world coordinates:
/// `cols[0]` device right, `cols[1]` device up, `cols[2]` device backward.
/// Device forward is therefore `-cols[2]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Rotation about world up by `yaw` radians.
    ///
    /// Maps +Z onto the planar direction whose [`Vec3::yaw`] is `yaw`.
    #[inline]
    pub fn from_yaw(yaw: f32) -> Self {
        let (s, c) = yaw.sin_cos();
        Self::from_cols(
            Vec3::new(c, 0.0, -s),
            Vec3::Y,
            Vec3::new(s, 0.0, c),
        )
    }

    /// Rotation about world +X by `angle` radians (pitch).
    #[inline]
    pub fn from_pitch(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(Vec3::X, Vec3::new(0.0, c, s), Vec3::new(0.0, -s, c))
    }

    /// Rotation about world +Z by `angle` radians (roll).
    #[inline]
    pub fn from_roll(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(Vec3::new(c, s, 0.0), Vec3::new(-s, c, 0.0), Vec3::Z)
    }

    #[inline]
    pub fn transpose(self) -> Mat3 {
        let [a, b, c] = self.cols;
        Mat3::from_cols(
            Vec3::new(a.x, b.x, c.x),
            Vec3::new(a.y, b.y, c.y),
            Vec3::new(a.z, b.z, c.z),
        )
    }

    #[inline]
    pub fn mul_vec(self, v: Vec3) -> Vec3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    #[inline]
    fn mul(self, rhs: Mat3) -> Mat3 {
        Mat3::from_cols(
            self.mul_vec(rhs.cols[0]),
            self.mul_vec(rhs.cols[1]),
            self.mul_vec(rhs.cols[2]),
        )
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.mul_vec(rhs)
    }
}
