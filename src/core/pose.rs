//! 3D rigid pose of the device in the tracking world frame.
//!
//! World frame is gravity aligned with +Y up. The rotation columns are the
//! device axes expressed in world: right, up, backward (out of the screen).

use serde::{Deserialize, Serialize};

use super::vector::{Mat3, Vec3};

/// A rigid transform: rotation followed by translation.
///
/// The same type doubles as the pose of the device (device → world) and as
/// a frame correction applied to the tracking origin.
///
/// ```
/// use marga::core::{Pose, Vec3};
///
/// let a = Pose::from_yaw(std::f32::consts::FRAC_PI_2, Vec3::new(1.0, 0.0, 0.0));
/// let b = Pose::from_translation(Vec3::new(0.0, 0.0, 1.0));
/// let combined = a * b; // b expressed in a's frame
/// assert!((combined.translation.x - 2.0).abs() < 1e-5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub rotation: Mat3,
    pub translation: Vec3,
}

/// A frame correction, applied to a tracking origin.
pub type RigidTransform = Pose;

impl Pose {
    #[inline]
    pub const fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(Mat3::IDENTITY, Vec3::ZERO)
    }

    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self::new(Mat3::IDENTITY, translation)
    }

    /// Yaw-only pose at `translation`.
    #[inline]
    pub fn from_yaw(yaw: f32, translation: Vec3) -> Self {
        Self::new(Mat3::from_yaw(yaw), translation)
    }

    /// Build from a column-major homogeneous 4x4 matrix as delivered by
    /// tracking frameworks. The bottom row is ignored.
    pub fn from_columns(m: [[f32; 4]; 4]) -> Self {
        let col = |i: usize| Vec3::new(m[i][0], m[i][1], m[i][2]);
        Self::new(Mat3::from_cols(col(0), col(1), col(2)), col(3))
    }

    /// Column-major homogeneous 4x4 matrix.
    pub fn to_columns(&self) -> [[f32; 4]; 4] {
        let [c0, c1, c2] = self.rotation.cols;
        let t = self.translation;
        [
            [c0.x, c0.y, c0.z, 0.0],
            [c1.x, c1.y, c1.z, 0.0],
            [c2.x, c2.y, c2.z, 0.0],
            [t.x, t.y, t.z, 1.0],
        ]
    }

    /// Position of the device in world.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.translation
    }

    /// Device up axis in world.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation.cols[1]
    }

    /// Device backward axis in world (out of the screen).
    #[inline]
    pub fn backward(&self) -> Vec3 {
        self.rotation.cols[2]
    }

    /// Device forward axis in world (where the camera looks).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        -self.rotation.cols[2]
    }

    /// Planar heading of the device, robust to how the phone is held.
    ///
    /// When the phone is held upright the backward axis is nearly horizontal
    /// and gives the heading directly. When it lies flat the backward axis
    /// points at the sky and the up axis is used instead, turned half a
    /// revolution about vertical so it agrees with the backward convention.
    /// Whichever axis has the smaller vertical component wins.
    ///
    /// The angle is `atan2(x, z)` of the chosen axis, so a device facing
    /// world -Z has heading 0.
    pub fn heading_yaw(&self) -> f32 {
        let back = self.backward();
        let up = self.up();
        let axis = if back.y.abs() < up.y.abs() { back } else { -up };
        axis.yaw()
    }

    /// The same position with roll and pitch discarded, keeping only the
    /// heading as a rotation about vertical.
    pub fn leveled(&self) -> Pose {
        Pose::from_yaw(self.heading_yaw(), self.translation)
    }

    /// Map a point from this pose's local frame into world.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// Compose: apply `other` in `self`'s frame (`self * other`).
    #[inline]
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose::new(
            self.rotation * other.rotation,
            self.transform_point(other.translation),
        )
    }

    /// Inverse transform. Assumes an orthonormal rotation.
    #[inline]
    pub fn inverse(&self) -> Pose {
        let rt = self.rotation.transpose();
        Pose::new(rt, -(rt * self.translation))
    }

    /// Check if this pose is approximately equal to another, element-wise.
    pub fn approx_eq(&self, other: &Pose, epsilon: f32) -> bool {
        let a = self.to_columns();
        let b = other.to_columns();
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).abs() <= epsilon)
    }
}

impl std::ops::Mul for Pose {
    type Output = Self;

    /// Compose two poses (same as `compose`).
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::angle_diff;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_identity_heading() {
        // Backward axis along +Z, device looks down -Z.
        assert_relative_eq!(Pose::identity().heading_yaw(), 0.0);
    }

    #[test]
    fn test_heading_follows_yaw() {
        for yaw in [0.3, -1.2, FRAC_PI_2, 2.9] {
            let pose = Pose::from_yaw(yaw, Vec3::ZERO);
            assert_relative_eq!(pose.heading_yaw(), yaw, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_heading_ignores_moderate_pitch() {
        let tilted = Pose::new(Mat3::from_yaw(0.8) * Mat3::from_pitch(-0.5), Vec3::ZERO);
        assert_relative_eq!(tilted.heading_yaw(), 0.8, epsilon = 1e-5);
    }

    #[test]
    fn test_heading_phone_flat_uses_up_axis() {
        // Lying screen up with the top of the phone along world -Z: same
        // heading as the upright identity pose.
        let flat = Pose::new(Mat3::from_pitch(-FRAC_PI_2), Vec3::ZERO);
        assert!(flat.backward().y.abs() > 0.99);
        assert!(angle_diff(flat.heading_yaw(), 0.0).abs() < 1e-5);

        let flat_turned = Pose::new(
            Mat3::from_yaw(1.0) * Mat3::from_pitch(-FRAC_PI_2),
            Vec3::ZERO,
        );
        assert_relative_eq!(flat_turned.heading_yaw(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_inverse_compose_identity() {
        let pose = Pose::new(
            Mat3::from_yaw(0.4) * Mat3::from_roll(0.3),
            Vec3::new(1.0, -2.0, 3.0),
        );
        let id = pose * pose.inverse();
        assert!(id.approx_eq(&Pose::identity(), 1e-5));
    }

    #[test]
    fn test_transform_point() {
        let pose = Pose::from_yaw(PI, Vec3::new(1.0, 0.0, 0.0));
        let world = pose.transform_point(Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(world.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(world.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_columns_round_trip() {
        let pose = Pose::from_yaw(0.25, Vec3::new(4.0, 1.0, -2.0));
        assert_eq!(Pose::from_columns(pose.to_columns()), pose);
    }

    #[test]
    fn test_leveled_drops_roll_pitch() {
        let pose = Pose::new(
            Mat3::from_yaw(-0.6) * Mat3::from_pitch(0.2) * Mat3::from_roll(0.1),
            Vec3::new(0.5, 1.5, 2.5),
        );
        let level = pose.leveled();
        assert_relative_eq!(level.up().y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(level.heading_yaw(), pose.heading_yaw(), epsilon = 1e-5);
        assert_eq!(level.translation, pose.translation);
    }
}
