//! Test utilities for Marga integration tests.
//!
//! Synthetic trails and a scripted pose source.

#![allow(dead_code)]

use marga::core::{Pose, RigidTransform, Vec3};
use marga::tracking::PoseSource;

/// Straight trail of `n` breadcrumbs heading along -Z.
pub fn straight_trail(n: usize, spacing: f32) -> Vec<Vec3> {
    (0..n)
        .map(|i| Vec3::new(0.0, 0.0, -(i as f32) * spacing))
        .collect()
}

/// Ten breadcrumbs from the origin to (0, 0, 5), then ten more to (5, 0, 5).
pub fn right_angle_trail() -> Vec<Vec3> {
    let mut trail: Vec<Vec3> = (0..10)
        .map(|i| Vec3::new(0.0, 0.0, 5.0 * i as f32 / 9.0))
        .collect();
    trail.extend((1..=10).map(|i| Vec3::new(5.0 * i as f32 / 10.0, 0.0, 5.0)));
    trail
}

/// Level corridor, a flight of stairs rising `rise` meters, level again.
pub fn stairs_trail(rise: f32) -> Vec<Vec3> {
    let mut trail = Vec::new();
    for i in 0..10 {
        trail.push(Vec3::new(0.0, 0.0, -(i as f32) * 0.5));
    }
    for i in 1..=10 {
        let t = i as f32 / 10.0;
        trail.push(Vec3::new(0.0, rise * t, -4.5 - 3.0 * t));
    }
    for i in 1..=10 {
        trail.push(Vec3::new(0.0, rise, -7.5 - i as f32 * 0.5));
    }
    trail
}

/// Upright pose at `position` looking toward `target`.
pub fn pose_facing(position: Vec3, target: Vec3) -> Pose {
    let yaw = (position - target)
        .planar()
        .try_normalize()
        .map(|back| back.yaw())
        .unwrap_or(0.0);
    Pose::from_yaw(yaw, position)
}

/// Pose source whose output is set directly by the test.
///
/// A rebase re-expresses the current pose in the new origin, the way a
/// tracker does after its world origin is moved.
#[derive(Debug, Default)]
pub struct ScriptedPoseSource {
    pub pose: Option<Pose>,
    pub rebases: Vec<RigidTransform>,
}

impl ScriptedPoseSource {
    pub fn at(pose: Pose) -> Self {
        Self {
            pose: Some(pose),
            rebases: Vec::new(),
        }
    }

    pub fn set(&mut self, pose: Pose) {
        self.pose = Some(pose);
    }
}

impl PoseSource for ScriptedPoseSource {
    fn current_pose(&self) -> Option<Pose> {
        self.pose
    }

    fn rebase_origin(&mut self, transform: &RigidTransform) {
        self.rebases.push(*transform);
        self.pose = self.pose.map(|pose| transform.inverse() * pose);
    }
}
