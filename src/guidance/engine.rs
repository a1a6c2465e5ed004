//! Turn-by-turn guidance from the live pose to the next keypoint.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::core::math::angle_diff;
use crate::core::{Pose, Vec3};
use crate::error::{MargaError, Result};
use crate::route::Keypoint;

use super::direction::{DirectionInfo, TargetState, clock_direction, haptic_code};

/// Arrival box around a keypoint, in the keypoint's own frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetBox {
    /// Remaining distance along the keypoint orientation (meters).
    pub depth: f32,
    /// How far above the keypoint still counts (meters).
    pub height: f32,
    /// Sideways tolerance (meters).
    pub width: f32,
}

impl TargetBox {
    pub const fn new(depth: f32, height: f32, width: f32) -> Self {
        Self {
            depth,
            height,
            width,
        }
    }
}

/// Configuration for the guidance engine.
#[derive(Clone, Debug)]
pub struct GuidanceConfig {
    /// Arrival box for intermediate keypoints.
    /// Default: 0.5 deep, 3 high, 2 wide
    pub target: TargetBox,
    /// Arrival box for the final keypoint.
    /// Default: 1 deep, 3 high, 1 wide
    pub last_target: TargetBox,
    /// Planar radius inside which a keypoint counts as close.
    /// Default: 4m
    pub close_radius: f32,
    /// Shortest segment that earns an advance turn warning.
    /// Default: 6m
    pub turn_warning_min_segment: f32,
    /// Slope beyond which a segment is treated as stairs.
    /// Default: 0.3
    pub vertical_slope_threshold: f32,
    /// Minimum height change for a vertical transition.
    /// Default: 1m
    pub vertical_min_rise: f32,
    /// Add the calibrated heading offset to the device heading.
    /// Default: false
    pub use_heading_offset: bool,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            target: TargetBox::new(0.5, 3.0, 2.0),
            last_target: TargetBox::new(1.0, 3.0, 1.0),
            close_radius: 4.0,
            turn_warning_min_segment: 6.0,
            vertical_slope_threshold: 0.3,
            vertical_min_rise: 1.0,
            use_heading_offset: false,
        }
    }
}

impl GuidanceConfig {
    /// Builder-style setter for the intermediate arrival box.
    pub fn with_target(mut self, target: TargetBox) -> Self {
        self.target = target;
        self
    }

    /// Builder-style setter for heading offset use.
    pub fn with_heading_offset(mut self, enabled: bool) -> Self {
        self.use_heading_offset = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let values = [
            ("target.depth", self.target.depth),
            ("target.height", self.target.height),
            ("target.width", self.target.width),
            ("last_target.depth", self.last_target.depth),
            ("last_target.height", self.last_target.height),
            ("last_target.width", self.last_target.width),
            ("close_radius", self.close_radius),
            ("turn_warning_min_segment", self.turn_warning_min_segment),
            ("vertical_slope_threshold", self.vertical_slope_threshold),
            ("vertical_min_rise", self.vertical_min_rise),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(MargaError::InvalidConfig(format!(
                    "guidance.{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Stairs between the previous and the next keypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalTransition {
    Upstairs,
    Downstairs,
}

/// Advance notice of the turn at the next keypoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnWarning {
    /// Clock bearing of the segment after the next keypoint.
    pub clock_direction: u8,
    pub angle_diff: f32,
}

/// Computes [`DirectionInfo`] from a pose and a keypoint.
///
/// Pure apart from the stored heading offset, which only changes through
/// [`set_heading_offset`](Self::set_heading_offset).
#[derive(Clone, Debug, Default)]
pub struct GuidanceEngine {
    config: GuidanceConfig,
    heading_offset: Option<f32>,
}

impl GuidanceEngine {
    pub fn new(config: GuidanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            heading_offset: None,
        })
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    pub fn heading_offset(&self) -> Option<f32> {
        self.heading_offset
    }

    pub fn set_heading_offset(&mut self, offset: Option<f32>) {
        self.heading_offset = offset;
    }

    /// Heading used for bearings: the device heading plus the calibrated
    /// offset when offset use is enabled.
    pub fn device_yaw(&self, current: &Pose) -> f32 {
        let yaw = current.heading_yaw();
        match self.heading_offset {
            Some(offset) if self.config.use_heading_offset => yaw + offset,
            _ => yaw,
        }
    }

    /// Guidance toward an intermediate keypoint.
    pub fn direction(&self, current: &Pose, next: &Keypoint) -> DirectionInfo {
        self.direction_with_target(current, next, &self.config.target)
    }

    /// Guidance toward the final keypoint of the route.
    pub fn direction_to_final(&self, current: &Pose, next: &Keypoint) -> DirectionInfo {
        self.direction_with_target(current, next, &self.config.last_target)
    }

    /// Guidance toward `next` using a specific arrival box.
    pub fn direction_with_target(
        &self,
        current: &Pose,
        next: &Keypoint,
        target: &TargetBox,
    ) -> DirectionInfo {
        let position = current.position();
        let yaw = self.device_yaw(current);
        let diff = self.bearing(yaw, position, next.location);

        let info = DirectionInfo {
            distance: position.planar_distance(next.location),
            clock_direction: clock_direction(diff),
            haptic_direction: haptic_code(diff),
            target_state: self.classify(position, next, target),
            angle_diff: diff,
            lateral_ratio_at_crossing: lateral_ratio_at_crossing(yaw, position, next, target.width),
        };
        trace!(
            "[Guidance] dist={:.2}m clock={} haptic={} state={}",
            info.distance,
            info.clock_direction,
            info.haptic_direction,
            info.target_state.name()
        );
        info
    }

    /// Bearing of the turn at `next`, as seen from the current heading.
    ///
    /// The keypoint after next is shifted back by the offset to `next`, so
    /// the result describes the direction of the following segment.
    pub fn turn_warning(&self, current: &Pose, next: &Keypoint, after: &Keypoint) -> TurnWarning {
        let position = current.position();
        let shifted = after.location - (next.location - position).planar();
        let diff = self.bearing(self.device_yaw(current), position, shifted);
        TurnWarning {
            clock_direction: clock_direction(diff),
            angle_diff: diff,
        }
    }

    /// Whether the segment from `previous` to `next` climbs or descends
    /// steeply enough to be stairs.
    pub fn vertical_transition(
        &self,
        current: Vec3,
        previous: Vec3,
        next: Vec3,
    ) -> Option<VerticalTransition> {
        let rise = next.y - previous.y;
        if rise.abs() <= self.config.vertical_min_rise {
            return None;
        }
        let slope = rise / current.planar_distance(next);
        if slope > self.config.vertical_slope_threshold {
            Some(VerticalTransition::Upstairs)
        } else if slope < -self.config.vertical_slope_threshold {
            Some(VerticalTransition::Downstairs)
        } else {
            None
        }
    }

    fn bearing(&self, yaw: f32, position: Vec3, target: Vec3) -> f32 {
        // Both angles use the backward convention of `Pose::heading_yaw`.
        let angle_to_target = (position - target).yaw();
        angle_diff(yaw, angle_to_target)
    }

    fn classify(&self, position: Vec3, next: &Keypoint, target: &TargetBox) -> TargetState {
        let offset = next.location - position;
        // Orientation points into the keypoint, so depth is measured from
        // the device toward it. Height is signed: only rising above the
        // keypoint leaves the box.
        let depth = offset.dot(next.orientation);
        let height = (position - next.location).dot(Vec3::Y);
        let width = offset.dot(next.orientation.cross(Vec3::Y)).abs();

        if depth <= target.depth && height <= target.height && width <= target.width {
            TargetState::AtTarget
        } else if (depth * depth + width * width).sqrt() <= self.config.close_radius {
            TargetState::CloseToTarget
        } else {
            TargetState::NotAtTarget
        }
    }
}

/// Sideways miss where a ray along the current heading crosses the plane
/// through `next` normal to its orientation, relative to `width`.
fn lateral_ratio_at_crossing(yaw: f32, position: Vec3, next: &Keypoint, width: f32) -> f32 {
    let forward = -Vec3::new(yaw.sin(), 0.0, yaw.cos());
    let approach = forward.dot(next.orientation);
    if approach <= f32::EPSILON {
        return f32::INFINITY;
    }
    let t = (next.location - position).dot(next.orientation) / approach;
    if t < 0.0 {
        return f32::INFINITY;
    }
    let crossing = position + forward * t;
    let lateral = (crossing - next.location)
        .dot(next.orientation.cross(Vec3::Y))
        .abs();
    if width > 0.0 {
        lateral / width
    } else {
        f32::INFINITY
    }
}
