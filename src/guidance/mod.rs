//! Real-time directional guidance.
//!
//! Each cycle compares the live pose to the head of a [`KeypointQueue`] and
//! produces a [`DirectionInfo`]:
//!
//! - planar distance to the keypoint
//! - clock bearing (`1..=12`, 12 straight ahead)
//! - haptic zone (`1..=6`, 0 reserved for a logic error)
//! - arrival state from an oriented box around the keypoint
//!
//! Bearings are measured against the device heading from
//! [`Pose::heading_yaw`](crate::core::Pose::heading_yaw), optionally
//! corrected by the offset learned by the heading calibrator.

mod direction;
mod engine;
mod presentation;
mod queue;

pub use direction::{
    DirectionInfo, HAPTIC_ERROR_CODE, HapticDirection, TargetState, clock_direction, haptic_code,
};
pub use engine::{GuidanceConfig, GuidanceEngine, TargetBox, TurnWarning, VerticalTransition};
pub use presentation::{
    DirectionStyle, announcement, clock_phrase, haptic_phrase, turn_warning_announcement,
    turn_warning_phrase,
};
pub use queue::{GuidanceStep, KeypointQueue};
