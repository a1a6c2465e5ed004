//! Pose tracking collaborator interface.

use serde::{Deserialize, Serialize};

use crate::core::{Pose, RigidTransform};

/// Why tracking is limited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitedReason {
    ExcessiveMotion,
    InsufficientFeatures,
    Initializing,
    Relocalizing,
}

/// Tracking quality reported by the pose source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    Normal,
    Limited(LimitedReason),
    NotAvailable,
}

impl TrackingState {
    pub fn name(&self) -> &'static str {
        match self {
            TrackingState::Normal => "Normal",
            TrackingState::Limited(LimitedReason::ExcessiveMotion) => "Limited(ExcessiveMotion)",
            TrackingState::Limited(LimitedReason::InsufficientFeatures) => {
                "Limited(InsufficientFeatures)"
            }
            TrackingState::Limited(LimitedReason::Initializing) => "Limited(Initializing)",
            TrackingState::Limited(LimitedReason::Relocalizing) => "Limited(Relocalizing)",
            TrackingState::NotAvailable => "NotAvailable",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, TrackingState::Normal)
    }

    pub fn is_relocalizing(&self) -> bool {
        matches!(self, TrackingState::Limited(LimitedReason::Relocalizing))
    }

    /// `!normal || !relocalizing`.
    ///
    /// No state is both normal and relocalizing, so this is true for every
    /// state. Kept with this exact meaning for callers that depend on it;
    /// see [`is_limited_excluding_relocalization`](Self::is_limited_excluding_relocalization)
    /// for the narrower check.
    pub fn is_degraded_or_missing(&self) -> bool {
        !self.is_normal() || !self.is_relocalizing()
    }

    /// Neither normal nor relocalizing.
    pub fn is_limited_excluding_relocalization(&self) -> bool {
        !self.is_normal() && !self.is_relocalizing()
    }
}

/// Source of device poses.
///
/// Implement this to connect the wayfinding core to a visual-inertial
/// tracking session or a simulation.
///
/// # Example
///
/// ```ignore
/// struct Session { /* tracking framework handle */ }
///
/// impl PoseSource for Session {
///     fn current_pose(&self) -> Option<Pose> {
///         self.frame().map(|f| Pose::from_columns(f.camera_transform()))
///     }
///
///     fn rebase_origin(&mut self, transform: &RigidTransform) {
///         self.set_world_origin(transform.to_columns());
///     }
/// }
/// ```
pub trait PoseSource {
    /// Latest device pose in the current world frame, if any.
    fn current_pose(&self) -> Option<Pose>;

    /// Move the world origin by `transform`.
    ///
    /// `transform` is expressed in the current world frame and becomes the
    /// new origin: a pose `P` reads `transform.inverse() * P` afterwards.
    fn rebase_origin(&mut self, transform: &RigidTransform);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TrackingState; 6] = [
        TrackingState::Normal,
        TrackingState::Limited(LimitedReason::ExcessiveMotion),
        TrackingState::Limited(LimitedReason::InsufficientFeatures),
        TrackingState::Limited(LimitedReason::Initializing),
        TrackingState::Limited(LimitedReason::Relocalizing),
        TrackingState::NotAvailable,
    ];

    #[test]
    fn test_degraded_or_missing_is_always_true() {
        assert!(ALL.iter().all(|s| s.is_degraded_or_missing()));
    }

    #[test]
    fn test_limited_excluding_relocalization() {
        let flagged: Vec<_> = ALL
            .iter()
            .filter(|s| s.is_limited_excluding_relocalization())
            .collect();
        assert_eq!(flagged.len(), 4);
        assert!(!TrackingState::Normal.is_limited_excluding_relocalization());
        assert!(
            !TrackingState::Limited(LimitedReason::Relocalizing)
                .is_limited_excluding_relocalization()
        );
    }
}
