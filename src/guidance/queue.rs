//! Keypoints still ahead of the user during navigation.

use std::collections::VecDeque;

use log::info;

use crate::core::{Pose, Vec3};
use crate::error::{MargaError, Result};
use crate::route::Keypoint;

use super::direction::{DirectionInfo, TargetState};
use super::engine::{GuidanceEngine, TurnWarning, VerticalTransition};

/// Result of one guidance cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GuidanceStep {
    /// Still heading for the current keypoint.
    EnRoute(DirectionInfo),
    /// Reached a keypoint; the direction is already toward the new head.
    Arrived {
        reached: Keypoint,
        direction: DirectionInfo,
    },
    /// Reached the final keypoint.
    Completed,
}

/// Ordered keypoints with a head that always exists.
///
/// The head is the keypoint currently being walked to. It is only removed
/// while others remain, so guidance always has a target.
#[derive(Clone, Debug)]
pub struct KeypointQueue {
    head: Keypoint,
    rest: VecDeque<Keypoint>,
    previous: Vec3,
    warned_for_head: bool,
}

impl KeypointQueue {
    /// Build from a simplified route. `start` is where the user begins,
    /// used as the previous keypoint of the first segment.
    pub fn new(keypoints: Vec<Keypoint>, start: Vec3) -> Result<Self> {
        let mut rest = VecDeque::from(keypoints);
        let head = rest.pop_front().ok_or(MargaError::EmptyTrail)?;
        Ok(Self {
            head,
            rest,
            previous: start,
            warned_for_head: false,
        })
    }

    pub fn head(&self) -> &Keypoint {
        &self.head
    }

    /// Location of the keypoint reached before the head.
    pub fn previous(&self) -> Vec3 {
        self.previous
    }

    /// Number of keypoints left, head included.
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Never true; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_final(&self) -> bool {
        self.rest.is_empty()
    }

    /// Iterate head first.
    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        std::iter::once(&self.head).chain(self.rest.iter())
    }

    /// Guidance toward the head with the arrival box matching its position
    /// in the route.
    pub fn direction(&self, engine: &GuidanceEngine, current: &Pose) -> DirectionInfo {
        if self.is_final() {
            engine.direction_to_final(current, &self.head)
        } else {
            engine.direction(current, &self.head)
        }
    }

    /// Run one guidance cycle, dropping the head when it is reached.
    pub fn step(&mut self, engine: &GuidanceEngine, current: &Pose) -> GuidanceStep {
        let direction = self.direction(engine, current);
        if !direction.is_at_target() {
            return GuidanceStep::EnRoute(direction);
        }

        let Some(next) = self.rest.pop_front() else {
            info!("[Guidance] Final keypoint reached");
            return GuidanceStep::Completed;
        };

        let reached = std::mem::replace(&mut self.head, next);
        self.previous = reached.location;
        self.warned_for_head = false;
        info!(
            "[Guidance] Keypoint reached at ({:.2}, {:.2}, {:.2}), {} remaining",
            reached.location.x,
            reached.location.y,
            reached.location.z,
            self.len()
        );
        GuidanceStep::Arrived {
            reached,
            direction: self.direction(engine, current),
        }
    }

    /// Advance warning of the turn at the head, issued at most once per
    /// keypoint.
    ///
    /// Requires the head to be close, a keypoint after it, and a segment
    /// into the head at least as long as the configured minimum.
    pub fn take_turn_warning(
        &mut self,
        engine: &GuidanceEngine,
        current: &Pose,
        direction: &DirectionInfo,
    ) -> Option<TurnWarning> {
        if self.warned_for_head || direction.target_state != TargetState::CloseToTarget {
            return None;
        }
        let after = self.rest.front()?;
        if self.previous.distance(self.head.location) < engine.config().turn_warning_min_segment {
            return None;
        }
        self.warned_for_head = true;
        Some(engine.turn_warning(current, &self.head, after))
    }

    /// Stairs on the segment into the head.
    pub fn vertical_transition(
        &self,
        engine: &GuidanceEngine,
        current: &Pose,
    ) -> Option<VerticalTransition> {
        engine.vertical_transition(current.position(), self.previous, self.head.location)
    }
}
