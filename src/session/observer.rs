//! Session observers.

use std::sync::mpsc::Sender;

use crate::alignment::AlignmentOutcome;
use crate::guidance::{DirectionInfo, TurnWarning, VerticalTransition};
use crate::route::Keypoint;

use super::state::Phase;

/// Everything the presentation side needs from one guidance cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuidanceUpdate {
    pub direction: DirectionInfo,
    pub vertical: Option<VerticalTransition>,
    pub turn_warning: Option<TurnWarning>,
    /// A keypoint was reached this cycle; `direction` already points to
    /// the next one.
    pub arrived: bool,
    /// Keypoints left, the current target included.
    pub remaining: usize,
}

/// Receives session notifications. All methods default to doing nothing.
pub trait SessionObserver {
    fn on_phase_changed(&mut self, _from: Phase, _to: Phase) {}

    fn on_guidance(&mut self, _update: &GuidanceUpdate) {}

    fn on_keypoint_reached(&mut self, _keypoint: &Keypoint, _remaining: usize) {}

    fn on_alignment(&mut self, _outcome: &AlignmentOutcome) {}

    fn on_route_completed(&mut self) {}
}

/// Owned copy of a notification, for channel-based listeners.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionNotification {
    PhaseChanged { from: Phase, to: Phase },
    Guidance(GuidanceUpdate),
    KeypointReached { keypoint: Keypoint, remaining: usize },
    Alignment(AlignmentOutcome),
    RouteCompleted,
}

/// Forwards notifications over a channel. A closed channel is ignored.
impl SessionObserver for Sender<SessionNotification> {
    fn on_phase_changed(&mut self, from: Phase, to: Phase) {
        let _ = self.send(SessionNotification::PhaseChanged { from, to });
    }

    fn on_guidance(&mut self, update: &GuidanceUpdate) {
        let _ = self.send(SessionNotification::Guidance(*update));
    }

    fn on_keypoint_reached(&mut self, keypoint: &Keypoint, remaining: usize) {
        let _ = self.send(SessionNotification::KeypointReached {
            keypoint: *keypoint,
            remaining,
        });
    }

    fn on_alignment(&mut self, outcome: &AlignmentOutcome) {
        let _ = self.send(SessionNotification::Alignment(*outcome));
    }

    fn on_route_completed(&mut self) {
        let _ = self.send(SessionNotification::RouteCompleted);
    }
}
