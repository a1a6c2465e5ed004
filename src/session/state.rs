//! Session phases, input events and output effects.

use crate::tracking::TrackingState;

/// Where the user is in the record / pause / resume / navigate cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing running.
    Idle,

    /// Dropping breadcrumbs along the walked route.
    Recording,

    /// A route is available.
    ReadyToNavigate {
        /// Pausing is offered only right after recording.
        allow_pause: bool,
    },

    /// Giving turn-by-turn guidance.
    Navigating,

    /// User asked to pause and is lining the phone up with a landmark.
    PauseRequested,

    /// Phone held still before the reference pose is captured.
    PauseWaiting,

    /// Reference pose captured; the route can be resumed later.
    Paused,

    /// User is back at the landmark and lining the phone up again.
    ResumeRequested {
        /// Tracking was given the saved environment and may recognise it.
        relocalizing: bool,
    },

    /// Phone held still before the live frame is rebased.
    ResumeWaiting {
        /// Tracking was given the saved environment and may recognise it.
        relocalizing: bool,
    },

    /// Final keypoint reached.
    Completed,
}

impl Phase {
    /// Phase name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Recording => "Recording",
            Phase::ReadyToNavigate { .. } => "ReadyToNavigate",
            Phase::Navigating => "Navigating",
            Phase::PauseRequested => "PauseRequested",
            Phase::PauseWaiting => "PauseWaiting",
            Phase::Paused => "Paused",
            Phase::ResumeRequested { .. } => "ResumeRequested",
            Phase::ResumeWaiting { .. } => "ResumeWaiting",
            Phase::Completed => "Completed",
        }
    }

    /// Any timer-driven activity running?
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Phase::Recording
                | Phase::Navigating
                | Phase::PauseWaiting
                | Phase::ResumeWaiting { .. }
        )
    }
}

/// Inputs that drive the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    StartRecording,
    StopRecording,
    /// A saved route was loaded, with or without a reference pose to
    /// realign onto.
    RouteLoaded {
        anchored: bool,
    },
    StartNavigation,
    /// Guidance reached the final keypoint.
    RouteCompleted,
    RequestPause,
    /// User confirmed the phone is lined up with the landmark.
    ConfirmAlignment,
    /// The hold-still period elapsed.
    WaitElapsed,
    Resume {
        relocalizing: bool,
    },
    TrackingChanged(TrackingState),
    /// Abandon whatever is running.
    Cancel,
}

impl Event {
    /// Event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartRecording => "StartRecording",
            Event::StopRecording => "StopRecording",
            Event::RouteLoaded { .. } => "RouteLoaded",
            Event::StartNavigation => "StartNavigation",
            Event::RouteCompleted => "RouteCompleted",
            Event::RequestPause => "RequestPause",
            Event::ConfirmAlignment => "ConfirmAlignment",
            Event::WaitElapsed => "WaitElapsed",
            Event::Resume { .. } => "Resume",
            Event::TrackingChanged(_) => "TrackingChanged",
            Event::Cancel => "Cancel",
        }
    }
}

/// Side effects requested by a transition, executed in order by the
/// session controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    StartBreadcrumbSampling,
    StopBreadcrumbSampling,
    /// Freeze the breadcrumb trail into a route.
    FinalizeRecording,
    /// Clear the heading windows and the learned offset.
    ResetHeadingWindow,
    StartHeadingSampling,
    StopHeadingSampling,
    /// Simplify the route into the keypoint queue.
    BuildKeypoints,
    StartGuidance,
    StopGuidance,
    StartWaitTimer,
    CancelWaitTimer,
    /// Store the live pose as the realignment reference.
    CaptureReference,
    ArmAlignment,
    ApplyAlignment,
    /// Tracking recovered the saved frame; drop the pending rebase.
    SuppressAlignment,
    CancelAlignment,
    NotifyRouteCompleted,
}
