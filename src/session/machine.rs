//! Session transition function.

use super::state::{Effect, Event, Phase};

/// Next phase and the effects to run for `event` in `phase`.
///
/// Total: every pair has an answer. Events that make no sense in the
/// current phase leave it unchanged and request nothing.
pub fn transition(phase: &Phase, event: &Event) -> (Phase, Vec<Effect>) {
    use Effect::*;

    match (*phase, *event) {
        // Recording
        (Phase::Idle | Phase::Completed, Event::StartRecording) => (
            Phase::Recording,
            vec![
                ResetHeadingWindow,
                StartBreadcrumbSampling,
                StartHeadingSampling,
            ],
        ),
        (Phase::Recording, Event::StopRecording) => (
            Phase::ReadyToNavigate { allow_pause: true },
            vec![
                StopBreadcrumbSampling,
                StopHeadingSampling,
                FinalizeRecording,
            ],
        ),

        // Navigation
        (Phase::ReadyToNavigate { .. }, Event::StartNavigation) => (
            Phase::Navigating,
            vec![
                BuildKeypoints,
                ResetHeadingWindow,
                StartGuidance,
                StartHeadingSampling,
            ],
        ),
        (Phase::Navigating, Event::RouteCompleted) => (
            Phase::Completed,
            vec![StopGuidance, StopHeadingSampling, NotifyRouteCompleted],
        ),

        // Pause
        (Phase::Recording, Event::RequestPause) => (
            Phase::PauseRequested,
            vec![
                StopBreadcrumbSampling,
                StopHeadingSampling,
                FinalizeRecording,
            ],
        ),
        (Phase::ReadyToNavigate { allow_pause: true }, Event::RequestPause) => {
            (Phase::PauseRequested, Vec::new())
        }
        (Phase::PauseRequested, Event::ConfirmAlignment) => {
            (Phase::PauseWaiting, vec![StartWaitTimer])
        }
        (Phase::PauseWaiting, Event::WaitElapsed) => (Phase::Paused, vec![CaptureReference]),
        (Phase::Idle, Event::RouteLoaded { anchored: true }) => (Phase::Paused, Vec::new()),
        (Phase::Idle, Event::RouteLoaded { anchored: false }) => {
            (Phase::ReadyToNavigate { allow_pause: false }, Vec::new())
        }

        // Resume
        (Phase::Paused, Event::Resume { relocalizing }) => {
            (Phase::ResumeRequested { relocalizing }, Vec::new())
        }
        (Phase::ResumeRequested { relocalizing }, Event::ConfirmAlignment) => (
            Phase::ResumeWaiting { relocalizing },
            vec![ArmAlignment, StartWaitTimer],
        ),
        (Phase::ResumeWaiting { .. }, Event::WaitElapsed) => (
            Phase::ReadyToNavigate { allow_pause: false },
            vec![ApplyAlignment],
        ),
        // Tracking recognised the saved environment by itself: the frames
        // already coincide and a rebase would double the correction.
        (Phase::ResumeRequested { relocalizing: true }, Event::TrackingChanged(state))
            if state.is_normal() =>
        {
            (
                Phase::ReadyToNavigate { allow_pause: false },
                vec![SuppressAlignment],
            )
        }
        (Phase::ResumeWaiting { relocalizing: true }, Event::TrackingChanged(state))
            if state.is_normal() =>
        {
            (
                Phase::ReadyToNavigate { allow_pause: false },
                vec![CancelWaitTimer, SuppressAlignment],
            )
        }

        // Cancel
        (Phase::Recording, Event::Cancel) => (
            Phase::Idle,
            vec![StopBreadcrumbSampling, StopHeadingSampling],
        ),
        (Phase::Navigating, Event::Cancel) => {
            (Phase::Idle, vec![StopGuidance, StopHeadingSampling])
        }
        (Phase::PauseWaiting, Event::Cancel) => (Phase::Idle, vec![CancelWaitTimer]),
        (Phase::ResumeWaiting { .. }, Event::Cancel) => {
            (Phase::Idle, vec![CancelWaitTimer, CancelAlignment])
        }
        (_, Event::Cancel) => (Phase::Idle, Vec::new()),

        (current, _) => (current, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{LimitedReason, TrackingState};

    fn all_phases() -> Vec<Phase> {
        vec![
            Phase::Idle,
            Phase::Recording,
            Phase::ReadyToNavigate { allow_pause: true },
            Phase::ReadyToNavigate { allow_pause: false },
            Phase::Navigating,
            Phase::PauseRequested,
            Phase::PauseWaiting,
            Phase::Paused,
            Phase::ResumeRequested { relocalizing: true },
            Phase::ResumeRequested { relocalizing: false },
            Phase::ResumeWaiting { relocalizing: true },
            Phase::ResumeWaiting { relocalizing: false },
            Phase::Completed,
        ]
    }

    fn all_events() -> Vec<Event> {
        vec![
            Event::StartRecording,
            Event::StopRecording,
            Event::RouteLoaded { anchored: true },
            Event::RouteLoaded { anchored: false },
            Event::StartNavigation,
            Event::RouteCompleted,
            Event::RequestPause,
            Event::ConfirmAlignment,
            Event::WaitElapsed,
            Event::Resume { relocalizing: true },
            Event::Resume { relocalizing: false },
            Event::TrackingChanged(TrackingState::Normal),
            Event::TrackingChanged(TrackingState::Limited(LimitedReason::Relocalizing)),
            Event::TrackingChanged(TrackingState::NotAvailable),
            Event::Cancel,
        ]
    }

    #[test]
    fn test_ignored_events_have_no_effects() {
        for phase in all_phases() {
            for event in all_events() {
                let (next, effects) = transition(&phase, &event);
                if next == phase {
                    assert!(
                        effects.is_empty(),
                        "{} + {} kept phase but emitted {:?}",
                        phase.name(),
                        event.name(),
                        effects
                    );
                }
            }
        }
    }

    #[test]
    fn test_record_then_navigate() {
        let (phase, effects) = transition(&Phase::Idle, &Event::StartRecording);
        assert_eq!(phase, Phase::Recording);
        assert!(effects.contains(&Effect::ResetHeadingWindow));
        assert!(effects.contains(&Effect::StartBreadcrumbSampling));

        let (phase, effects) = transition(&phase, &Event::StopRecording);
        assert_eq!(phase, Phase::ReadyToNavigate { allow_pause: true });
        assert_eq!(effects.last(), Some(&Effect::FinalizeRecording));

        let (phase, effects) = transition(&phase, &Event::StartNavigation);
        assert_eq!(phase, Phase::Navigating);
        assert_eq!(effects.first(), Some(&Effect::BuildKeypoints));
        assert!(effects.contains(&Effect::ResetHeadingWindow));

        let (phase, effects) = transition(&phase, &Event::RouteCompleted);
        assert_eq!(phase, Phase::Completed);
        assert!(effects.contains(&Effect::StopGuidance));
    }

    #[test]
    fn test_pause_and_resume_cycle() {
        let ready = Phase::ReadyToNavigate { allow_pause: true };
        let (phase, _) = transition(&ready, &Event::RequestPause);
        assert_eq!(phase, Phase::PauseRequested);
        let (phase, effects) = transition(&phase, &Event::ConfirmAlignment);
        assert_eq!(phase, Phase::PauseWaiting);
        assert_eq!(effects, vec![Effect::StartWaitTimer]);
        let (phase, effects) = transition(&phase, &Event::WaitElapsed);
        assert_eq!(phase, Phase::Paused);
        assert_eq!(effects, vec![Effect::CaptureReference]);

        let (phase, _) = transition(&phase, &Event::Resume { relocalizing: false });
        let (phase, effects) = transition(&phase, &Event::ConfirmAlignment);
        assert_eq!(phase, Phase::ResumeWaiting { relocalizing: false });
        assert_eq!(effects, vec![Effect::ArmAlignment, Effect::StartWaitTimer]);
        let (phase, effects) = transition(&phase, &Event::WaitElapsed);
        assert_eq!(phase, Phase::ReadyToNavigate { allow_pause: false });
        assert_eq!(effects, vec![Effect::ApplyAlignment]);

        // No second pause after resuming.
        let (same, effects) = transition(&phase, &Event::RequestPause);
        assert_eq!(same, phase);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_relocalization_suppresses_rebase() {
        let waiting = Phase::ResumeWaiting { relocalizing: true };
        let (phase, effects) =
            transition(&waiting, &Event::TrackingChanged(TrackingState::Normal));
        assert_eq!(phase, Phase::ReadyToNavigate { allow_pause: false });
        assert_eq!(
            effects,
            vec![Effect::CancelWaitTimer, Effect::SuppressAlignment]
        );

        // Without a saved environment, normal tracking says nothing about
        // the frame and the wait continues.
        let plain = Phase::ResumeWaiting { relocalizing: false };
        let (phase, effects) = transition(&plain, &Event::TrackingChanged(TrackingState::Normal));
        assert_eq!(phase, plain);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_wait_elapsed_after_suppression_is_ignored() {
        let ready = Phase::ReadyToNavigate { allow_pause: false };
        let (phase, effects) = transition(&ready, &Event::WaitElapsed);
        assert_eq!(phase, ready);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_cancel_always_returns_to_idle() {
        for phase in all_phases() {
            let (next, _) = transition(&phase, &Event::Cancel);
            assert_eq!(next, Phase::Idle);
        }
        let (_, effects) = transition(&Phase::ResumeWaiting { relocalizing: true }, &Event::Cancel);
        assert!(effects.contains(&Effect::CancelAlignment));
    }
}
