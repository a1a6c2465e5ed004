//! Session controller.
//!
//! Owns every component of a session and drives them from
//! [`transition`](super::transition) effects and scheduler firings:
//!
//! ```text
//! handle(event) ──► transition ──► effects ──► recorder / calibrator /
//!                                              alignment / timers
//! advance_to(t) ──► scheduler ──► Breadcrumb   → recorder
//!                                 HeadingSample → calibrator
//!                                 Guidance      → queue → observers
//!                                 AlignmentWait → handle(WaitElapsed)
//! ```
//!
//! Time is supplied by the caller, so a whole walk can be replayed
//! deterministically.

use log::{debug, info, trace, warn};

use crate::alignment::{AlignmentConfig, AlignmentCoordinator, AlignmentOutcome};
use crate::calibration::{CalibratorConfig, HeadingCalibrator};
use crate::core::Vec3;
use crate::error::{MargaError, Result};
use crate::guidance::{GuidanceConfig, GuidanceEngine, GuidanceStep, KeypointQueue};
use crate::route::{
    BreadcrumbRecorder, PathSimplifier, RecordedRoute, RouteDirection, SimplifierConfig,
};
use crate::scheduler::{Scheduler, TimerId};
use crate::tracking::{PoseSource, TrackingState};

use super::machine::transition;
use super::observer::{GuidanceUpdate, SessionObserver};
use super::state::{Effect, Event, Phase};

/// Configuration for a [`SessionController`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub simplifier: SimplifierConfig,
    pub guidance: GuidanceConfig,
    pub calibrator: CalibratorConfig,
    pub alignment: AlignmentConfig,
    /// Seconds between breadcrumbs while recording.
    pub breadcrumb_period: f32,
    /// Seconds between guidance cycles while navigating.
    pub guidance_period: f32,
    /// Seconds between heading samples.
    pub heading_period: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simplifier: SimplifierConfig::default(),
            guidance: GuidanceConfig::default(),
            calibrator: CalibratorConfig::default(),
            alignment: AlignmentConfig::default(),
            breadcrumb_period: 0.3,
            guidance_period: 0.3,
            heading_period: 0.01,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("breadcrumb_period", self.breadcrumb_period),
            ("guidance_period", self.guidance_period),
            ("heading_period", self.heading_period),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MargaError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        self.simplifier.validate()?;
        self.guidance.validate()?;
        self.calibrator.validate()?;
        self.alignment.validate()
    }
}

/// What a scheduler firing is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTag {
    Breadcrumb,
    Guidance,
    HeadingSample,
    AlignmentWait,
}

#[derive(Clone, Copy, Debug, Default)]
struct Timers {
    breadcrumb: Option<TimerId>,
    guidance: Option<TimerId>,
    heading: Option<TimerId>,
    wait: Option<TimerId>,
}

/// Runs one record / pause / resume / navigate session against a pose
/// source.
pub struct SessionController<S: PoseSource> {
    config: SessionConfig,
    source: S,
    phase: Phase,
    tracking: TrackingState,
    scheduler: Scheduler<TimerTag>,
    timers: Timers,
    recorder: BreadcrumbRecorder,
    route: Option<RecordedRoute>,
    direction: RouteDirection,
    simplifier: PathSimplifier,
    engine: GuidanceEngine,
    calibrator: HeadingCalibrator,
    alignment: AlignmentCoordinator,
    queue: Option<KeypointQueue>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<S: PoseSource> SessionController<S> {
    pub fn new(config: SessionConfig, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            simplifier: PathSimplifier::new(config.simplifier.clone())?,
            engine: GuidanceEngine::new(config.guidance.clone())?,
            calibrator: HeadingCalibrator::new(config.calibrator.clone())?,
            alignment: AlignmentCoordinator::new(config.alignment.clone())?,
            config,
            source,
            phase: Phase::Idle,
            tracking: TrackingState::NotAvailable,
            scheduler: Scheduler::new(),
            timers: Timers::default(),
            recorder: BreadcrumbRecorder::new(),
            route: None,
            // Recording walks out; guidance brings the user back.
            direction: RouteDirection::Reverse,
            queue: None,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tracking(&self) -> TrackingState {
        self.tracking
    }

    pub fn now(&self) -> f32 {
        self.scheduler.now()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn route(&self) -> Option<&RecordedRoute> {
        self.route.as_ref()
    }

    pub fn direction(&self) -> RouteDirection {
        self.direction
    }

    /// Direction the next navigation will walk the route in.
    pub fn set_direction(&mut self, direction: RouteDirection) {
        self.direction = direction;
    }

    pub fn queue(&self) -> Option<&KeypointQueue> {
        self.queue.as_ref()
    }

    pub fn engine(&self) -> &GuidanceEngine {
        &self.engine
    }

    pub fn calibrator(&self) -> &HeadingCalibrator {
        &self.calibrator
    }

    pub fn alignment(&self) -> &AlignmentCoordinator {
        &self.alignment
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Install a previously saved route.
    ///
    /// With a start anchor the session waits in `Paused` for a resume
    /// alignment; without one it is ready to navigate straight away.
    pub fn load_route(&mut self, route: RecordedRoute, direction: RouteDirection) -> Result<()> {
        if self.phase != Phase::Idle {
            return Err(MargaError::WrongPhase {
                action: "load a route",
                phase: self.phase.name(),
            });
        }
        if route.is_empty() {
            return Err(MargaError::EmptyTrail);
        }
        let anchor = route.start_anchor(direction);
        info!(
            "[Session] Loaded route '{}' ({} breadcrumbs, anchored: {})",
            route.name,
            route.len(),
            anchor.is_some()
        );
        self.alignment.set_reference(anchor);
        self.route = Some(route);
        self.direction = direction;
        self.handle(Event::RouteLoaded {
            anchored: anchor.is_some(),
        })
    }

    /// Report a tracking state change from the pose source.
    pub fn on_tracking_state(&mut self, state: TrackingState) -> Result<()> {
        if state != self.tracking {
            debug!(
                "[Session] Tracking {} -> {}",
                self.tracking.name(),
                state.name()
            );
        }
        if self.phase == Phase::Navigating && state.is_limited_excluding_relocalization() {
            warn!("[Session] Tracking limited during guidance: {}", state.name());
        }
        self.handle(Event::TrackingChanged(state))
    }

    /// Feed an event through the transition function and run its effects.
    ///
    /// If the keypoints cannot be built the phase is left unchanged.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        if let Event::TrackingChanged(state) = event {
            self.tracking = state;
        }

        let from = self.phase;
        let (to, effects) = transition(&from, &event);

        let mut built = if effects.contains(&Effect::BuildKeypoints) {
            Some(self.build_queue()?)
        } else {
            None
        };

        self.phase = to;
        if from != to {
            info!(
                "[Session] {} -> {} on {}",
                from.name(),
                to.name(),
                event.name()
            );
            for observer in self.observers.iter_mut() {
                observer.on_phase_changed(from, to);
            }
        } else {
            trace!("[Session] {} ignored in {}", event.name(), from.name());
        }

        for effect in effects {
            if effect == Effect::BuildKeypoints {
                self.queue = built.take();
                continue;
            }
            self.run_effect(effect)?;
        }

        // Tracking may have recognised the saved environment while paused.
        // Replay it so the resume sees the frame as already recovered.
        if from != to
            && matches!(to, Phase::ResumeRequested { relocalizing: true })
            && self.tracking.is_normal()
        {
            debug!("[Session] Tracking already normal on relocalizing resume");
            return self.handle(Event::TrackingChanged(self.tracking));
        }
        Ok(())
    }

    /// Move the clock to `now` and dispatch every timer that came due.
    pub fn advance_to(&mut self, now: f32) -> Result<()> {
        while let Some(fired) = self.scheduler.pop_due(now) {
            match fired.tag {
                TimerTag::Breadcrumb => self.drop_breadcrumb(fired.at),
                TimerTag::HeadingSample => self.sample_heading(),
                TimerTag::Guidance => self.guidance_cycle()?,
                TimerTag::AlignmentWait => {
                    self.timers.wait = None;
                    self.handle(Event::WaitElapsed)?;
                }
            }
        }
        Ok(())
    }

    fn build_queue(&self) -> Result<KeypointQueue> {
        let route = self.route.as_ref().ok_or(MargaError::EmptyTrail)?;
        let positions = route.positions(self.direction);
        let keypoints = self.simplifier.simplify(&positions)?;
        let start = self
            .source
            .current_pose()
            .map(|pose| pose.position())
            .or_else(|| keypoints.first().map(|k| k.location))
            .unwrap_or(Vec3::ZERO);
        info!(
            "[Session] {} keypoints from {} breadcrumbs ({:?})",
            keypoints.len(),
            positions.len(),
            self.direction
        );
        KeypointQueue::new(keypoints, start)
    }

    fn run_effect(&mut self, effect: Effect) -> Result<()> {
        trace!("[Session] Effect {:?}", effect);
        match effect {
            Effect::StartBreadcrumbSampling => {
                let anchor = self.source.current_pose();
                self.recorder.start(self.scheduler.now(), anchor);
                let id = self
                    .scheduler
                    .schedule_repeating(self.config.breadcrumb_period, TimerTag::Breadcrumb)?;
                swap_timer(&mut self.scheduler, &mut self.timers.breadcrumb, Some(id));
            }
            Effect::StopBreadcrumbSampling => {
                swap_timer(&mut self.scheduler, &mut self.timers.breadcrumb, None)
            }
            Effect::FinalizeRecording => {
                let route = self.recorder.finish("route", self.source.current_pose());
                self.route = Some(route);
                self.direction = RouteDirection::Reverse;
            }
            Effect::ResetHeadingWindow => {
                self.calibrator.reset();
                self.engine.set_heading_offset(None);
            }
            Effect::StartHeadingSampling => {
                let id = self
                    .scheduler
                    .schedule_repeating(self.config.heading_period, TimerTag::HeadingSample)?;
                swap_timer(&mut self.scheduler, &mut self.timers.heading, Some(id));
            }
            Effect::StopHeadingSampling => {
                swap_timer(&mut self.scheduler, &mut self.timers.heading, None)
            }
            // Handled in `handle` before the phase is committed.
            Effect::BuildKeypoints => {}
            Effect::StartGuidance => {
                let id = self
                    .scheduler
                    .schedule_repeating(self.config.guidance_period, TimerTag::Guidance)?;
                swap_timer(&mut self.scheduler, &mut self.timers.guidance, Some(id));
            }
            Effect::StopGuidance => {
                swap_timer(&mut self.scheduler, &mut self.timers.guidance, None)
            }
            Effect::StartWaitTimer => {
                let id = self.scheduler.schedule_once(
                    self.alignment.config().waiting_period,
                    TimerTag::AlignmentWait,
                );
                swap_timer(&mut self.scheduler, &mut self.timers.wait, Some(id));
            }
            Effect::CancelWaitTimer => {
                swap_timer(&mut self.scheduler, &mut self.timers.wait, None)
            }
            Effect::CaptureReference => match self.source.current_pose() {
                Some(pose) => {
                    self.alignment.capture(pose);
                    if let Some(route) = self.route.as_mut() {
                        route.end_anchor = Some(pose);
                    }
                }
                None => warn!("[Session] No pose to capture as reference"),
            },
            Effect::ArmAlignment => self.alignment.arm(),
            Effect::ApplyAlignment => {
                let outcome = self.alignment.apply(&mut self.source);
                if !matches!(outcome, AlignmentOutcome::Applied(_)) {
                    warn!("[Session] Realignment not applied: {:?}", outcome);
                }
                self.notify_alignment(&outcome);
            }
            Effect::SuppressAlignment => {
                self.alignment.mark_recovered();
                info!("[Session] Tracking relocalized; rebase suppressed");
                self.notify_alignment(&AlignmentOutcome::Suppressed);
            }
            Effect::CancelAlignment => self.alignment.cancel(),
            Effect::NotifyRouteCompleted => {
                info!("[Session] Route completed");
                for observer in self.observers.iter_mut() {
                    observer.on_route_completed();
                }
            }
        }
        Ok(())
    }

    fn drop_breadcrumb(&mut self, at: f32) {
        match self.source.current_pose() {
            Some(pose) => self.recorder.record(pose, at),
            None => trace!("[Session] No pose for breadcrumb at t={:.2}s", at),
        }
    }

    fn sample_heading(&mut self) {
        if let Some(pose) = self.source.current_pose() {
            self.calibrator.observe(pose.heading_yaw(), pose.position());
        }
    }

    fn guidance_cycle(&mut self) -> Result<()> {
        let Some(pose) = self.source.current_pose() else {
            trace!("[Session] No pose; guidance cycle skipped");
            return Ok(());
        };
        let offset = self.calibrator.update();
        self.engine.set_heading_offset(offset);

        let Some(queue) = self.queue.as_mut() else {
            return Ok(());
        };

        let (update, reached) = match queue.step(&self.engine, &pose) {
            GuidanceStep::Completed => return self.handle(Event::RouteCompleted),
            GuidanceStep::EnRoute(direction) => {
                let update = GuidanceUpdate {
                    direction,
                    vertical: queue.vertical_transition(&self.engine, &pose),
                    turn_warning: queue.take_turn_warning(&self.engine, &pose, &direction),
                    arrived: false,
                    remaining: queue.len(),
                };
                (update, None)
            }
            GuidanceStep::Arrived { reached, direction } => {
                let update = GuidanceUpdate {
                    direction,
                    vertical: queue.vertical_transition(&self.engine, &pose),
                    turn_warning: None,
                    arrived: true,
                    remaining: queue.len(),
                };
                (update, Some(reached))
            }
        };

        if let Some(keypoint) = reached {
            debug!(
                "[Session] Reached keypoint ({:.2}, {:.2}, {:.2}), {} left",
                keypoint.location.x,
                keypoint.location.y,
                keypoint.location.z,
                update.remaining
            );
            for observer in self.observers.iter_mut() {
                observer.on_keypoint_reached(&keypoint, update.remaining);
            }
        }
        for observer in self.observers.iter_mut() {
            observer.on_guidance(&update);
        }
        Ok(())
    }

    fn notify_alignment(&mut self, outcome: &AlignmentOutcome) {
        for observer in self.observers.iter_mut() {
            observer.on_alignment(outcome);
        }
    }
}

impl<S: PoseSource> std::fmt::Debug for SessionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("phase", &self.phase)
            .field("tracking", &self.tracking)
            .field("now", &self.scheduler.now())
            .field("route_len", &self.route.as_ref().map(RecordedRoute::len))
            .field("remaining", &self.queue.as_ref().map(KeypointQueue::len))
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Cancel the timer in `slot` and store `id` in its place.
fn swap_timer(
    scheduler: &mut Scheduler<TimerTag>,
    slot: &mut Option<TimerId>,
    id: Option<TimerId>,
) {
    if let Some(old) = std::mem::replace(slot, id) {
        scheduler.cancel(old);
    }
}
