//! Breadcrumb recording.

use log::{debug, info};

use crate::core::Pose;

use super::keypoint::{Breadcrumb, RecordedRoute};

/// Collects breadcrumbs while a route is being walked.
///
/// The trail is append-only while recording and handed over as a frozen
/// [`RecordedRoute`] by [`finish`](Self::finish).
#[derive(Clone, Debug, Default)]
pub struct BreadcrumbRecorder {
    breadcrumbs: Vec<Breadcrumb>,
    started_at: f32,
    begin_anchor: Option<Pose>,
    recording: bool,
}

impl BreadcrumbRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any previous trail and start a new one.
    pub fn start(&mut self, now: f32, begin_anchor: Option<Pose>) {
        self.breadcrumbs.clear();
        self.started_at = now;
        self.begin_anchor = begin_anchor;
        self.recording = true;
        info!("[Recorder] Recording started at t={:.2}s", now);
    }

    /// Append a breadcrumb. Ignored when not recording.
    pub fn record(&mut self, pose: Pose, now: f32) {
        if !self.recording {
            return;
        }
        self.breadcrumbs
            .push(Breadcrumb::new(pose, now - self.started_at));
        debug!(
            "[Recorder] Breadcrumb {} at ({:.2}, {:.2}, {:.2})",
            self.breadcrumbs.len(),
            pose.translation.x,
            pose.translation.y,
            pose.translation.z
        );
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn len(&self) -> usize {
        self.breadcrumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breadcrumbs.is_empty()
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    /// Stop recording and freeze the trail.
    pub fn finish(&mut self, name: impl Into<String>, end_anchor: Option<Pose>) -> RecordedRoute {
        self.recording = false;
        let route = RecordedRoute {
            name: name.into(),
            breadcrumbs: std::mem::take(&mut self.breadcrumbs),
            begin_anchor: self.begin_anchor.take(),
            end_anchor,
        };
        info!(
            "[Recorder] Recording finished with {} breadcrumbs",
            route.breadcrumbs.len()
        );
        route
    }
}
