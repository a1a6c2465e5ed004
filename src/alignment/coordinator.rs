//! Pause/resume realignment bookkeeping.

use log::{info, warn};

use crate::core::{Pose, RigidTransform};
use crate::error::{MargaError, Result};
use crate::tracking::PoseSource;

use super::rebase::compute_rebase;

/// Configuration for pause/resume alignment.
#[derive(Clone, Debug)]
pub struct AlignmentConfig {
    /// Seconds the device must be held still before the rebase is applied.
    /// Default: 5s
    pub waiting_period: f32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            waiting_period: 5.0,
        }
    }
}

impl AlignmentConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.waiting_period.is_finite() || self.waiting_period < 0.0 {
            return Err(MargaError::InvalidConfig(format!(
                "alignment.waiting_period must be finite and non-negative, got {}",
                self.waiting_period
            )));
        }
        Ok(())
    }
}

/// What happened when the coordinator was asked to realign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlignmentOutcome {
    /// The rebase was handed to the pose source.
    Applied(RigidTransform),
    /// Tracking regained the saved frame on its own; nothing applied.
    Suppressed,
    /// No resume attempt is armed (never armed, cancelled or already used).
    NotArmed,
    /// No reference pose was captured at pause time.
    NoReference,
    /// The pose source had no pose; still armed for a retry.
    MissingPose,
}

/// Holds the reference pose captured at pause time and applies the rebase
/// at most once per resume attempt.
#[derive(Clone, Debug, Default)]
pub struct AlignmentCoordinator {
    config: AlignmentConfig,
    reference: Option<Pose>,
    armed: bool,
    recovered: bool,
}

impl AlignmentCoordinator {
    pub fn new(config: AlignmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Store the pose to realign onto later.
    pub fn capture(&mut self, pose: Pose) {
        info!(
            "[Alignment] Reference captured at ({:.2}, {:.2}, {:.2})",
            pose.translation.x, pose.translation.y, pose.translation.z
        );
        self.reference = Some(pose);
    }

    /// Use a reference pose loaded with a saved route.
    pub fn set_reference(&mut self, pose: Option<Pose>) {
        self.reference = pose;
    }

    pub fn reference(&self) -> Option<&Pose> {
        self.reference.as_ref()
    }

    /// Start a resume attempt.
    pub fn arm(&mut self) {
        self.armed = true;
        self.recovered = false;
    }

    /// Abandon the current resume attempt.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Tracking reported that it recognised the saved frame itself. Any
    /// pending rebase must not be applied.
    pub fn mark_recovered(&mut self) {
        if self.armed {
            info!("[Alignment] Tracking relocalized, pending rebase dropped");
        }
        self.recovered = true;
        self.armed = false;
    }

    /// Forget everything, e.g. when a new route starts.
    pub fn clear(&mut self) {
        self.reference = None;
        self.armed = false;
        self.recovered = false;
    }

    /// Apply the rebase if a resume attempt is armed and still valid.
    pub fn apply<S: PoseSource + ?Sized>(&mut self, source: &mut S) -> AlignmentOutcome {
        if self.recovered {
            warn!("[Alignment] Rebase suppressed: frames already coincide");
            self.armed = false;
            return AlignmentOutcome::Suppressed;
        }
        if !self.armed {
            return AlignmentOutcome::NotArmed;
        }
        let Some(reference) = self.reference else {
            warn!("[Alignment] No reference pose to align to");
            self.armed = false;
            return AlignmentOutcome::NoReference;
        };
        let Some(live) = source.current_pose() else {
            return AlignmentOutcome::MissingPose;
        };

        let rebase = compute_rebase(&reference, &live);
        source.rebase_origin(&rebase);
        self.armed = false;
        info!(
            "[Alignment] Rebase applied: yaw {:.1}°, offset ({:.2}, {:.2}, {:.2})",
            rebase.heading_yaw().to_degrees(),
            rebase.translation.x,
            rebase.translation.y,
            rebase.translation.z
        );
        AlignmentOutcome::Applied(rebase)
    }
}
