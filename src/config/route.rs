//! Route recording configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Route recording settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteSection {
    /// Lateral tolerance before the trail is split at a new keypoint (meters)
    #[serde(default = "defaults::path_width")]
    pub path_width: f32,

    /// Seconds between breadcrumbs while recording
    #[serde(default = "defaults::breadcrumb_period")]
    pub sample_period: f32,
}

impl Default for RouteSection {
    fn default() -> Self {
        Self {
            path_width: 0.3,
            sample_period: 0.3,
        }
    }
}
