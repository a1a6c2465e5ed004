//! Pause/resume alignment configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Alignment settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignmentSection {
    /// Seconds the device must be held still before realigning
    #[serde(default = "defaults::waiting_period")]
    pub waiting_period: f32,
}

impl Default for AlignmentSection {
    fn default() -> Self {
        Self {
            waiting_period: 5.0,
        }
    }
}
