//! Heading calibration configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Heading calibration settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationSection {
    /// Samples kept in the heading and position windows
    #[serde(default = "defaults::heading_capacity")]
    pub capacity: usize,

    /// Minimum distance walked across the window (meters)
    #[serde(default = "defaults::required_distance")]
    pub required_distance: f32,

    /// Maximum heading wobble against the window ends (radians)
    #[serde(default = "defaults::angle_deviation_threshold")]
    pub angle_deviation_threshold: f32,

    /// Maximum sideways drift from the straight line (meters)
    #[serde(default = "defaults::linear_deviation_threshold")]
    pub linear_deviation_threshold: f32,

    /// Seconds between heading samples
    #[serde(default = "defaults::heading_period")]
    pub sample_period: f32,

    /// Apply the learned offset to guidance
    #[serde(default)]
    pub use_heading_offset: bool,
}

impl Default for CalibrationSection {
    fn default() -> Self {
        Self {
            capacity: 50,
            required_distance: 0.3,
            angle_deviation_threshold: 0.2,
            linear_deviation_threshold: 0.05,
            sample_period: 0.01,
            use_heading_offset: false,
        }
    }
}
