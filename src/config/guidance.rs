//! Guidance configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Guidance settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuidanceSection {
    /// Arrival box depth along the keypoint orientation (meters)
    #[serde(default = "defaults::target_depth")]
    pub target_depth: f32,

    /// Arrival box height (meters)
    #[serde(default = "defaults::target_height")]
    pub target_height: f32,

    /// Arrival box width across the keypoint orientation (meters)
    #[serde(default = "defaults::target_width")]
    pub target_width: f32,

    /// Arrival box depth for the final keypoint (meters)
    #[serde(default = "defaults::last_target_depth")]
    pub last_target_depth: f32,

    /// Arrival box height for the final keypoint (meters)
    #[serde(default = "defaults::target_height")]
    pub last_target_height: f32,

    /// Arrival box width for the final keypoint (meters)
    #[serde(default = "defaults::last_target_width")]
    pub last_target_width: f32,

    /// Planar radius inside which a keypoint counts as close (meters)
    #[serde(default = "defaults::close_radius")]
    pub close_radius: f32,

    /// Seconds between guidance updates while navigating
    #[serde(default = "defaults::guidance_period")]
    pub guidance_period: f32,

    /// Shortest segment that earns an advance turn warning (meters)
    #[serde(default = "defaults::turn_warning_min_segment")]
    pub turn_warning_min_segment: f32,

    /// Slope beyond which a segment counts as stairs
    #[serde(default = "defaults::vertical_slope_threshold")]
    pub vertical_slope_threshold: f32,

    /// Minimum height change for a vertical transition (meters)
    #[serde(default = "defaults::vertical_min_rise")]
    pub vertical_min_rise: f32,
}

impl Default for GuidanceSection {
    fn default() -> Self {
        Self {
            target_depth: 0.5,
            target_height: 3.0,
            target_width: 2.0,
            last_target_depth: 1.0,
            last_target_height: 3.0,
            last_target_width: 1.0,
            close_radius: 4.0,
            guidance_period: 0.3,
            turn_warning_min_segment: 6.0,
            vertical_slope_threshold: 0.3,
            vertical_min_rise: 1.0,
        }
    }
}
