//! Main MargaConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alignment::AlignmentConfig;
use crate::calibration::CalibratorConfig;
use crate::error::{MargaError, Result};
use crate::guidance::{GuidanceConfig, TargetBox};
use crate::route::SimplifierConfig;
use crate::session::SessionConfig;

use super::alignment::AlignmentSection;
use super::calibration::CalibrationSection;
use super::guidance::GuidanceSection;
use super::route::RouteSection;

/// Full Marga configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MargaConfig {
    /// Route recording settings
    #[serde(default)]
    pub route: RouteSection,

    /// Guidance settings
    #[serde(default)]
    pub guidance: GuidanceSection,

    /// Heading calibration settings
    #[serde(default)]
    pub calibration: CalibrationSection,

    /// Pause/resume alignment settings
    #[serde(default)]
    pub alignment: AlignmentSection,
}

impl MargaConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/marga.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Path::new("configs/marga.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        let g = &self.guidance;
        let lengths = [
            ("route.path_width", self.route.path_width),
            ("guidance.target_depth", g.target_depth),
            ("guidance.target_height", g.target_height),
            ("guidance.target_width", g.target_width),
            ("guidance.last_target_depth", g.last_target_depth),
            ("guidance.last_target_height", g.last_target_height),
            ("guidance.last_target_width", g.last_target_width),
            ("guidance.close_radius", g.close_radius),
            ("guidance.turn_warning_min_segment", g.turn_warning_min_segment),
            ("guidance.vertical_slope_threshold", g.vertical_slope_threshold),
            ("guidance.vertical_min_rise", g.vertical_min_rise),
            ("calibration.required_distance", self.calibration.required_distance),
            (
                "calibration.angle_deviation_threshold",
                self.calibration.angle_deviation_threshold,
            ),
            (
                "calibration.linear_deviation_threshold",
                self.calibration.linear_deviation_threshold,
            ),
            ("alignment.waiting_period", self.alignment.waiting_period),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(MargaError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        let periods = [
            ("route.sample_period", self.route.sample_period),
            ("guidance.guidance_period", g.guidance_period),
            ("calibration.sample_period", self.calibration.sample_period),
        ];
        for (name, value) in periods {
            if !value.is_finite() || value <= 0.0 {
                return Err(MargaError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.calibration.capacity < 2 {
            return Err(MargaError::InvalidConfig(format!(
                "calibration.capacity must be at least 2, got {}",
                self.calibration.capacity
            )));
        }
        Ok(())
    }

    /// Convert to SimplifierConfig
    pub fn to_simplifier_config(&self) -> SimplifierConfig {
        SimplifierConfig {
            path_width: self.route.path_width,
        }
    }

    /// Convert to GuidanceConfig
    pub fn to_guidance_config(&self) -> GuidanceConfig {
        let g = &self.guidance;
        GuidanceConfig {
            target: TargetBox {
                depth: g.target_depth,
                height: g.target_height,
                width: g.target_width,
            },
            last_target: TargetBox {
                depth: g.last_target_depth,
                height: g.last_target_height,
                width: g.last_target_width,
            },
            close_radius: g.close_radius,
            turn_warning_min_segment: g.turn_warning_min_segment,
            vertical_slope_threshold: g.vertical_slope_threshold,
            vertical_min_rise: g.vertical_min_rise,
            // The offset is learned by calibration, so the switch lives there.
            use_heading_offset: self.calibration.use_heading_offset,
        }
    }

    /// Convert to CalibratorConfig
    pub fn to_calibrator_config(&self) -> CalibratorConfig {
        CalibratorConfig {
            capacity: self.calibration.capacity,
            required_distance: self.calibration.required_distance,
            angle_deviation_threshold: self.calibration.angle_deviation_threshold,
            linear_deviation_threshold: self.calibration.linear_deviation_threshold,
        }
    }

    /// Convert to AlignmentConfig
    pub fn to_alignment_config(&self) -> AlignmentConfig {
        AlignmentConfig {
            waiting_period: self.alignment.waiting_period,
        }
    }

    /// Convert to SessionConfig
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            simplifier: self.to_simplifier_config(),
            guidance: self.to_guidance_config(),
            calibrator: self.to_calibrator_config(),
            alignment: self.to_alignment_config(),
            breadcrumb_period: self.route.sample_period,
            guidance_period: self.guidance.guidance_period,
            heading_period: self.calibration.sample_period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = MargaConfig::from_yaml("{}").unwrap();
        assert_eq!(config.route.path_width, 0.3);
        assert_eq!(config.guidance.close_radius, 4.0);
        assert_eq!(config.calibration.capacity, 50);
        assert_eq!(config.alignment.waiting_period, 5.0);
        assert!(!config.calibration.use_heading_offset);
    }

    #[test]
    fn test_partial_section() {
        let yaml = r#"
guidance:
  close_radius: 6.0
calibration:
  use_heading_offset: true
"#;
        let config = MargaConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.guidance.close_radius, 6.0);
        assert_eq!(config.guidance.target_depth, 0.5);

        let guidance = config.to_guidance_config();
        assert!(guidance.use_heading_offset);
        assert_eq!(guidance.close_radius, 6.0);
        assert_eq!(guidance.last_target.width, 1.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            MargaConfig::from_yaml("route:\n  path_width: -1.0\n"),
            Err(MargaError::InvalidConfig(_))
        ));
        assert!(matches!(
            MargaConfig::from_yaml("guidance:\n  guidance_period: 0.0\n"),
            Err(MargaError::InvalidConfig(_))
        ));
        assert!(matches!(
            MargaConfig::from_yaml("calibration:\n  capacity: 0\n"),
            Err(MargaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            MargaConfig::from_yaml("route: [1, 2"),
            Err(MargaError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_session_config_periods() {
        let session = MargaConfig::default().to_session_config();
        assert_eq!(session.breadcrumb_period, 0.3);
        assert_eq!(session.guidance_period, 0.3);
        assert_eq!(session.heading_period, 0.01);
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let result = MargaConfig::load(Path::new("/nonexistent/marga.yaml"));
        assert!(matches!(result, Err(MargaError::ConfigIo(_))));
    }
}
