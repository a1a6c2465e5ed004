//! Unified configuration loading for Marga.
//!
//! Loads all configuration from a single YAML file.

mod alignment;
mod calibration;
mod defaults;
mod guidance;
mod marga;
mod route;

pub use marga::MargaConfig;

// Re-export section types
pub use alignment::AlignmentSection;
pub use calibration::CalibrationSection;
pub use guidance::GuidanceSection;
pub use route::RouteSection;
