//! Heading offset self-calibration.
//!
//! See [`HeadingCalibrator`].

mod heading;

pub use heading::{CalibratorConfig, HeadingCalibrator, Rejection};
