//! Heading offset self-calibration.
//!
//! People rarely hold the phone pointing exactly where they walk. While the
//! user walks a clean straight line with a steady grip, the difference
//! between the direction of movement and the device heading is that grip
//! offset, and adding it to later headings recovers the walking direction.

use std::f32::consts::FRAC_1_SQRT_2;
use std::f32::consts::PI;

use log::{debug, trace};

use crate::core::math::{angle_diff, average_angle, wrap_angle};
use crate::core::{RingBuffer, Vec3};
use crate::error::{MargaError, Result};

/// Configuration for heading calibration.
#[derive(Clone, Debug)]
pub struct CalibratorConfig {
    /// Samples held in each window.
    /// Default: 50
    pub capacity: usize,
    /// Minimum planar distance between the oldest and newest sample.
    /// Default: 0.3m
    pub required_distance: f32,
    /// Maximum deviation of any heading from the window's first and last.
    /// Default: 0.2 rad
    pub angle_deviation_threshold: f32,
    /// Maximum sideways distance of any sample from the straight line.
    /// Default: 0.05m
    pub linear_deviation_threshold: f32,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            required_distance: 0.3,
            angle_deviation_threshold: 0.2,
            linear_deviation_threshold: 0.05,
        }
    }
}

impl CalibratorConfig {
    /// Builder-style setter for window capacity.
    pub fn with_capacity(mut self, value: usize) -> Self {
        self.capacity = value;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity < 2 {
            return Err(MargaError::InvalidConfig(format!(
                "calibration.capacity must be at least 2, got {}",
                self.capacity
            )));
        }
        for (name, value) in [
            ("required_distance", self.required_distance),
            ("angle_deviation_threshold", self.angle_deviation_threshold),
            ("linear_deviation_threshold", self.linear_deviation_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MargaError::InvalidConfig(format!(
                    "calibration.{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Why a window could not produce an offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Window not yet full.
    Filling,
    /// Not enough distance covered.
    TooShort,
    /// Device rotated within the window.
    Unsteady,
    /// Path not straight.
    Curved,
}

/// Rolling heading/position windows and the offset they produce.
#[derive(Clone, Debug)]
pub struct HeadingCalibrator {
    config: CalibratorConfig,
    headings: RingBuffer<f32>,
    positions: RingBuffer<Vec3>,
    offset: Option<f32>,
}

impl Default for HeadingCalibrator {
    fn default() -> Self {
        let config = CalibratorConfig::default();
        Self {
            headings: RingBuffer::new(config.capacity),
            positions: RingBuffer::new(config.capacity),
            config,
            offset: None,
        }
    }
}

impl HeadingCalibrator {
    pub fn new(config: CalibratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            headings: RingBuffer::new(config.capacity),
            positions: RingBuffer::new(config.capacity),
            config,
            offset: None,
        })
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Append one sample to both windows.
    pub fn observe(&mut self, heading: f32, position: Vec3) {
        self.headings.push(heading);
        self.positions.push(position);
    }

    /// Clear both windows and forget the learned offset.
    pub fn reset(&mut self) {
        self.headings.clear();
        self.positions.clear();
        self.offset = None;
    }

    /// Most recently learned offset.
    pub fn offset(&self) -> Option<f32> {
        self.offset
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Offset estimate from the current window, if the window describes a
    /// clean straight walk.
    pub fn estimate_offset(&self) -> Option<f32> {
        match self.evaluate() {
            Ok(offset) => Some(offset),
            Err(reason) => {
                trace!("[Calibration] Window rejected: {:?}", reason);
                None
            }
        }
    }

    /// Estimate and, on success, remember the offset. Returns the offset in
    /// effect afterwards, which is the previous one when the window was
    /// rejected.
    pub fn update(&mut self) -> Option<f32> {
        if let Some(offset) = self.estimate_offset() {
            if self.offset != Some(offset) {
                debug!(
                    "[Calibration] Heading offset {:.1}°",
                    offset.to_degrees()
                );
            }
            self.offset = Some(offset);
        }
        self.offset
    }

    /// Full evaluation with the rejection reason.
    pub fn evaluate(&self) -> std::result::Result<f32, Rejection> {
        if !self.headings.is_full() || !self.positions.is_full() {
            return Err(Rejection::Filling);
        }
        let (Some(&start_heading), Some(&end_heading)) =
            (self.headings.oldest(), self.headings.newest())
        else {
            return Err(Rejection::Filling);
        };
        let (Some(&start), Some(&end)) = (self.positions.oldest(), self.positions.newest()) else {
            return Err(Rejection::Filling);
        };

        let travel = (end - start).planar();
        if travel.length() < self.config.required_distance {
            return Err(Rejection::TooShort);
        }

        let threshold = self.config.angle_deviation_threshold;
        let unsteady = self.headings.iter().any(|&h| {
            angle_diff(h, start_heading).abs() > threshold
                || angle_diff(h, end_heading).abs() > threshold
        });
        if unsteady {
            return Err(Rejection::Unsteady);
        }

        // Straightness is judged in 3D, so bobbing up and down counts too.
        let Some(direction) = (end - start).try_normalize() else {
            return Err(Rejection::TooShort);
        };
        let curved = self.positions.iter().any(|&p| {
            let offset = p - start;
            let sideways = offset - direction * offset.dot(direction);
            sideways.length() > self.config.linear_deviation_threshold
        });
        if curved {
            return Err(Rejection::Curved);
        }

        // Backward heading convention, see `Pose::heading_yaw`.
        let movement = (start - end).yaw();
        let mut offset = angle_diff(movement, average_angle(start_heading, end_heading));
        if offset.cos() < -FRAC_1_SQRT_2 {
            // Walking backwards; learning this would flip guidance around.
            offset = wrap_angle(offset - PI);
        }
        Ok(offset)
    }
}
