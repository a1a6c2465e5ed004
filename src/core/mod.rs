//! Core geometric types shared by every component.
//!
//! - [`Vec3`] and [`Mat3`]: positions, directions and rotations
//! - [`Pose`] / [`RigidTransform`]: device pose and frame corrections
//! - [`RingBuffer`]: fixed-capacity FIFO used by the heading calibrator
//! - [`math`]: angle wrapping and differences

pub mod math;
mod pose;
mod ring_buffer;
mod vector;

pub use math::{angle_diff, average_angle, wrap_angle};
pub use pose::{Pose, RigidTransform};
pub use ring_buffer::RingBuffer;
pub use vector::{EPSILON_LENGTH, Mat3, Vec3};
