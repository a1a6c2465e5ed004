//! Angle utilities.
//!
//! All angles are in radians. Headings follow the yaw convention of
//! [`crate::core::Pose::heading_yaw`]: `atan2(x, z)` of a planar direction,
//! so a yaw of 0 points along world +Z.

use std::f32::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f32 = 2.0 * PI;

/// Wrap an angle into `[-π, π]` using `atan2(sin, cos)`.
///
/// # Example
/// ```
/// use marga::core::math::wrap_angle;
/// use std::f32::consts::PI;
///
/// assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
/// assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
/// ```
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.sin().atan2(angle.cos())
}

/// Signed difference `a - b` taken along the shorter way around the circle.
///
/// Both inputs are wrapped first. If the raw difference is longer than a
/// half turn, the complementary arc with the opposite sign is returned.
/// The result is clamped to `[-π, π]` so rounding never pushes it past the
/// half turn.
///
/// # Example
/// ```
/// use marga::core::math::angle_diff;
/// use std::f32::consts::PI;
///
/// let d = angle_diff(0.9 * PI, -0.9 * PI);
/// assert!((d - (-0.2 * PI)).abs() < 1e-5);
/// ```
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    let d1 = wrap_angle(a) - wrap_angle(b);
    let mut d2 = TWO_PI - d1.abs();
    if d1 > 0.0 {
        d2 = -d2;
    }
    let diff = if d1.abs() < d2.abs() { d1 } else { d2 };
    diff.clamp(-PI, PI)
}

/// Circular mean of two angles.
///
/// # Example
/// ```
/// use marga::core::math::average_angle;
/// use std::f32::consts::PI;
///
/// // Averaging across the ±π seam stays near π, not near 0.
/// let avg = average_angle(0.9 * PI, -0.9 * PI);
/// assert!(avg.abs() > 0.99 * PI);
/// ```
#[inline]
pub fn average_angle(a: f32, b: f32) -> f32 {
    (a.sin() + b.sin()).atan2(a.cos() + b.cos())
}

/// Round to one decimal place, the precision distances are spoken with.
#[inline]
pub fn round_to_tenths(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
