//! Bearing encodings and the per-cycle guidance value.

use std::f32::consts::{FRAC_PI_3, FRAC_PI_6, PI};

use log::error;
use serde::{Deserialize, Serialize};

/// Arrival classification relative to the next keypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    NotAtTarget,
    CloseToTarget,
    AtTarget,
}

impl TargetState {
    pub fn name(&self) -> &'static str {
        match self {
            TargetState::NotAtTarget => "NotAtTarget",
            TargetState::CloseToTarget => "CloseToTarget",
            TargetState::AtTarget => "AtTarget",
        }
    }
}

/// Six coarse zones, each a third of a half turn wide, numbered
/// clockwise from straight ahead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticDirection {
    Straight = 1,
    SlightRight = 2,
    Right = 3,
    TurnAround = 4,
    Left = 5,
    SlightLeft = 6,
}

/// Code reported when no haptic zone matched.
pub const HAPTIC_ERROR_CODE: u8 = 0;

impl HapticDirection {
    /// Zone for a relative bearing in `[-π, π]`.
    ///
    /// Closed intervals are tested in order, so a boundary value belongs to
    /// the first zone listed. Only a non-finite bearing falls through.
    pub fn from_angle(angle: f32) -> Option<Self> {
        const ZONES: [(f32, f32, HapticDirection); 7] = [
            (-FRAC_PI_6, FRAC_PI_6, HapticDirection::Straight),
            (FRAC_PI_6, FRAC_PI_3, HapticDirection::SlightRight),
            (FRAC_PI_3, 2.0 * FRAC_PI_3, HapticDirection::Right),
            (2.0 * FRAC_PI_3, PI, HapticDirection::TurnAround),
            (-PI, -2.0 * FRAC_PI_3, HapticDirection::TurnAround),
            (-2.0 * FRAC_PI_3, -FRAC_PI_3, HapticDirection::Left),
            (-FRAC_PI_3, -FRAC_PI_6, HapticDirection::SlightLeft),
        ];
        ZONES
            .iter()
            .find(|(lo, hi, _)| angle >= *lo && angle <= *hi)
            .map(|(_, _, zone)| *zone)
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Haptic code for a relative bearing, `0` when no zone matched.
pub fn haptic_code(angle: f32) -> u8 {
    match HapticDirection::from_angle(angle) {
        Some(zone) => zone.code(),
        None => {
            error!(
                "[Guidance] Bearing {} matched no haptic zone, reporting code {}",
                angle, HAPTIC_ERROR_CODE
            );
            HAPTIC_ERROR_CODE
        }
    }
}

/// Clock-face bearing, 12 straight ahead and 3 to the right.
///
/// Always in `1..=12`; non-finite input reads as straight ahead.
///
/// # Example
/// ```
/// use marga::guidance::clock_direction;
/// use std::f32::consts::FRAC_PI_2;
///
/// assert_eq!(clock_direction(0.0), 12);
/// assert_eq!(clock_direction(FRAC_PI_2), 3);
/// assert_eq!(clock_direction(-FRAC_PI_2), 9);
/// ```
pub fn clock_direction(angle: f32) -> u8 {
    let hours = (angle * 6.0 / PI + 12.5).floor();
    // Saturating cast: NaN becomes 0, which maps to 12 like straight ahead.
    let clock = (hours as i64).rem_euclid(12) as u8;
    if clock == 0 { 12 } else { clock }
}

/// Guidance toward the next keypoint, recomputed every cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionInfo {
    /// Planar distance to the keypoint (meters).
    pub distance: f32,
    /// Clock bearing, `1..=12`.
    pub clock_direction: u8,
    /// Haptic zone code, `1..=6`, or `0` on a logic error.
    pub haptic_direction: u8,
    pub target_state: TargetState,
    /// Signed bearing of the keypoint relative to the device heading.
    pub angle_diff: f32,
    /// Lateral miss distance where the current heading crosses the
    /// keypoint plane, divided by the arrival box width. Infinite when the
    /// device is heading away from the plane.
    pub lateral_ratio_at_crossing: f32,
}

impl DirectionInfo {
    pub fn haptic(&self) -> Option<HapticDirection> {
        HapticDirection::from_angle(self.angle_diff)
    }

    pub fn is_at_target(&self) -> bool {
        self.target_state == TargetState::AtTarget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_straight_is_twelve() {
        assert_eq!(clock_direction(0.0), 12);
        assert_eq!(clock_direction(PI), 6);
        assert_eq!(clock_direction(-PI), 6);
    }

    #[test]
    fn test_clock_always_in_range() {
        let mut angle = -50.0f32;
        while angle < 50.0 {
            let c = clock_direction(angle);
            assert!((1..=12).contains(&c), "angle {} -> {}", angle, c);
            angle += 0.037;
        }
        assert_eq!(clock_direction(f32::NAN), 12);
        assert!((1..=12).contains(&clock_direction(f32::INFINITY)));
    }

    #[test]
    fn test_clock_hour_boundaries() {
        let hour = PI / 6.0;
        assert_eq!(clock_direction(0.49 * hour), 12);
        assert_eq!(clock_direction(0.51 * hour), 1);
        assert_eq!(clock_direction(-0.51 * hour), 11);
        assert_eq!(clock_direction(2.0 * hour), 2);
    }

    #[test]
    fn test_haptic_partition_has_no_gaps() {
        let steps = 20_000;
        for i in 0..=steps {
            let angle = -PI + 2.0 * PI * i as f32 / steps as f32;
            assert!(
                HapticDirection::from_angle(angle).is_some(),
                "gap at {}",
                angle
            );
        }
    }

    #[test]
    fn test_haptic_zones() {
        use HapticDirection::*;
        assert_eq!(HapticDirection::from_angle(0.0), Some(Straight));
        assert_eq!(HapticDirection::from_angle(0.7), Some(SlightRight));
        assert_eq!(HapticDirection::from_angle(1.5), Some(Right));
        assert_eq!(HapticDirection::from_angle(3.0), Some(TurnAround));
        assert_eq!(HapticDirection::from_angle(-3.0), Some(TurnAround));
        assert_eq!(HapticDirection::from_angle(-1.5), Some(Left));
        assert_eq!(HapticDirection::from_angle(-0.7), Some(SlightLeft));
    }

    #[test]
    fn test_haptic_boundaries_go_to_first_zone() {
        assert_eq!(
            HapticDirection::from_angle(FRAC_PI_6),
            Some(HapticDirection::Straight)
        );
        assert_eq!(
            HapticDirection::from_angle(-FRAC_PI_6),
            Some(HapticDirection::Straight)
        );
        assert_eq!(
            HapticDirection::from_angle(PI),
            Some(HapticDirection::TurnAround)
        );
    }

    #[test]
    fn test_haptic_error_code_only_for_nan() {
        assert_eq!(haptic_code(f32::NAN), HAPTIC_ERROR_CODE);
        assert_eq!(haptic_code(0.1), 1);
    }
}
