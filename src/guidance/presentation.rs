//! Spoken/text rendering of guidance values.

use crate::core::math::round_to_tenths;

use super::direction::DirectionInfo;
use super::engine::{TurnWarning, VerticalTransition};

/// Phrase for a clock bearing. Unknown keys read as an empty string.
pub fn clock_phrase(clock: u8) -> &'static str {
    match clock {
        12 => "Continue straight",
        1 => "Slight right towards 1 o'clock",
        2 => "Slight right towards 2 o'clock",
        3 => "Turn right",
        4 => "Turn towards 4 o'clock",
        5 => "Turn around towards 5 o'clock",
        6 => "Turn around towards 6 o'clock",
        7 => "Turn around towards 7 o'clock",
        8 => "Turn towards 8 o'clock",
        9 => "Turn left",
        10 => "Slight left towards 10 o'clock",
        11 => "Slight left towards 11 o'clock",
        _ => "",
    }
}

/// Phrase for a haptic code; 0 is the error sentinel.
pub fn haptic_phrase(code: u8) -> &'static str {
    match code {
        1 => "Continue straight",
        2 => "Slight right",
        3 => "Turn right",
        4 => "Turn around",
        5 => "Turn left",
        6 => "Slight left",
        _ => "ERROR",
    }
}

/// Phrase announcing an upcoming turn. Turns behind the user have no
/// warning and read as an empty string.
pub fn turn_warning_phrase(clock: u8) -> &'static str {
    match clock {
        12 => "Continue straight ahead",
        1 | 2 => "Slight right ahead",
        3 | 4 => "Right turn ahead",
        8 | 9 => "Left turn ahead",
        10 | 11 => "Slight left ahead",
        _ => "",
    }
}

/// How bearings are phrased.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionStyle {
    #[default]
    Clock,
    Haptic,
}

/// Build the announcement for one guidance cycle.
///
/// Distances are given in tenths of a meter, rounded to whole meters from
/// ten meters on. Stairs replace the distance with a climb/descend hint.
///
/// ```
/// use marga::guidance::{DirectionInfo, DirectionStyle, TargetState, announcement};
///
/// let info = DirectionInfo {
///     distance: 3.24,
///     clock_direction: 12,
///     haptic_direction: 1,
///     target_state: TargetState::NotAtTarget,
///     angle_diff: 0.0,
///     lateral_ratio_at_crossing: 0.0,
/// };
/// let text = announcement(&info, DirectionStyle::Clock, None, true);
/// assert_eq!(text, "Continue straight for 3.2 meters");
/// ```
pub fn announcement(
    direction: &DirectionInfo,
    style: DirectionStyle,
    vertical: Option<VerticalTransition>,
    show_distance: bool,
) -> String {
    let mut text = match style {
        DirectionStyle::Clock => clock_phrase(direction.clock_direction),
        DirectionStyle::Haptic => haptic_phrase(direction.haptic_direction),
    }
    .to_string();

    match vertical {
        Some(VerticalTransition::Upstairs) => text.push_str(" and proceed upstairs"),
        Some(VerticalTransition::Downstairs) => text.push_str(" and proceed downstairs"),
        None if show_distance => {
            let meters = round_to_tenths(direction.distance);
            if meters >= 10.0 {
                text.push_str(&format!(" for {} meters", meters as i32));
            } else {
                text.push_str(&format!(" for {:.1} meters", meters));
            }
        }
        None => {}
    }
    text
}

/// Announcement for a turn warning, `None` for turns behind the user.
pub fn turn_warning_announcement(warning: &TurnWarning) -> Option<&'static str> {
    let phrase = turn_warning_phrase(warning.clock_direction);
    (!phrase.is_empty()).then_some(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::TargetState;

    fn info(distance: f32, clock: u8, haptic: u8) -> DirectionInfo {
        DirectionInfo {
            distance,
            clock_direction: clock,
            haptic_direction: haptic,
            target_state: TargetState::NotAtTarget,
            angle_diff: 0.0,
            lateral_ratio_at_crossing: f32::INFINITY,
        }
    }

    #[test]
    fn test_tables_cover_every_code() {
        for clock in 1..=12 {
            assert!(!clock_phrase(clock).is_empty());
        }
        for code in 1..=6 {
            assert_ne!(haptic_phrase(code), "ERROR");
        }
        assert_eq!(haptic_phrase(0), "ERROR");
    }

    #[test]
    fn test_long_distance_rounded() {
        let text = announcement(&info(12.46, 3, 3), DirectionStyle::Clock, None, true);
        assert_eq!(text, "Turn right for 12 meters");
    }

    #[test]
    fn test_haptic_style_and_stairs() {
        let text = announcement(
            &info(4.0, 9, 5),
            DirectionStyle::Haptic,
            Some(VerticalTransition::Upstairs),
            true,
        );
        assert_eq!(text, "Turn left and proceed upstairs");
    }

    #[test]
    fn test_turn_warning_behind_is_silent() {
        let behind = TurnWarning {
            clock_direction: 6,
            angle_diff: 3.0,
        };
        assert!(turn_warning_announcement(&behind).is_none());
        let right = TurnWarning {
            clock_direction: 3,
            angle_diff: 1.5,
        };
        assert_eq!(turn_warning_announcement(&right), Some("Right turn ahead"));
    }
}
