//! Navigation integration tests.
//!
//! Trail simplification feeding the keypoint queue and guidance engine,
//! with a simulated user walking the route.

mod common;

use approx::assert_relative_eq;
use std::f32::consts::PI;

use marga::core::{Pose, Vec3};
use marga::guidance::{
    DirectionStyle, GuidanceEngine, GuidanceStep, KeypointQueue, TargetState, TurnWarning,
    VerticalTransition, announcement, clock_direction, haptic_code, turn_warning_announcement,
};
use marga::route::{Breadcrumb, Keypoint, RecordedRoute, RouteDirection, simplify};

/// Outcome of walking a trail against a keypoint queue.
#[derive(Debug, Default)]
struct Walk {
    reached: Vec<Keypoint>,
    warnings: Vec<TurnWarning>,
    verticals: Vec<VerticalTransition>,
    completed: bool,
    cycles: usize,
}

/// Walk `trail` in steps of `step` meters, facing the next breadcrumb,
/// running one guidance cycle per step.
fn walk(trail: &[Vec3], queue: &mut KeypointQueue, engine: &GuidanceEngine, step: f32) -> Walk {
    let mut walk = Walk::default();
    for pair in trail.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let n = ((to - from).length() / step).ceil().max(1.0) as usize;
        for k in 0..n {
            let position = from + (to - from) * (k as f32 / n as f32);
            let pose = common::pose_facing(position, to);
            walk.cycles += 1;
            match queue.step(engine, &pose) {
                GuidanceStep::Completed => {
                    walk.completed = true;
                    return walk;
                }
                GuidanceStep::Arrived { reached, .. } => walk.reached.push(reached),
                GuidanceStep::EnRoute(direction) => {
                    if let Some(w) = queue.take_turn_warning(engine, &pose, &direction) {
                        walk.warnings.push(w);
                    }
                    if let Some(v) = queue.vertical_transition(engine, &pose)
                        && walk.verticals.last() != Some(&v)
                    {
                        walk.verticals.push(v);
                    }
                }
            }
        }
    }

    // Stand at the last breadcrumb for a few cycles.
    if let (Some(&last), Some(&before)) = (trail.last(), trail.iter().rev().nth(1)) {
        let pose = common::pose_facing(last, last + (last - before));
        for _ in 0..5 {
            walk.cycles += 1;
            if queue.step(engine, &pose) == GuidanceStep::Completed {
                walk.completed = true;
                break;
            }
        }
    }
    walk
}

fn l_shaped_trail(first_leg: f32, second_leg: f32) -> Vec<Vec3> {
    let mut trail: Vec<Vec3> = (0..=20)
        .map(|i| Vec3::new(0.0, 0.0, -first_leg * i as f32 / 20.0))
        .collect();
    trail.extend((1..=20).map(|i| Vec3::new(second_leg * i as f32 / 20.0, 0.0, -first_leg)));
    trail
}

// ============================================================================
// Simplification
// ============================================================================

#[test]
fn test_collinear_trail_gives_two_keypoints() {
    let trail = common::straight_trail(30, 0.3);
    let keypoints = simplify(&trail, 0.3).unwrap();

    assert_eq!(keypoints.len(), 2);
    assert_eq!(keypoints[0].location, trail[0]);
    assert_eq!(keypoints[1].location, trail[29]);
    assert_relative_eq!(keypoints[1].orientation.z, -1.0, epsilon = 1e-6);
}

#[test]
fn test_right_angle_gives_corner_keypoint() {
    let trail = common::right_angle_trail();
    let keypoints = simplify(&trail, 0.3).unwrap();

    assert_eq!(keypoints.len(), 3);
    let corner = keypoints[1].location;
    assert_relative_eq!(corner.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(corner.z, 5.0, epsilon = 1e-5);

    // Orientation is the direction travelled into each keypoint.
    assert_relative_eq!(keypoints[1].orientation.z, 1.0, epsilon = 1e-5);
    assert_relative_eq!(keypoints[2].orientation.x, 1.0, epsilon = 1e-5);
}

#[test]
fn test_simplify_is_idempotent() {
    for trail in [common::right_angle_trail(), common::stairs_trail(3.0)] {
        let once = simplify(&trail, 0.3).unwrap();
        let locations: Vec<Vec3> = once.iter().map(|kp| kp.location).collect();
        let twice = simplify(&locations, 0.3).unwrap();

        let again: Vec<Vec3> = twice.iter().map(|kp| kp.location).collect();
        assert_eq!(locations, again);
    }
}

#[test]
fn test_wider_path_keeps_fewer_keypoints() {
    // A gentle 0.5m jog in an otherwise straight corridor.
    let mut trail = common::straight_trail(20, 0.5);
    for p in trail.iter_mut().skip(8).take(4) {
        p.x = 0.5;
    }
    let narrow = simplify(&trail, 0.3).unwrap();
    let wide = simplify(&trail, 1.0).unwrap();
    assert!(narrow.len() > wide.len());
    assert_eq!(wide.len(), 2);
}

#[test]
fn test_stairs_split_at_landings() {
    let keypoints = simplify(&common::stairs_trail(3.0), 0.3).unwrap();
    assert_eq!(keypoints.len(), 4);
    assert_relative_eq!(keypoints[1].location.z, -4.5, epsilon = 1e-4);
    assert_relative_eq!(keypoints[2].location.y, 3.0, epsilon = 1e-4);
}

#[test]
fn test_reverse_route_starts_at_the_end() {
    let trail = common::right_angle_trail();
    let route = RecordedRoute {
        name: "corner".into(),
        breadcrumbs: trail
            .iter()
            .enumerate()
            .map(|(i, &p)| Breadcrumb::new(Pose::from_translation(p), i as f32 * 0.3))
            .collect(),
        begin_anchor: None,
        end_anchor: Some(Pose::from_translation(Vec3::new(5.0, 0.0, 5.0))),
    };

    let back = simplify(&route.positions(RouteDirection::Reverse), 0.3).unwrap();
    assert_eq!(back.len(), 3);
    assert_eq!(back[0].location, Vec3::new(5.0, 0.0, 5.0));
    assert_relative_eq!(back[2].orientation.z, -1.0, epsilon = 1e-5);
    assert!(route.start_anchor(RouteDirection::Reverse).is_some());
    assert!(route.start_anchor(RouteDirection::Forward).is_none());
}

// ============================================================================
// Guidance along a walked route
// ============================================================================

#[test]
fn test_walk_right_angle_to_completion() {
    let trail = common::right_angle_trail();
    let keypoints = simplify(&trail, 0.3).unwrap();
    let engine = GuidanceEngine::default();
    let mut queue = KeypointQueue::new(keypoints, trail[0]).unwrap();

    let walk = walk(&trail, &mut queue, &engine, 0.25);

    assert!(walk.completed, "walk ended after {} cycles", walk.cycles);
    assert_eq!(walk.reached.len(), 2);
    assert_eq!(walk.reached[0].location, trail[0]);
    assert_relative_eq!(walk.reached[1].location.z, 5.0, epsilon = 1e-5);
    // Both legs are shorter than the warning threshold.
    assert!(walk.warnings.is_empty());
}

#[test]
fn test_turn_warning_before_long_corner() {
    let trail = l_shaped_trail(10.0, 10.0);
    let keypoints = simplify(&trail, 0.3).unwrap();
    assert_eq!(keypoints.len(), 3);

    let engine = GuidanceEngine::default();
    let mut queue = KeypointQueue::new(keypoints, trail[0]).unwrap();
    let walk = walk(&trail, &mut queue, &engine, 0.25);

    assert!(walk.completed);
    assert_eq!(walk.warnings.len(), 1);
    assert_eq!(walk.warnings[0].clock_direction, 3);
    assert_eq!(
        turn_warning_announcement(&walk.warnings[0]),
        Some("Right turn ahead")
    );
}

#[test]
fn test_stairs_announced_on_the_flight() {
    let trail = common::stairs_trail(3.0);
    let keypoints = simplify(&trail, 0.3).unwrap();
    let engine = GuidanceEngine::default();
    let mut queue = KeypointQueue::new(keypoints, trail[0]).unwrap();

    let walk = walk(&trail, &mut queue, &engine, 0.25);
    assert!(walk.completed);
    assert_eq!(walk.verticals, vec![VerticalTransition::Upstairs]);
}

#[test]
fn test_first_direction_points_down_the_route() {
    let trail = common::straight_trail(20, 0.5);
    let keypoints = simplify(&trail, 0.3).unwrap();
    let engine = GuidanceEngine::default();
    let mut queue = KeypointQueue::new(keypoints, trail[0]).unwrap();

    let pose = common::pose_facing(trail[0], trail[1]);
    let GuidanceStep::Arrived { direction, .. } = queue.step(&engine, &pose) else {
        panic!("start keypoint should be reached immediately");
    };
    assert!(queue.is_final());
    assert_eq!(direction.clock_direction, 12);
    assert_eq!(direction.target_state, TargetState::NotAtTarget);
    assert_eq!(
        announcement(&direction, DirectionStyle::Clock, None, true),
        "Continue straight for 9.5 meters"
    );
}

#[test]
fn test_facing_away_says_turn_around() {
    let keypoint = Keypoint::new(Vec3::new(0.0, 0.0, -6.0), Vec3::new(0.0, 0.0, -1.0));
    let engine = GuidanceEngine::default();
    let pose = common::pose_facing(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    let info = engine.direction(&pose, &keypoint);
    assert_eq!(info.clock_direction, 6);
    assert_eq!(
        announcement(&info, DirectionStyle::Haptic, None, false),
        "Turn around"
    );
}

// ============================================================================
// Bearing encodings
// ============================================================================

#[test]
fn test_clock_and_haptic_ranges() {
    for i in -360..=360 {
        let angle = i as f32 * PI / 360.0;
        let clock = clock_direction(angle);
        let haptic = haptic_code(angle);
        assert!((1..=12).contains(&clock), "clock {} for {}", clock, angle);
        assert!((1..=6).contains(&haptic), "haptic {} for {}", haptic, angle);
    }
}

#[test]
fn test_clock_and_haptic_agree_ahead_and_behind() {
    for i in -10..=10 {
        let ahead = i as f32 * PI / 150.0;
        assert_eq!(clock_direction(ahead), 12);
        assert_eq!(haptic_code(ahead), 1);

        let behind = PI - ahead.abs();
        assert_eq!(clock_direction(behind), 6);
        assert_eq!(haptic_code(behind), 4);
    }
}
