//! Route data records: breadcrumbs, keypoints and recorded routes.

use serde::{Deserialize, Serialize};

use crate::core::{Pose, Vec3};

/// Orientation used when no travel direction can be derived.
pub const REFERENCE_AXIS: Vec3 = Vec3::X;

/// A device pose sampled while walking a route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub pose: Pose,
    /// Seconds since recording started.
    #[serde(default)]
    pub timestamp: f32,
}

impl Breadcrumb {
    pub fn new(pose: Pose, timestamp: f32) -> Self {
        Self { pose, timestamp }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.pose.translation
    }
}

/// A simplified waypoint: where to go and which way to be heading when
/// you get there.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub location: Vec3,
    /// Unit, horizontal direction of onward travel.
    pub orientation: Vec3,
}

impl Keypoint {
    pub fn new(location: Vec3, orientation: Vec3) -> Self {
        Self {
            location,
            orientation,
        }
    }

    /// Keypoint at `location` oriented horizontally from `from` toward it.
    ///
    /// Falls back to [`REFERENCE_AXIS`] when the two points share a
    /// vertical line.
    pub fn heading_from(from: Vec3, location: Vec3) -> Self {
        let orientation = (location - from)
            .planar()
            .try_normalize()
            .unwrap_or(REFERENCE_AXIS);
        Self::new(location, orientation)
    }
}

/// Which way a recorded trail is walked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDirection {
    /// From where recording started to where it stopped.
    #[default]
    Forward,
    /// Back from the end of the recording to its start.
    Reverse,
}

/// A frozen recording: the breadcrumb trail plus optional anchor poses
/// captured at the ends of the route.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedRoute {
    #[serde(default)]
    pub name: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(default)]
    pub begin_anchor: Option<Pose>,
    #[serde(default)]
    pub end_anchor: Option<Pose>,
}

impl RecordedRoute {
    pub fn len(&self) -> usize {
        self.breadcrumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breadcrumbs.is_empty()
    }

    /// Breadcrumb positions in walking order.
    pub fn positions(&self, direction: RouteDirection) -> Vec<Vec3> {
        let iter = self.breadcrumbs.iter().map(Breadcrumb::position);
        match direction {
            RouteDirection::Forward => iter.collect(),
            RouteDirection::Reverse => iter.rev().collect(),
        }
    }

    /// Anchor where walking in `direction` starts.
    pub fn start_anchor(&self, direction: RouteDirection) -> Option<Pose> {
        match direction {
            RouteDirection::Forward => self.begin_anchor,
            RouteDirection::Reverse => self.end_anchor,
        }
    }
}
