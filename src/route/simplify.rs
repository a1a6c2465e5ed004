//! Breadcrumb trail simplification.
//!
//! A Ramer–Douglas–Peucker style recursive split. For each sub-range the
//! chord `last - first` is built together with two unit vectors orthogonal
//! to it: the horizontal normal (chord turned a quarter revolution about
//! vertical) and `chord × normal`, which picks up height changes such as
//! stairs. A breadcrumb's deviation is the length of its offset from
//! `first` projected onto those two vectors. The sub-range is split at the
//! breadcrumb of maximum deviation whenever that deviation exceeds the path
//! width.
//!
//! The output always starts with the first breadcrumb (oriented along
//! [`REFERENCE_AXIS`]) and ends with the last one, oriented from the last
//! interior keypoint toward it.

use log::debug;

use crate::core::Vec3;
use crate::error::{MargaError, Result};

use super::keypoint::{Keypoint, REFERENCE_AXIS};

/// Configuration for trail simplification.
#[derive(Clone, Debug)]
pub struct SimplifierConfig {
    /// Maximum lateral deviation tolerated before a keypoint is inserted.
    /// Default: 0.3m
    pub path_width: f32,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self { path_width: 0.3 }
    }
}

impl SimplifierConfig {
    /// Builder-style setter for path width.
    pub fn with_path_width(mut self, value: f32) -> Self {
        self.path_width = value;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.path_width.is_finite() || self.path_width < 0.0 {
            return Err(MargaError::InvalidConfig(format!(
                "path_width must be finite and non-negative, got {}",
                self.path_width
            )));
        }
        Ok(())
    }
}

/// Converts a breadcrumb trail into keypoints.
#[derive(Clone, Debug, Default)]
pub struct PathSimplifier {
    config: SimplifierConfig,
}

impl PathSimplifier {
    pub fn new(config: SimplifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Simplify an ordered trail of positions.
    ///
    /// Returns [`MargaError::EmptyTrail`] for an empty trail. A single
    /// breadcrumb yields a start and an end keypoint at the same spot.
    pub fn simplify(&self, breadcrumbs: &[Vec3]) -> Result<Vec<Keypoint>> {
        let (Some(&first), Some(&last)) = (breadcrumbs.first(), breadcrumbs.last()) else {
            return Err(MargaError::EmptyTrail);
        };

        let mut keypoints = vec![Keypoint::new(first, REFERENCE_AXIS)];
        split_recursive(
            breadcrumbs,
            0,
            breadcrumbs.len() - 1,
            self.config.path_width,
            &mut keypoints,
        );

        let last_interior = keypoints.last().map_or(first, |kp| kp.location);
        let orientation = (last - last_interior)
            .planar()
            .try_normalize()
            .unwrap_or(REFERENCE_AXIS);
        keypoints.push(Keypoint::new(last, orientation));

        debug!(
            "[Simplify] {} breadcrumbs -> {} keypoints (width {:.2}m)",
            breadcrumbs.len(),
            keypoints.len(),
            self.config.path_width
        );
        Ok(keypoints)
    }
}

/// Simplify with a given path width.
///
/// # Example
/// ```
/// use marga::core::Vec3;
/// use marga::route::simplify;
///
/// let trail: Vec<Vec3> = (0..10).map(|i| Vec3::new(0.0, 0.0, i as f32 * 0.5)).collect();
/// let keypoints = simplify(&trail, 0.3).unwrap();
/// assert_eq!(keypoints.len(), 2);
/// ```
pub fn simplify(breadcrumbs: &[Vec3], path_width: f32) -> Result<Vec<Keypoint>> {
    PathSimplifier::new(SimplifierConfig::default().with_path_width(path_width))?
        .simplify(breadcrumbs)
}

/// Unit vectors orthogonal to the chord, or `None` for a chord with no
/// horizontal extent.
fn chord_normals(chord: Vec3) -> Option<(Vec3, Vec3)> {
    let unit_chord = chord.try_normalize()?;
    let normal = chord.horizontal_normal().try_normalize()?;
    Some((normal, unit_chord.cross(normal)))
}

/// Deviation of `point` from the chord starting at `origin`.
///
/// Zero when the chord is degenerate.
pub fn lateral_deviation(origin: Vec3, chord: Vec3, point: Vec3) -> f32 {
    let Some((normal, normal2)) = chord_normals(chord) else {
        return 0.0;
    };
    let offset = point - origin;
    let a = offset.dot(normal);
    let b = offset.dot(normal2);
    (a * a + b * b).sqrt()
}

/// Index and deviation of the farthest breadcrumb in `[first..=last]`.
/// Ties resolve to the lowest index.
fn find_max_deviation(points: &[Vec3], first: usize, last: usize) -> Option<(usize, f32)> {
    let origin = points[first];
    let (normal, normal2) = chord_normals(points[last] - origin)?;

    let mut best: Option<(usize, f32)> = None;
    for (idx, &p) in points.iter().enumerate().take(last + 1).skip(first) {
        let offset = p - origin;
        let a = offset.dot(normal);
        let b = offset.dot(normal2);
        let deviation = (a * a + b * b).sqrt();
        if best.is_none_or(|(_, d)| deviation > d) {
            best = Some((idx, deviation));
        }
    }
    best
}

fn split_recursive(
    points: &[Vec3],
    first: usize,
    last: usize,
    path_width: f32,
    out: &mut Vec<Keypoint>,
) {
    if last <= first + 1 {
        return;
    }

    let Some((split_idx, deviation)) = find_max_deviation(points, first, last) else {
        return;
    };
    // Endpoints lie on the chord; a split there could not make progress.
    if deviation <= path_width || split_idx == first || split_idx == last {
        return;
    }

    let before = out.len();
    split_recursive(points, first, split_idx, path_width, out);
    let preceding = if out.len() > before {
        out[out.len() - 1].location
    } else {
        points[first]
    };
    out.push(Keypoint::heading_from(preceding, points[split_idx]));
    split_recursive(points, split_idx, last, path_width, out);
}
