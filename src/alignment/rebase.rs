//! Frame rebasing between tracking sessions.

use crate::core::{Pose, RigidTransform};

/// Transform that re-bases the live tracking frame onto the frame a saved
/// pose was recorded in.
///
/// Both poses are leveled first (roll and pitch dropped, heading and
/// position kept), then `rebase = leveled_live * leveled_saved⁻¹`. Handing
/// the result to [`PoseSource::rebase_origin`](crate::tracking::PoseSource::rebase_origin)
/// makes the live leveled pose read as the saved one.
///
/// Pure: the same inputs always give the same transform. Applying it twice
/// compounds the correction.
///
/// ```
/// use marga::alignment::compute_rebase;
/// use marga::core::{Pose, Vec3};
///
/// let saved = Pose::from_yaw(0.5, Vec3::new(1.0, 0.0, 2.0));
/// let live = Pose::from_yaw(-1.0, Vec3::new(-3.0, 0.2, 0.0));
/// let rebase = compute_rebase(&saved, &live);
/// let realigned = rebase.inverse() * live.leveled();
/// assert!(realigned.approx_eq(&saved.leveled(), 1e-4));
/// ```
pub fn compute_rebase(saved: &Pose, live: &Pose) -> RigidTransform {
    live.leveled() * saved.leveled().inverse()
}
