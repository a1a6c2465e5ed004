//! Pose realignment for pausing and resuming a route.
//!
//! Every tracking session picks its own world origin. To resume a route
//! in a new session, the user returns to where they paused and holds the
//! phone the same way; the live pose is then compared to the pose captured
//! at pause time and the tracking origin is moved so the two coincide.

mod coordinator;
mod rebase;

pub use coordinator::{AlignmentConfig, AlignmentCoordinator, AlignmentOutcome};
pub use rebase::compute_rebase;
