//! Route recording and simplification.
//!
//! A route is recorded as a dense trail of [`Breadcrumb`]s and reduced to
//! a handful of [`Keypoint`]s by the [`PathSimplifier`] when navigation
//! starts.

mod keypoint;
mod recorder;
mod simplify;

pub use keypoint::{Breadcrumb, Keypoint, REFERENCE_AXIS, RecordedRoute, RouteDirection};
pub use recorder::BreadcrumbRecorder;
pub use simplify::{PathSimplifier, SimplifierConfig, lateral_deviation, simplify};
