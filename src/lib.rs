//! # Marga: Indoor Wayfinding Core
//!
//! Record a walked route as breadcrumbs from a visual-inertial pose
//! tracker, reduce it to a handful of keypoints, and guide the user back
//! along it with clock-face or haptic directions.
//!
//! ## Quick Start
//!
//! ```rust
//! use marga::core::{Pose, Vec3};
//! use marga::guidance::{GuidanceEngine, KeypointQueue, GuidanceStep};
//! use marga::route::simplify;
//!
//! // Walk 5m ahead, then 5m to the right.
//! let trail: Vec<Vec3> = (0..=10)
//!     .map(|i| Vec3::new(0.0, 0.0, -(i as f32) * 0.5))
//!     .chain((1..=10).map(|i| Vec3::new(i as f32 * 0.5, 0.0, -5.0)))
//!     .collect();
//! let keypoints = simplify(&trail, 0.3).unwrap();
//! assert_eq!(keypoints.len(), 3);
//!
//! let engine = GuidanceEngine::default();
//! let mut queue = KeypointQueue::new(keypoints, trail[0]).unwrap();
//! let here = Pose::from_translation(Vec3::new(0.0, 0.0, -1.0));
//! if let GuidanceStep::EnRoute(direction) = queue.step(&engine, &here) {
//!     println!("{} o'clock, {:.1}m", direction.clock_direction, direction.distance);
//! }
//! ```
//!
//! ## Coordinate Frame
//!
//! Poses come from the tracker's world frame:
//! - **Y-up**: gravity points along -Y
//! - **X/Z**: horizontal plane; headings are yaw angles about Y
//! - **Rotation**: column-major, columns are the device's right, up and
//!   backward axes
//!
//! ## Architecture
//!
//! - [`core`]: Vectors, rigid poses, angle helpers, ring buffer
//! - [`route`]: Breadcrumb recording and trail simplification
//! - [`guidance`]: Arrival boxes, directions, keypoint queue, phrasing
//! - [`calibration`]: Walking-heading offset estimation
//! - [`alignment`]: Pause/resume frame realignment
//! - [`tracking`]: Tracking quality and the pose source seam
//! - [`scheduler`]: Deterministic timers on an explicit clock
//! - [`session`]: Phase machine and the controller that drives it all
//! - [`config`]: YAML configuration
//!
//! ## Data Flow
//!
//! ```text
//!   PoseSource ──► BreadcrumbRecorder ──► RecordedRoute
//!       │                                      │ simplify()
//!       │                                      ▼
//!       ├──────► HeadingCalibrator ──► offset  Keypoints
//!       │                                │     │
//!       │                                ▼     ▼
//!       └──────────────────────────► GuidanceEngine + KeypointQueue
//!                                          │
//!                                          ▼
//!                                   DirectionInfo ──► announcement()
//! ```

pub mod alignment;
pub mod calibration;
pub mod config;
pub mod core;
pub mod error;
pub mod guidance;
pub mod route;
pub mod scheduler;
pub mod session;
pub mod tracking;

// Re-export main types at crate root
pub use config::MargaConfig;
pub use error::{MargaError, Result};
pub use session::{Event, Phase, SessionConfig, SessionController, SessionObserver};
pub use tracking::{PoseSource, TrackingState};

pub use crate::core::{Pose, RigidTransform, Vec3};
pub use guidance::{DirectionInfo, GuidanceEngine, KeypointQueue};
pub use route::{Keypoint, RecordedRoute, RouteDirection};
