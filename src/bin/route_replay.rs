//! CLI tool for replaying a recorded trail through the guidance pipeline.
//!
//! Simplifies the trail into keypoints, then walks a simulated user along
//! it and prints the announcements a blind user would hear.
//!
//! # Usage
//!
//! ```bash
//! # Walk a saved route back to where recording started
//! route_replay route.yaml --reverse
//!
//! # Haptic codes instead of clock directions, custom config
//! route_replay trail.yaml --haptic --config configs/marga.yaml
//! ```
//!
//! The trail file is either a saved route (`breadcrumbs:` with poses) or a
//! plain list of `[x, y, z]` positions.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use marga::core::{Pose, RigidTransform, Vec3};
use marga::guidance::{DirectionStyle, announcement, turn_warning_announcement};
use marga::route::{Breadcrumb, Keypoint, PathSimplifier, RecordedRoute, RouteDirection};
use marga::session::{Event, GuidanceUpdate, Phase, SessionController, SessionObserver};
use marga::{MargaConfig, PoseSource};

#[derive(Parser)]
#[command(name = "route-replay")]
#[command(about = "Replay a recorded trail through keypoint guidance")]
struct Args {
    /// Trail file (YAML)
    trail: PathBuf,

    /// Configuration file (defaults to configs/marga.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Walk the trail from its end back to its start
    #[arg(short, long)]
    reverse: bool,

    /// Print haptic directions instead of clock directions
    #[arg(long)]
    haptic: bool,

    /// Simulated walking speed (m/s)
    #[arg(long, default_value = "1.0")]
    speed: f32,

    /// Only print the keypoints
    #[arg(long)]
    keypoints_only: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrailFile {
    Route(RecordedRoute),
    Points(Vec<[f32; 3]>),
}

impl TrailFile {
    fn into_route(self, name: &str, period: f32) -> RecordedRoute {
        match self {
            TrailFile::Route(route) => route,
            TrailFile::Points(points) => RecordedRoute {
                name: name.to_string(),
                breadcrumbs: points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        Breadcrumb::new(
                            Pose::from_translation(Vec3::new(p[0], p[1], p[2])),
                            i as f32 * period,
                        )
                    })
                    .collect(),
                begin_anchor: None,
                end_anchor: None,
            },
        }
    }
}

/// Pose source that reports whatever pose the replay loop sets.
struct ReplaySource {
    pose: Option<Pose>,
}

impl PoseSource for ReplaySource {
    fn current_pose(&self) -> Option<Pose> {
        self.pose
    }

    fn rebase_origin(&mut self, transform: &RigidTransform) {
        self.pose = self.pose.map(|pose| transform.inverse() * pose);
    }
}

/// Prints announcements as they change.
struct Announcer {
    style: DirectionStyle,
    last: Option<String>,
}

impl SessionObserver for Announcer {
    fn on_guidance(&mut self, update: &GuidanceUpdate) {
        if let Some(warning) = update.turn_warning.as_ref()
            && let Some(text) = turn_warning_announcement(warning)
        {
            println!("  ! {}", text);
        }
        let text = announcement(&update.direction, self.style, update.vertical, true);
        // Distances change every cycle; only repeat when the bearing does.
        let bearing = text.split(" for ").next().unwrap_or_default().to_string();
        if self.last.as_deref() != Some(bearing.as_str()) {
            println!("  > {}", text);
            self.last = Some(bearing);
        }
    }

    fn on_keypoint_reached(&mut self, keypoint: &Keypoint, remaining: usize) {
        println!(
            "  * reached ({:.2}, {:.2}, {:.2}), {} to go",
            keypoint.location.x, keypoint.location.y, keypoint.location.z, remaining
        );
        self.last = None;
    }

    fn on_route_completed(&mut self) {
        println!("  * arrived");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            MargaConfig::load(path)?
        }
        None => MargaConfig::load_default()?,
    };

    let route = load_trail(&args.trail, config.route.sample_period)?;
    let direction = if args.reverse {
        RouteDirection::Reverse
    } else {
        RouteDirection::Forward
    };
    let positions = route.positions(direction);
    info!(
        "Trail '{}': {} breadcrumbs, walking {:?}",
        route.name,
        positions.len(),
        direction
    );

    let keypoints = PathSimplifier::new(config.to_simplifier_config())?.simplify(&positions)?;
    println!("Keypoints ({}):", keypoints.len());
    for (i, kp) in keypoints.iter().enumerate() {
        println!(
            "  {:>2}: ({:>7.2}, {:>6.2}, {:>7.2})  heading ({:>5.2}, {:>5.2})",
            i, kp.location.x, kp.location.y, kp.location.z, kp.orientation.x, kp.orientation.z
        );
    }
    if args.keypoints_only {
        return Ok(());
    }

    replay(&config, route, direction, &positions, &args)
}

fn load_trail(path: &Path, period: f32) -> Result<RecordedRoute, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let trail: TrailFile = serde_yaml::from_str(&contents)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(trail.into_route(&name, period))
}

fn replay(
    config: &MargaConfig,
    mut route: RecordedRoute,
    direction: RouteDirection,
    positions: &[Vec3],
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    // The replay walks in the recorded frame; there is nothing to realign.
    route.begin_anchor = None;
    route.end_anchor = None;

    let session_config = config.to_session_config();
    let dt = session_config.guidance_period;
    let step = (args.speed * dt).max(0.01);

    let source = ReplaySource {
        pose: positions.first().map(|p| facing(*p, positions.get(1).copied())),
    };
    let mut session = SessionController::new(session_config, source)?;
    session.add_observer(Box::new(Announcer {
        style: if args.haptic {
            DirectionStyle::Haptic
        } else {
            DirectionStyle::Clock
        },
        last: None,
    }));
    session.load_route(route, direction)?;
    session.handle(Event::StartNavigation)?;

    println!("Guidance:");
    let mut t = 0.0;
    for pair in positions.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let steps = ((to - from).length() / step).ceil().max(1.0) as usize;
        for k in 1..=steps {
            let p = from + (to - from) * (k as f32 / steps as f32);
            session.source_mut().pose = Some(facing(p, Some(to + (to - from))));
            t += dt;
            session.advance_to(t)?;
            if session.phase() == Phase::Completed {
                return Ok(());
            }
        }
    }

    // Linger at the end so the final box can register.
    for _ in 0..10 {
        t += dt;
        session.advance_to(t)?;
        if session.phase() == Phase::Completed {
            return Ok(());
        }
    }
    warn!(
        "Replay ended without reaching the final keypoint ({} left)",
        session.queue().map(|q| q.len()).unwrap_or(0)
    );
    Ok(())
}

/// Upright pose at `position` looking toward `toward`.
fn facing(position: Vec3, toward: Option<Vec3>) -> Pose {
    let yaw = toward
        .and_then(|t| (position - t).planar().try_normalize())
        .map(|back| back.yaw())
        .unwrap_or(0.0);
    Pose::from_yaw(yaw, position)
}
