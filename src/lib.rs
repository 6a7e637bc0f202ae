//! Wayline is the geometry-to-time core of a waypoint path animator.
//!
//! Wayline turns a sparse, ordered list of authored waypoints into a dense,
//! (near-)uniformly spaced curve with corner-aware velocity shaping, and
//! drives a deterministic progress clock over that curve, honoring
//! per-waypoint pauses and variable playback speed.
//!
//! # Pipeline overview
//!
//! 1. **Interpolate**: `&[Waypoint] -> dense polyline` (cardinal spline with
//!    per-segment tension overrides)
//! 2. **Reparameterize**: resample to the target arc-length spacing,
//!    optionally compressed near high-curvature points ([`PathConfig`])
//! 3. **Shape**: annotate each point with its controlling waypoint's shape
//!    tag and apply deterministic cosmetic jitter ([`PathShape`])
//! 4. **Time**: [`AnimationTimer`] maps scheduled ticks or scrub positions
//!    to an effective progress value, frozen during waypoint waits
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: geometry is pure and stable for a given
//!   input; `randomised` jitter is seeded from the waypoints themselves.
//! - **Venue-independent**: [`build_route_path`] produces identical output
//!   whether it runs inline or behind the [`RouteCompute`] worker boundary.
//! - **No IO**: rendering, interaction, and persistence are external
//!   collaborators that consume [`RoutePath`] and [`TimingState`] values.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod route;
mod timing;

/// Shared transform helpers between authoring space and display surfaces.
pub mod transform;

pub use foundation::core::{Affine, Point, Rect, SurfaceSize, Vec2};
pub use foundation::ease::Ease;
pub use foundation::error::{WaylineError, WaylineResult};
pub use route::model::{PathConfig, PathPoint, PathShape, RoutePath, Waypoint, parse_shape};
pub use route::offload::{DEFAULT_OFFLOAD_TIMEOUT, InlineCompute, RouteCompute, WorkerCompute};
pub use route::pipeline::{RouteBuilder, build_route_path};
pub use timing::clock::{Clock, FrameScheduler, ManualClock, SystemClock};
pub use timing::engine::{
    AnimationTimer, MAX_TICK_DELTA_MS, PauseMark, PlaybackPhase, TimingEvent, TimingState,
};
pub use transform::stage::StageTransform;
