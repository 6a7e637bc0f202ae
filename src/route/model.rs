use crate::foundation::core::{Point, Vec2};
use crate::foundation::ease::Ease;
use crate::foundation::error::{WaylineError, WaylineResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Cosmetic shape of the path segment starting at a waypoint.
pub enum PathShape {
    /// Pass the geometry through unchanged.
    #[default]
    Line,
    /// Annotate for a rendering-time sinusoid; geometry is not bent.
    Squiggle,
    /// Apply stable, reproducible per-point jitter to the display position.
    Randomised,
}

/// Parse a shape tag from its authoring-layer string form.
///
/// Unknown strings are rejected with a named validation error rather than
/// silently falling back to [`PathShape::Line`].
pub fn parse_shape(s: &str) -> WaylineResult<PathShape> {
    match s.trim().to_ascii_lowercase().as_str() {
        "line" => Ok(PathShape::Line),
        "squiggle" => Ok(PathShape::Squiggle),
        "randomised" | "randomized" => Ok(PathShape::Randomised),
        other => Err(WaylineError::validation(format!(
            "unknown path shape '{other}'"
        ))),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One authored point of a route.
///
/// Waypoints are owned and mutated by the authoring layer; the geometry core
/// only reads them per recompute. Order is semantically meaningful: segment
/// `i` runs from waypoint `i` to waypoint `i + 1`.
pub struct Waypoint {
    /// Position in authoring space (normalized `[0, 1]` or free-form plane).
    pub position: Point,
    /// Route-defining point when `true`; shaping-only helper otherwise.
    pub is_major: bool,
    /// Playback holds here for this many milliseconds (major waypoints only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_ms: Option<f64>,
    /// Overrides the global tension for the segment starting here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    /// Shape of the segment starting here; effective only on major waypoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<PathShape>,
}

impl Waypoint {
    /// A route-defining waypoint at `(x, y)`.
    pub fn major(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            is_major: true,
            pause_ms: None,
            tension: None,
            shape: None,
        }
    }

    /// A shaping-only waypoint at `(x, y)`.
    pub fn minor(x: f64, y: f64) -> Self {
        Self {
            is_major: false,
            ..Self::major(x, y)
        }
    }

    /// Set the pause duration in milliseconds.
    pub fn with_pause(mut self, ms: f64) -> Self {
        self.pause_ms = Some(ms);
        self
    }

    /// Set the per-segment tension override.
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = Some(tension);
        self
    }

    /// Set the shape tag for the segment starting here.
    pub fn with_shape(mut self, shape: PathShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Validate an authored waypoint list before geometry runs.
pub(crate) fn validate_waypoints(waypoints: &[Waypoint]) -> WaylineResult<()> {
    if waypoints.len() < 2 {
        return Err(WaylineError::validation(
            "at least 2 waypoints are required to produce a path",
        ));
    }
    for (i, wp) in waypoints.iter().enumerate() {
        if !wp.position.x.is_finite() || !wp.position.y.is_finite() {
            return Err(WaylineError::validation(format!(
                "waypoint {i} has non-finite coordinates"
            )));
        }
        if let Some(p) = wp.pause_ms
            && (!p.is_finite() || p < 0.0)
        {
            return Err(WaylineError::validation(format!(
                "waypoint {i} pause_ms must be finite and >= 0"
            )));
        }
        if let Some(t) = wp.tension
            && (!t.is_finite() || t < 0.0)
        {
            return Err(WaylineError::validation(format!(
                "waypoint {i} tension must be finite and >= 0"
            )));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Immutable configuration bundle injected into the geometry pipeline.
pub struct PathConfig {
    /// Global curve tightness; scaled into segment tangents.
    pub tension: f64,
    /// Dense samples evaluated per waypoint segment.
    pub points_per_segment: usize,
    /// Target arc-length spacing between resampled points.
    pub target_spacing: f64,
    /// Curvature (`0..=1`) at or above which corners run at minimum speed.
    pub max_curvature: f64,
    /// Velocity factor applied at maximal curvature; `1.0` disables slowing.
    pub min_corner_speed: f64,
    /// Jitter magnitude for `randomised` segments, in path units.
    pub jitter_amount: f64,
    /// Monotonic curve mapping curvature to the velocity factor.
    pub corner_ease: Ease,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            tension: 0.3,
            points_per_segment: 60,
            target_spacing: 2.0,
            max_curvature: 0.6,
            min_corner_speed: 0.2,
            jitter_amount: 3.0,
            corner_ease: Ease::InOutQuad,
        }
    }
}

impl PathConfig {
    /// Validate the configuration bundle.
    pub fn validate(&self) -> WaylineResult<()> {
        if !self.tension.is_finite() || self.tension < 0.0 {
            return Err(WaylineError::validation("tension must be finite and >= 0"));
        }
        if self.points_per_segment < 2 {
            return Err(WaylineError::validation("points_per_segment must be >= 2"));
        }
        if !self.target_spacing.is_finite() || self.target_spacing <= 0.0 {
            return Err(WaylineError::validation(
                "target_spacing must be finite and > 0",
            ));
        }
        if !self.max_curvature.is_finite() || self.max_curvature <= 0.0 || self.max_curvature > 1.0
        {
            return Err(WaylineError::validation(
                "max_curvature must be finite and in (0, 1]",
            ));
        }
        if !self.min_corner_speed.is_finite()
            || self.min_corner_speed <= 0.0
            || self.min_corner_speed > 1.0
        {
            return Err(WaylineError::validation(
                "min_corner_speed must be finite and in (0, 1]",
            ));
        }
        if !self.jitter_amount.is_finite() || self.jitter_amount < 0.0 {
            return Err(WaylineError::validation(
                "jitter_amount must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize)]
/// One sample of the final, renderable curve.
pub struct PathPoint {
    /// Position on the smooth curve; authoritative for all arc-length math.
    pub position: Point,
    /// Position after cosmetic deformation; equals `position` for undeformed
    /// shapes. Renderers draw this, timing never reads it.
    pub display_position: Point,
    /// Arc length traveled from the path start to this point.
    pub cumulative_distance: f64,
    /// `cumulative_distance / total_length`, in `[0, 1]`.
    pub normalized_distance: f64,
    /// Local turning measure: 0 = straight, 1 = full reversal.
    pub curvature: f64,
    /// Velocity factor derived from curvature, in `[min_corner_speed, 1]`.
    pub speed_multiplier: f64,
    /// Index of the waypoint segment this sample originated from.
    pub segment_index: usize,
    /// Shape tag inherited from the controlling major waypoint.
    pub shape: PathShape,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
/// The final output of the geometry pipeline.
///
/// Points are immutable outputs, recomputed wholesale whenever waypoints
/// change; `normalized_distance` is non-decreasing, 0 at the first point and
/// 1 at the last (degenerate zero-length paths aside).
pub struct RoutePath {
    /// Ordered samples of the final curve.
    pub points: Vec<PathPoint>,
    /// Total arc length of the path.
    pub total_length: f64,
}

impl RoutePath {
    /// `true` when the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of samples on the path.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Resolve position and unit tangent at arc length `length`.
    ///
    /// `length` is clamped to `[0, total_length]`. Returns `None` for an
    /// empty path; a single-point path yields a zero tangent.
    pub fn point_at_arc_length(&self, length: f64) -> Option<(Point, Vec2)> {
        if self.points.is_empty() {
            return None;
        }
        if self.points.len() == 1 {
            return Some((self.points[0].position, Vec2::ZERO));
        }

        // Non-finite lengths resolve to the path start rather than
        // propagating NaN through the interpolation.
        let length = if length.is_finite() {
            length.clamp(0.0, self.total_length)
        } else {
            0.0
        };
        // First index whose cumulative distance reaches `length`.
        let idx = self
            .points
            .partition_point(|p| p.cumulative_distance < length)
            .clamp(1, self.points.len() - 1);

        let before = &self.points[idx - 1];
        let after = &self.points[idx];
        let span = after.cumulative_distance - before.cumulative_distance;
        let t = if span > 0.0 {
            (length - before.cumulative_distance) / span
        } else {
            0.0
        };
        let position = crate::foundation::math::lerp_point(before.position, after.position, t);
        Some((position, self.tangent_between(idx - 1, idx)))
    }

    /// Resolve position and unit tangent at normalized progress `progress`.
    ///
    /// Progress advances at constant point-index rate over the final
    /// sequence, so corner-compressed regions play back visibly slower.
    pub fn point_at_progress(&self, progress: f64) -> Option<(Point, Vec2)> {
        if self.points.is_empty() {
            return None;
        }
        if self.points.len() == 1 {
            return Some((self.points[0].position, Vec2::ZERO));
        }

        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let scaled = progress * ((self.points.len() - 1) as f64);
        let idx = (scaled.floor() as usize).min(self.points.len() - 2);
        let t = scaled - idx as f64;
        let position = crate::foundation::math::lerp_point(
            self.points[idx].position,
            self.points[idx + 1].position,
            t,
        );
        Some((position, self.tangent_between(idx, idx + 1)))
    }

    /// Unit direction between two samples, searching outward past
    /// zero-length steps. Zero when the whole path is degenerate.
    fn tangent_between(&self, from: usize, to: usize) -> Vec2 {
        let dir = self.points[to].position - self.points[from].position;
        if dir.hypot() > 1e-12 {
            return dir / dir.hypot();
        }
        for w in self.points.windows(2) {
            let d = w[1].position - w[0].position;
            if d.hypot() > 1e-12 {
                return d / d.hypot();
            }
        }
        Vec2::ZERO
    }
}

#[cfg(test)]
#[path = "../../tests/unit/route/model.rs"]
mod tests;
