use crate::foundation::error::WaylineResult;
use crate::route::model::{PathConfig, PathPoint, PathShape, RoutePath, Waypoint};
use crate::route::resample::{self, CurvatureCache};
use crate::route::shape;
use crate::route::spline::{self, RawPoint};

/// Reusable pipeline front-end that keeps the curvature cache warm across
/// recomputes of the same editing session.
#[derive(Debug, Default)]
pub struct RouteBuilder {
    cache: CurvatureCache,
}

impl RouteBuilder {
    /// Construct a builder with an empty curvature cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full geometry pipeline for one waypoint snapshot.
    #[tracing::instrument(skip(self, waypoints, config), fields(waypoints = waypoints.len()))]
    pub fn build(&mut self, waypoints: &[Waypoint], config: &PathConfig) -> WaylineResult<RoutePath> {
        config.validate()?;
        crate::route::model::validate_waypoints(waypoints)?;

        let raw = spline::interpolate_route(waypoints, config);
        let curvatures = if config.min_corner_speed < 1.0 {
            Some(self.cache.curvatures(&raw))
        } else {
            None
        };
        let resampled = resample::resample(&raw, curvatures.as_deref(), config);

        let mut path = finalize(resampled, config);
        shape::apply_shapes(&mut path.points, waypoints, config.jitter_amount);
        tracing::debug!(
            points = path.points.len(),
            total_length = path.total_length,
            "route path rebuilt"
        );
        Ok(path)
    }
}

/// Build a route path without cache reuse.
///
/// This is the pure function both execution venues share: for identical
/// inputs it produces identical output whether it runs on the calling
/// thread or behind the worker boundary.
pub fn build_route_path(waypoints: &[Waypoint], config: &PathConfig) -> WaylineResult<RoutePath> {
    RouteBuilder::new().build(waypoints, config)
}

/// Recompute cumulative/normalized distance and curvature bookkeeping over
/// the final point sequence.
fn finalize(resampled: Vec<RawPoint>, config: &PathConfig) -> RoutePath {
    let curvatures = resample::turning_curvatures(&resampled);

    let mut points = Vec::with_capacity(resampled.len());
    let mut cumulative = 0.0;
    for (i, rp) in resampled.iter().enumerate() {
        if i > 0 {
            cumulative += (rp.pos - resampled[i - 1].pos).hypot();
        }
        points.push(PathPoint {
            position: rp.pos,
            display_position: rp.pos,
            cumulative_distance: cumulative,
            normalized_distance: 0.0,
            curvature: curvatures[i],
            speed_multiplier: resample::velocity_factor(curvatures[i], config),
            segment_index: rp.segment,
            shape: PathShape::Line,
        });
    }

    let total_length = cumulative;
    if total_length > 0.0 {
        for p in &mut points {
            p.normalized_distance = p.cumulative_distance / total_length;
        }
    }

    RoutePath {
        points,
        total_length,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/route/pipeline.rs"]
mod tests;
