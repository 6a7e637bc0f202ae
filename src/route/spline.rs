use crate::foundation::core::{Point, Vec2};
use crate::route::model::{PathConfig, Waypoint};

/// One dense sample of the raw (pre-resampling) curve, tagged with the
/// waypoint segment it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RawPoint {
    pub pos: Point,
    pub segment: usize,
}

/// Interpolate an ordered waypoint list into a dense polyline.
///
/// Cardinal (tension-scaled tangent) four-point blend: each segment borrows
/// its flanking waypoints as extra control points, reusing the boundary
/// waypoint at the array ends. The curve passes exactly through every
/// waypoint at its segment boundary. Callers validate `waypoints.len() >= 2`.
pub(crate) fn interpolate_route(waypoints: &[Waypoint], config: &PathConfig) -> Vec<RawPoint> {
    let n = waypoints.len();
    debug_assert!(n >= 2);
    let steps = config.points_per_segment;
    let mut out = Vec::with_capacity((n - 1) * steps + 1);

    for seg in 0..n - 1 {
        let p0 = waypoints[seg.saturating_sub(1)].position;
        let p1 = waypoints[seg].position;
        let p2 = waypoints[seg + 1].position;
        let p3 = waypoints[(seg + 2).min(n - 1)].position;
        let tension = waypoints[seg].tension.unwrap_or(config.tension);

        let m1 = (p2 - p0) * tension;
        let m2 = (p3 - p1) * tension;

        // Skip each segment's first sample except on the very first segment,
        // so boundary waypoints are emitted exactly once.
        let first = if seg == 0 { 0 } else { 1 };
        for step in first..=steps {
            let t = step as f64 / steps as f64;
            out.push(RawPoint {
                pos: hermite(p1, m1, p2, m2, t),
                segment: seg,
            });
        }
    }

    out
}

/// Cubic Hermite blend of endpoints `p1`, `p2` with tangents `m1`, `m2`.
fn hermite(p1: Point, m1: Vec2, p2: Point, m2: Vec2, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    let v = p1.to_vec2() * h00 + m1 * h10 + p2.to_vec2() * h01 + m2 * h11;
    Point::new(v.x, v.y)
}

#[cfg(test)]
#[path = "../../tests/unit/route/spline.rs"]
mod tests;
