use crate::foundation::core::Vec2;
use crate::foundation::math::{Fnv1a64, Rng64};
use crate::route::model::{PathPoint, PathShape, Waypoint};

/// Assign every segment its controlling waypoint index in one pass: the
/// nearest preceding major waypoint, falling back to 0 when the route
/// starts on a minor point.
pub(crate) fn controller_indices(waypoints: &[Waypoint]) -> Vec<usize> {
    let segments = waypoints.len().saturating_sub(1);
    let mut out = Vec::with_capacity(segments);
    let mut controller = 0;
    for (i, wp) in waypoints.iter().take(segments).enumerate() {
        if wp.is_major {
            controller = i;
        }
        out.push(controller);
    }
    out
}

/// Jitter seed derived from the sum of all waypoint coordinates, so the same
/// waypoint configuration always jitters identically across recomputes.
pub(crate) fn jitter_seed(waypoints: &[Waypoint]) -> u64 {
    let sum: f64 = waypoints
        .iter()
        .map(|wp| wp.position.x + wp.position.y)
        .sum();
    let mut h = Fnv1a64::new_default();
    h.write_f64(sum);
    h.finish()
}

/// Annotate each point with its controlling waypoint's shape tag and apply
/// per-point jitter to `randomised` stretches.
///
/// Only `display_position` moves; `position`, distances, and curvature stay
/// untouched so timing math cannot drift.
pub(crate) fn apply_shapes(points: &mut [PathPoint], waypoints: &[Waypoint], jitter_amount: f64) {
    let controllers = controller_indices(waypoints);
    let seed = jitter_seed(waypoints);

    for (idx, point) in points.iter_mut().enumerate() {
        let controller = controllers
            .get(point.segment_index)
            .copied()
            .unwrap_or_default();
        let shape = waypoints[controller].shape.unwrap_or_default();
        point.shape = shape;

        if shape == PathShape::Randomised && jitter_amount > 0.0 {
            let mut rng = Rng64::new(seed ^ (idx as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93));
            let offset = Vec2::new(
                rng.next_f64_signed() * jitter_amount,
                rng.next_f64_signed() * jitter_amount,
            );
            point.display_position = point.position + offset;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/route/shape.rs"]
mod tests;
