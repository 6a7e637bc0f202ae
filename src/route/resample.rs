use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::foundation::math::{Fnv1a64, lerp_point};
use crate::route::model::PathConfig;
use crate::route::spline::RawPoint;

/// Polylines at or above this length estimate curvature on the rayon pool.
const PAR_CURVATURE_THRESHOLD: usize = 4096;

/// Below this, a step between raw points is treated as zero-length.
const DIST_EPS: f64 = 1e-9;

/// Per-point curvature memoized across recomputes of an unchanged path.
///
/// Keyed by a cheap structural hash (point count plus first/middle/last
/// coordinates), so an unchanged path costs one hash, not a re-estimate.
#[derive(Debug, Default)]
pub(crate) struct CurvatureCache {
    entries: HashMap<u64, Arc<[f64]>>,
}

impl CurvatureCache {
    pub(crate) fn curvatures(&mut self, raw: &[RawPoint]) -> Arc<[f64]> {
        let key = structural_hash(raw);
        if self.entries.len() > 32 {
            self.entries.clear();
        }
        self.entries
            .entry(key)
            .or_insert_with(|| turning_curvatures(raw).into())
            .clone()
    }
}

fn structural_hash(raw: &[RawPoint]) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(raw.len() as u64);
    for idx in [0, raw.len() / 2, raw.len().saturating_sub(1)] {
        if let Some(p) = raw.get(idx) {
            h.write_f64(p.pos.x);
            h.write_f64(p.pos.y);
        }
    }
    h.finish()
}

/// Estimate per-point curvature as the local turning angle, normalized so
/// 0 is straight and 1 is a full reversal. Endpoints and zero-length
/// neighbor steps read as straight.
pub(crate) fn turning_curvatures(raw: &[RawPoint]) -> Vec<f64> {
    let turning_at = |i: usize| -> f64 {
        if i == 0 || i + 1 >= raw.len() {
            return 0.0;
        }
        let v_in = raw[i].pos - raw[i - 1].pos;
        let v_out = raw[i + 1].pos - raw[i].pos;
        if v_in.hypot() < DIST_EPS || v_out.hypot() < DIST_EPS {
            return 0.0;
        }
        v_in.cross(v_out).atan2(v_in.dot(v_out)).abs() / std::f64::consts::PI
    };

    if raw.len() >= PAR_CURVATURE_THRESHOLD {
        (0..raw.len()).into_par_iter().map(turning_at).collect()
    } else {
        (0..raw.len()).map(turning_at).collect()
    }
}

/// Map curvature to a velocity factor in `[min_corner_speed, 1]`.
pub(crate) fn velocity_factor(curvature: f64, config: &PathConfig) -> f64 {
    if config.min_corner_speed >= 1.0 {
        return 1.0;
    }
    let t = (curvature / config.max_curvature).clamp(0.0, 1.0);
    1.0 - (1.0 - config.min_corner_speed) * config.corner_ease.apply(t)
}

/// Resample a dense polyline to (approximately) `config.target_spacing`.
///
/// With corner slowing enabled the spacing is uniform in curvature-weighted
/// distance instead of physical distance, which compresses point spacing
/// through tight corners. Paths with fewer than 2 points pass through
/// unchanged; zero-length paths collapse to their first point.
pub(crate) fn resample(
    raw: &[RawPoint],
    curvatures: Option<&[f64]>,
    config: &PathConfig,
) -> Vec<RawPoint> {
    if raw.len() < 2 {
        return raw.to_vec();
    }
    match curvatures {
        Some(curv) if config.min_corner_speed < 1.0 => resample_weighted(raw, curv, config),
        _ => resample_uniform(raw, config.target_spacing),
    }
}

/// Strategy (a): walk the polyline accumulating Euclidean distance and emit
/// an interpolated point at each exact spacing crossing.
fn resample_uniform(raw: &[RawPoint], spacing: f64) -> Vec<RawPoint> {
    let mut out = vec![raw[0]];
    let mut acc = 0.0;

    for i in 1..raw.len() {
        let mut prev = raw[i - 1].pos;
        let step = raw[i].pos - prev;
        let mut remaining = step.hypot();
        if remaining < DIST_EPS {
            continue;
        }
        let dir = step / remaining;

        while acc + remaining >= spacing {
            let advance = spacing - acc;
            prev += dir * advance;
            remaining -= advance;
            acc = 0.0;
            out.push(RawPoint {
                pos: prev,
                segment: raw[i - 1].segment,
            });
        }
        acc += remaining;
    }

    force_final(&mut out, raw);
    out
}

/// Strategy (b): resample uniformly in curvature-weighted distance, where
/// each physical step is divided by its local velocity factor. Slow corners
/// contribute more weighted distance and therefore receive more points.
fn resample_weighted(raw: &[RawPoint], curvatures: &[f64], config: &PathConfig) -> Vec<RawPoint> {
    let mut weighted = Vec::with_capacity(raw.len());
    weighted.push(0.0);
    let mut total = 0.0;
    for i in 1..raw.len() {
        let len = (raw[i].pos - raw[i - 1].pos).hypot();
        // Factor stays in [min_corner_speed, 1], so the division is safe for
        // any validated config.
        let factor = 0.5
            * (velocity_factor(curvatures[i - 1], config)
                + velocity_factor(curvatures[i], config));
        total += len / factor;
        weighted.push(total);
    }

    if total < DIST_EPS {
        return vec![raw[0]];
    }

    let count = (total / config.target_spacing).ceil() as usize;
    let mut out = Vec::with_capacity(count + 1);
    out.push(raw[0]);
    for k in 1..count {
        let target = k as f64 * config.target_spacing;
        if target >= total {
            break;
        }
        // Bracketing step in the monotonically increasing weighted array.
        let idx = weighted.partition_point(|&w| w < target).max(1);
        let span = weighted[idx] - weighted[idx - 1];
        let t = if span > 0.0 {
            (target - weighted[idx - 1]) / span
        } else {
            0.0
        };
        out.push(RawPoint {
            pos: lerp_point(raw[idx - 1].pos, raw[idx].pos, t),
            segment: raw[idx - 1].segment,
        });
    }

    force_final(&mut out, raw);
    out
}

/// The final raw point is always emitted, even when the last spacing
/// interval is short; a near-coincident tail sample is replaced instead of
/// duplicated.
fn force_final(out: &mut Vec<RawPoint>, raw: &[RawPoint]) {
    let last = raw[raw.len() - 1];
    if let Some(tail) = out.last()
        && (tail.pos - last.pos).hypot() < DIST_EPS
    {
        if out.len() == 1 {
            // Zero-length path: stay a single point.
            return;
        }
        out.pop();
    }
    out.push(last);
}

#[cfg(test)]
#[path = "../../tests/unit/route/resample.rs"]
mod tests;
