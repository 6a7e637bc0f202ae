//! Mapping between normalized authoring space and a display surface.

use crate::foundation::core::{Affine, Point, SurfaceSize};
use crate::foundation::error::{WaylineError, WaylineResult};

/// Contain-fit of the normalized `[0, 1]²` authoring space onto a display
/// surface.
///
/// The authoring space carries the aspect ratio of the background content;
/// the fit scales it uniformly to the largest size that fits the surface and
/// centers the remainder. The geometry pipeline is space-agnostic: callers
/// pick one space, feed waypoints in it, and use this transform at the
/// boundary.
#[derive(Clone, Copy, Debug)]
pub struct StageTransform {
    forward: Affine,
    inverse: Affine,
    scale: f64,
}

impl StageTransform {
    /// Fit content of `content_width x content_height` onto `surface`.
    pub fn fit(surface: SurfaceSize, content_width: f64, content_height: f64) -> WaylineResult<Self> {
        if !content_width.is_finite()
            || !content_height.is_finite()
            || content_width <= 0.0
            || content_height <= 0.0
        {
            return Err(WaylineError::validation(
                "content dimensions must be finite and > 0",
            ));
        }
        let sw = f64::from(surface.width);
        let sh = f64::from(surface.height);
        let scale = (sw / content_width).min(sh / content_height);
        let fitted_w = content_width * scale;
        let fitted_h = content_height * scale;
        let offset = kurbo::Vec2::new((sw - fitted_w) / 2.0, (sh - fitted_h) / 2.0);

        // Normalized (x, y) -> centered content rect in surface pixels.
        let forward = Affine::translate(offset) * Affine::scale_non_uniform(fitted_w, fitted_h);
        Ok(Self {
            forward,
            inverse: forward.inverse(),
            scale,
        })
    }

    /// Map a normalized authoring-space point to surface pixels.
    pub fn to_display(&self, p: Point) -> Point {
        self.forward * p
    }

    /// Map a surface-pixel point back to normalized authoring space.
    pub fn to_authoring(&self, p: Point) -> Point {
        self.inverse * p
    }

    /// Uniform fit factor: surface pixels per content pixel. Useful for
    /// expressing px-equivalent tunables (spacing, jitter) in one space.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/stage.rs"]
mod tests;
