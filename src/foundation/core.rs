use crate::foundation::error::{WaylineError, WaylineResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Display surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Construct a surface size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> WaylineResult<Self> {
        if width == 0 || height == 0 {
            return Err(WaylineError::validation(
                "surface width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }
}
