/// Convenience result type used across Wayline.
pub type WaylineResult<T> = Result<T, WaylineError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum WaylineError {
    /// Invalid user-provided waypoint, configuration, or mode data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while transitioning or advancing playback state.
    #[error("timing error: {0}")]
    Timing(String),

    /// Background route computation failed, timed out, or was abandoned.
    #[error("offload error: {0}")]
    Offload(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WaylineError {
    /// Build a [`WaylineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WaylineError::Timing`] value.
    pub fn timing(msg: impl Into<String>) -> Self {
        Self::Timing(msg.into())
    }

    /// Build a [`WaylineError::Offload`] value.
    pub fn offload(msg: impl Into<String>) -> Self {
        Self::Offload(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
