/// Convenience result type used across framecam.
pub type FramecamResult<T> = Result<T, FramecamError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FramecamError {
    /// A path entry has no drawable region on the canvas.
    #[error("frame '{0}' not found")]
    MissingFrame(String),

    /// A frame region exists but its geometry cannot be derived (fewer than three
    /// reference points, or zero extent).
    #[error("frame '{0}' has bad geometry")]
    DegenerateGeometry(String),

    /// Canvas, text, or other content could not be loaded from its source.
    #[error("cannot load '{0}'")]
    ResourceLoad(String),

    /// Invalid user-provided configuration or path data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramecamError {
    /// Build a [`FramecamError::MissingFrame`] value.
    pub fn missing_frame(id: impl Into<String>) -> Self {
        Self::MissingFrame(id.into())
    }

    /// Build a [`FramecamError::DegenerateGeometry`] value.
    pub fn degenerate_geometry(id: impl Into<String>) -> Self {
        Self::DegenerateGeometry(id.into())
    }

    /// Build a [`FramecamError::ResourceLoad`] value.
    pub fn resource_load(locator: impl Into<String>) -> Self {
        Self::ResourceLoad(locator.into())
    }

    /// Build a [`FramecamError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FramecamError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error prevents a presentation from starting.
    ///
    /// Geometry and structural errors are fatal to startup; content-load errors are
    /// recovered per item by the loaders and only surface here when a caller asks
    /// for a single resource directly.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingFrame(_) | Self::DegenerateGeometry(_) | Self::Validation(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
