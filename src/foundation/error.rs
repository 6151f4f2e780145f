/// Result alias used across the crate.
pub type StagecueResult<T> = Result<T, StagecueError>;

/// Errors surfaced at the engine's parse and IO boundaries.
///
/// Scheduling, compilation and playback never fail; they degrade to "nothing plays".
#[derive(thiserror::Error, Debug)]
pub enum StagecueError {
    /// Malformed input data (queue JSON, options files, unreadable paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or conflicting preset definitions.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Lookups against subjects the stage does not know.
    #[error("playback error: {0}")]
    Playback(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StagecueError {
    /// Build a [`StagecueError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StagecueError::Catalog`] value.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Build a [`StagecueError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`StagecueError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
