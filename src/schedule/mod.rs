//! Absolute timeline placement of queued animations.

/// Multi-subject live drag preview and commit.
pub mod drag;
/// Phase-ordered segment placement.
pub mod scheduler;
