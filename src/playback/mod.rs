//! Per-subject playback: state machine, frame clock and the multi-subject stage.

/// Host-driven playhead.
pub mod clock;
/// Playback state machine over a compiled timeline.
pub mod controller;
/// Controllers for every subject of a document.
pub mod stage;
