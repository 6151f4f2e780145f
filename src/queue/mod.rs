//! Per-subject animation queues and the commands that edit them.

/// Pure edit commands and picker helpers.
pub mod commands;
/// Queue wire shape and instance accessors.
pub mod model;
