//! Compilation of animation queues into runtime timelines.

/// Queue to runtime timeline compiler.
pub mod compiler;
/// Host and runtime traits.
pub mod runtime;
