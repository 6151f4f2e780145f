//! Shared primitives.

/// Time units, phases, directions and subject ids.
pub mod core;
/// Crate error type.
pub mod error;
/// Hashing helpers.
pub mod math;
