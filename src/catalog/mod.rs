//! Preset catalog: immutable animation templates and their lookup table.

/// Presets shipped with the engine.
pub mod builtin;
/// Preset data model, direction variants and the amplitude knob.
pub mod preset;
/// Lookup table over presets.
pub mod store;
