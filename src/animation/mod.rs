//! Declarative animation parameters: easing, normalization and reversal.

/// Named easing curves and their runtime names.
pub mod ease;
/// Parameter bag to runtime descriptor.
pub mod normalize;
/// Entrance to exit parameter inversion.
pub mod reverse;
/// Property bag helpers.
pub mod value;
