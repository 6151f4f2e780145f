use std::fmt;

/// Timeline time in milliseconds.
pub type Millis = f64;

/// Runtime time in seconds.
pub type Secs = f64;

/// Timeline milliseconds to runtime seconds.
pub fn ms_to_secs(ms: Millis) -> Secs {
    ms / 1000.0
}

/// Runtime seconds to timeline milliseconds.
pub fn secs_to_ms(secs: Secs) -> Millis {
    secs * 1000.0
}

/// One of the three ordered stages of a subject's animation queue.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Brings the subject in; starts at 0.
    Entrance,
    /// Plays after the entrance; may loop forever.
    Emphasis,
    /// Takes the subject out after emphasis.
    Exit,
}

impl Phase {
    /// Every phase, in playback order.
    pub const ALL: [Phase; 3] = [Phase::Entrance, Phase::Emphasis, Phase::Exit];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entrance => "entrance",
            Self::Emphasis => "emphasis",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction variant of a directional preset.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Upward variant.
    Up,
    /// Downward variant.
    Down,
    /// Leftward variant.
    Left,
    /// Rightward variant.
    Right,
}

/// Stable identifier of an animatable subject (element or container) in the host document.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(pub String);

impl SubjectId {
    /// Wrap a host id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw host id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
