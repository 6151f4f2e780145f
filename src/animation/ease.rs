/// Easing curve, identified on the runtime side by its native name.
///
/// Names coming from presets and user edits go through [`Ease::parse`], which translates the
/// editor vocabulary (`easeOut`, `ease-in-out`, `cubicIn`, ...) into curves the runtime can
/// resolve. Anything unrecognised that already looks runtime-native (contains a `.`) is kept
/// verbatim as [`Ease::Native`]; everything else falls back to [`Ease::default`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ease {
    /// Constant speed (`none`).
    Linear,
    /// `power1.in`.
    InQuad,
    /// `power1.out`, the default.
    #[default]
    OutQuad,
    /// `power1.inOut`.
    InOutQuad,
    /// `power2.in`.
    InCubic,
    /// `power2.out`.
    OutCubic,
    /// `power2.inOut`.
    InOutCubic,
    /// Any other runtime-native name, passed through verbatim.
    Native(String),
}

/// Separator that marks a name as already runtime-native (`power3.inOut`, `back.out(1.7)`).
pub const NATIVE_SEPARATOR: char = '.';

const TRANSLATIONS: &[(&str, Ease)] = &[
    ("linear", Ease::Linear),
    ("none", Ease::Linear),
    ("easein", Ease::InQuad),
    ("quadin", Ease::InQuad),
    ("easeout", Ease::OutQuad),
    ("quadout", Ease::OutQuad),
    ("ease", Ease::InOutQuad),
    ("easeinout", Ease::InOutQuad),
    ("quadinout", Ease::InOutQuad),
    ("cubicin", Ease::InCubic),
    ("cubicout", Ease::OutCubic),
    ("cubicinout", Ease::InOutCubic),
];

impl Ease {
    /// Translate an editor or runtime ease name. Never fails.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        let key: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        if let Some((_, ease)) = TRANSLATIONS.iter().find(|(k, _)| *k == key) {
            return ease.clone();
        }

        if trimmed.contains(NATIVE_SEPARATOR) {
            return Self::from_native(trimmed);
        }
        Self::default()
    }

    /// Parse an optional JSON value; non-strings resolve to the default curve.
    pub fn from_value(v: Option<&serde_json::Value>) -> Self {
        v.and_then(|v| v.as_str())
            .map(Self::parse)
            .unwrap_or_default()
    }

    fn from_native(name: &str) -> Self {
        match name {
            "none" => Self::Linear,
            "power1.in" => Self::InQuad,
            "power1.out" => Self::OutQuad,
            "power1.inOut" => Self::InOutQuad,
            "power2.in" => Self::InCubic,
            "power2.out" => Self::OutCubic,
            "power2.inOut" => Self::InOutCubic,
            other => Self::Native(other.to_owned()),
        }
    }

    /// Name handed to the runtime.
    pub fn runtime_name(&self) -> &str {
        match self {
            Self::Linear => "none",
            Self::InQuad => "power1.in",
            Self::OutQuad => "power1.out",
            Self::InOutQuad => "power1.inOut",
            Self::InCubic => "power2.in",
            Self::OutCubic => "power2.out",
            Self::InOutCubic => "power2.inOut",
            Self::Native(name) => name,
        }
    }

    /// In-crate curve. Native curves are only known to the runtime and are approximated by the
    /// default ease-out.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad | Self::Native(_) => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

impl From<String> for Ease {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.runtime_name().to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
