use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    animation::ease::Ease,
    animation::value::{self, PropertyBag, lerp_value},
    foundation::core::{Secs, ms_to_secs},
};

/// How often a tween plays again after its first run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Repeat {
    /// Plays once.
    #[default]
    Once,
    /// Additional plays after the first.
    Times(u32),
    /// Loops forever.
    Infinite,
}

impl Repeat {
    /// `loop: true` repeats forever, `loop: N` plays N times in total. A bare runtime `repeat`
    /// count is honoured when `loop` is absent (`-1` means forever).
    pub fn from_params(bag: &PropertyBag) -> Self {
        match bag.get("loop") {
            Some(Value::Bool(true)) => return Self::Infinite,
            Some(Value::Bool(false)) => return Self::Once,
            Some(v) => {
                return match v.as_f64().filter(|n| n.is_finite()) {
                    Some(n) if n >= 2.0 => Self::Times(n as u32 - 1),
                    _ => Self::Once,
                };
            }
            None => {}
        }
        match bag.get("repeat").and_then(Value::as_f64) {
            Some(n) if n < 0.0 => Self::Infinite,
            Some(n) if n >= 1.0 && n.is_finite() => Self::Times(n as u32),
            _ => Self::Once,
        }
    }

    /// Runtime repeat count: `0` once, `n` extra plays, `-1` forever.
    pub fn runtime_count(self) -> i32 {
        match self {
            Self::Once => 0,
            Self::Times(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Self::Infinite => -1,
        }
    }

    /// `true` for [`Repeat::Infinite`].
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }
}

/// Canonical, runtime-ready form of a declarative parameter bag.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct NormalizedTween {
    /// Explicit start state; properties given only as an end state are absent.
    pub from: PropertyBag,
    /// End state of every animated property.
    pub to: PropertyBag,
    /// Intermediate frames after `from`; the last frame holds each property's end value.
    pub keyframes: Option<Vec<PropertyBag>>,
    /// Per-property durations from `{from, to, duration}` objects.
    pub property_durations: BTreeMap<String, Secs>,
    /// Length of one play.
    pub duration_s: Secs,
    /// Offset from the insertion point.
    pub delay_s: Secs,
    /// Curve shared by every property.
    pub ease: Ease,
    /// Extra plays.
    pub repeat: Repeat,
    /// Alternate direction on every repeat.
    pub yoyo: bool,
}

/// Turn a declarative parameter bag into a [`NormalizedTween`].
///
/// Reserved keys configure timing; every other key is a property given as a scalar end value,
/// a `[from, to]` pair, an N-stop keyframe array or a `{from, to, duration}` object.
pub fn normalize_params(bag: &PropertyBag) -> NormalizedTween {
    let mut out = NormalizedTween {
        duration_s: ms_to_secs(value::duration_ms(bag)),
        delay_s: ms_to_secs(value::delay_ms(bag)),
        ease: Ease::from_value(bag.get("ease").or_else(|| bag.get("easing"))),
        repeat: Repeat::from_params(bag),
        yoyo: matches!(bag.get("yoyo"), Some(Value::Bool(true))),
        ..NormalizedTween::default()
    };

    let mut frames: Vec<PropertyBag> = Vec::new();
    for (key, v) in bag {
        if value::is_reserved(key) {
            continue;
        }
        match v {
            Value::Array(items) if items.len() > 2 => {
                out.from.insert(key.clone(), items[0].clone());
                out.to.insert(key.clone(), items[items.len() - 1].clone());
                for (i, item) in items.iter().skip(1).enumerate() {
                    if frames.len() <= i {
                        frames.resize_with(i + 1, PropertyBag::new);
                    }
                    frames[i].insert(key.clone(), item.clone());
                }
            }
            Value::Array(items) if items.len() == 2 => {
                out.from.insert(key.clone(), items[0].clone());
                out.to.insert(key.clone(), items[1].clone());
            }
            Value::Array(items) => {
                // Single-element (or empty) arrays only name an end state.
                if let Some(last) = items.last() {
                    out.to.insert(key.clone(), last.clone());
                }
            }
            Value::Object(obj) if obj.contains_key("from") || obj.contains_key("to") => {
                if let Some(f) = obj.get("from") {
                    out.from.insert(key.clone(), f.clone());
                }
                if let Some(t) = obj.get("to") {
                    out.to.insert(key.clone(), t.clone());
                }
                if let Some(d) = obj
                    .get("duration")
                    .and_then(Value::as_f64)
                    .filter(|d| d.is_finite() && *d > 0.0)
                {
                    out.property_durations.insert(key.clone(), ms_to_secs(d));
                }
            }
            other => {
                out.to.insert(key.clone(), other.clone());
            }
        }
    }

    if !frames.is_empty() {
        out.keyframes = Some(frames);
    }
    out
}

impl NormalizedTween {
    /// Eased property values at `progress` in `[0, 1]` of one play.
    ///
    /// Properties without an explicit start hold their end value; keyframed properties are
    /// spaced evenly over their own stops.
    pub fn sample(&self, progress: f64) -> PropertyBag {
        let t = self.ease.apply(progress);
        let mut out = PropertyBag::new();
        for (key, end) in &self.to {
            let mut stops: Vec<&Value> = Vec::new();
            if let Some(start) = self.from.get(key) {
                stops.push(start);
            }
            if let Some(frames) = &self.keyframes {
                stops.extend(frames.iter().filter_map(|f| f.get(key)));
            }
            if stops.last().copied() != Some(end) {
                stops.push(end);
            }

            let v = match stops.len() {
                0 => continue,
                1 => stops[0].clone(),
                n => {
                    let spans = (n - 1) as f64;
                    let pos = t * spans;
                    let idx = (pos.floor() as usize).min(n - 2);
                    lerp_value(stops[idx], stops[idx + 1], pos - idx as f64)
                }
            };
            out.insert(key.clone(), v);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/normalize.rs"]
mod tests;
