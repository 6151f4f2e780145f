//! Exit parameters derived from entrance parameters.
//!
//! The catalog only ships entrance presets; exits are synthesized on demand by inverting the
//! directional quantities of an entrance bag. Spatial and visual properties play backwards
//! (array order reversed, `{from, to}` swapped); rotations turn the other way (negated).

use serde_json::Value;

use crate::animation::value::PropertyBag;

const REVERSED_KEYS: &[&str] = &[
    "x",
    "y",
    "opacity",
    "scale",
    "scaleX",
    "scaleY",
    "filter",
    "maskImage",
    "mask-image",
    "WebkitMaskImage",
    "clipPath",
    "clip-path",
];

const NEGATED_KEYS: &[&str] = &["rotate", "rotation", "rotateX", "rotateY", "rotateZ"];

/// User-edited timing that survives inversion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExitOverrides {
    /// Duration to keep instead of the entrance's.
    pub duration: Option<Value>,
    /// Delay to keep instead of the entrance's.
    pub delay: Option<Value>,
    /// Ease to keep instead of the entrance's.
    pub ease: Option<Value>,
}

impl ExitOverrides {
    /// Carry over the timing keys present in an existing bag.
    pub fn from_params(bag: &PropertyBag) -> Self {
        Self {
            duration: bag.get("duration").cloned(),
            delay: bag.get("delay").cloned(),
            ease: bag.get("ease").cloned(),
        }
    }
}

/// Play `params` backwards: ordered properties are reversed and rotations negated. Other keys
/// are copied as they are.
pub fn reverse(params: &PropertyBag) -> PropertyBag {
    params
        .iter()
        .map(|(k, v)| {
            let v = if REVERSED_KEYS.contains(&k.as_str()) {
                reverse_order(v)
            } else if NEGATED_KEYS.contains(&k.as_str()) {
                negate(v)
            } else {
                v.clone()
            };
            (k.clone(), v)
        })
        .collect()
}

/// Reverse an entrance bag, then put the user's timing back on top.
pub fn derive_exit(entrance: &PropertyBag, overrides: &ExitOverrides) -> PropertyBag {
    let mut out = reverse(entrance);
    for (key, v) in [
        ("duration", &overrides.duration),
        ("delay", &overrides.delay),
        ("ease", &overrides.ease),
    ] {
        if let Some(v) = v {
            out.insert(key.to_owned(), v.clone());
        }
    }
    out
}

fn reverse_order(v: &Value) -> Value {
    match v {
        Value::Array(items) => Value::Array(items.iter().rev().cloned().collect()),
        Value::Object(obj) if obj.contains_key("from") && obj.contains_key("to") => {
            let mut swapped = obj.clone();
            swapped.insert("from".to_owned(), obj["to"].clone());
            swapped.insert("to".to_owned(), obj["from"].clone());
            Value::Object(swapped)
        }
        other => other.clone(),
    }
}

fn negate(v: &Value) -> Value {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64().and_then(i64::checked_neg) {
                Value::from(i)
            } else {
                n.as_f64()
                    .filter(|f| *f != 0.0)
                    .and_then(|f| serde_json::Number::from_f64(-f))
                    .map(Value::Number)
                    .unwrap_or_else(|| v.clone())
            }
        }
        Value::String(s) => Value::String(negate_angle(s)),
        Value::Array(items) => Value::Array(items.iter().map(negate).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| {
                    let v = if k == "from" || k == "to" {
                        negate(v)
                    } else {
                        v.clone()
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Flip the sign of `"<n>deg"` and `"<n>turn"` strings. Other strings are left alone.
fn negate_angle(s: &str) -> String {
    let trimmed = s.trim();
    let Some(magnitude) = trimmed
        .strip_suffix("deg")
        .or_else(|| trimmed.strip_suffix("turn"))
    else {
        return s.to_owned();
    };
    let Ok(n) = magnitude.trim().parse::<f64>() else {
        return s.to_owned();
    };
    if n == 0.0 {
        return s.to_owned();
    }
    match trimmed.strip_prefix('-') {
        Some(rest) => rest.to_owned(),
        None => format!("-{}", trimmed.strip_prefix('+').unwrap_or(trimmed)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/reverse.rs"]
mod tests;
