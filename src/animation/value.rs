use serde_json::Value;

use crate::foundation::core::Millis;

/// Declarative property map: property name to scalar, array or `{from, to}` object.
pub type PropertyBag = serde_json::Map<String, Value>;

/// Keys that configure an animation rather than name an animatable property.
pub const RESERVED_KEYS: &[&str] = &[
    "duration",
    "delay",
    "ease",
    "easing",
    "loop",
    "repeat",
    "yoyo",
    "amplitude",
    "stagger",
    "transformOrigin",
];

/// Duration used when a bag has none, or a malformed one.
pub const DEFAULT_DURATION_MS: Millis = 500.0;

/// `true` for keys in [`RESERVED_KEYS`].
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn finite_number(bag: &PropertyBag, key: &str) -> Option<f64> {
    bag.get(key)?.as_f64().filter(|v| v.is_finite())
}

/// Duration in milliseconds; malformed or non-positive values resolve to the default.
pub fn duration_ms(bag: &PropertyBag) -> Millis {
    finite_number(bag, "duration")
        .filter(|d| *d > 0.0)
        .unwrap_or(DEFAULT_DURATION_MS)
}

/// Delay in milliseconds, clamped to `>= 0`; malformed values resolve to 0.
pub fn delay_ms(bag: &PropertyBag) -> Millis {
    finite_number(bag, "delay").unwrap_or(0.0).max(0.0)
}

/// `true` when the bag asks for an endless loop.
pub fn loops_forever(bag: &PropertyBag) -> bool {
    matches!(bag.get("loop"), Some(Value::Bool(true)))
}

/// Split `"12.5px"` into `(12.5, "px")`. Plain numbers have an empty unit.
pub fn split_unit(v: &Value) -> Option<(f64, String)> {
    match v {
        Value::Number(n) => n.as_f64().map(|f| (f, String::new())),
        Value::String(s) => {
            let s = s.trim();
            let numeric = |(i, c): (usize, char)| {
                c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)
            };
            let end = s
                .char_indices()
                .find(|&ic| !numeric(ic))
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            let num: f64 = s[..end].parse().ok()?;
            Some((num, s[end..].to_owned()))
        }
        _ => None,
    }
}

/// Build a JSON number, keeping integral values integral.
pub fn number(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Value::from(v as i64)
    } else {
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn with_unit(v: f64, unit: &str) -> Value {
    if unit.is_empty() {
        number(v)
    } else {
        let n = number(v);
        Value::String(format!("{n}{unit}"))
    }
}

/// Interpolate two values sharing a unit. Values that cannot be interpolated hold `a` until the
/// end of the span.
pub fn lerp_value(a: &Value, b: &Value, t: f64) -> Value {
    match (split_unit(a), split_unit(b)) {
        (Some((x, ua)), Some((y, ub))) if ua == ub || ua.is_empty() || ub.is_empty() => {
            let unit = if ub.is_empty() { ua } else { ub };
            with_unit(x + (y - x) * t, &unit)
        }
        _ => {
            if t >= 1.0 {
                b.clone()
            } else {
                a.clone()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
