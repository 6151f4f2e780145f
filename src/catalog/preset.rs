use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    animation::value::{PropertyBag, number, split_unit},
    foundation::core::{Direction, Phase},
};

/// Immutable, catalog-defined animation template.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationPreset {
    /// Unique catalog key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Phase the preset was authored for. Entrance presets also back synthesized exits.
    pub phase: Phase,
    /// Free-form grouping copied onto instances (`"basic"`, `"text"`, ...).
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Default parameter bag.
    pub parameters: PropertyBag,
    /// Whether the preset offers direction variants.
    #[serde(default)]
    pub directional: bool,
    /// Per-direction overrides merged over `parameters`.
    #[serde(default)]
    pub direction_params: BTreeMap<Direction, PropertyBag>,
    /// Amplitude knob, when the preset has one.
    #[serde(default)]
    pub amplitude_config: Option<AmplitudeConfig>,
    /// Whether the picker offers a transform origin.
    #[serde(default)]
    pub supports_transform_origin: bool,
}

fn default_kind() -> String {
    "basic".to_owned()
}

/// UI range of the amplitude knob and the properties it drives.
///
/// Every numeric value of a target property is moved away from `rest` by
/// `amplitude / default`, so the preset's authored values correspond to `default`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmplitudeConfig {
    /// Lowest accepted amplitude.
    pub min: f64,
    /// Highest accepted amplitude.
    pub max: f64,
    /// UI step.
    pub step: f64,
    /// UI unit label.
    pub unit: String,
    /// Amplitude the authored values correspond to.
    pub default: f64,
    /// Properties scaled by the knob.
    pub targets: Vec<String>,
    /// Value the properties scale away from (`1` for scale, `0` for offsets).
    #[serde(default)]
    pub rest: f64,
}

impl AmplitudeConfig {
    /// Clamp to `[min, max]`; non-finite input resolves to `default`.
    pub fn clamp(&self, amplitude: f64) -> f64 {
        if !amplitude.is_finite() {
            return self.default;
        }
        amplitude.clamp(self.min, self.max)
    }

    /// Scale every target property of `params` for `amplitude`.
    pub fn apply(&self, params: &mut PropertyBag, amplitude: f64) {
        if self.default == 0.0 {
            return;
        }
        let factor = self.clamp(amplitude) / self.default;
        for key in &self.targets {
            if let Some(v) = params.get_mut(key) {
                *v = scale_value(v, factor, self.rest);
            }
        }
    }
}

fn scale_value(v: &Value, factor: f64, rest: f64) -> Value {
    match v {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| scale_value(item, factor, rest))
                .collect(),
        ),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, item)| {
                    let item = if k == "from" || k == "to" {
                        scale_value(item, factor, rest)
                    } else {
                        item.clone()
                    };
                    (k.clone(), item)
                })
                .collect(),
        ),
        scalar => match split_unit(scalar) {
            Some((n, unit)) => {
                let scaled = number(rest + (n - rest) * factor);
                if unit.is_empty() {
                    scaled
                } else {
                    Value::String(format!("{scaled}{unit}"))
                }
            }
            None => scalar.clone(),
        },
    }
}

impl AnimationPreset {
    /// Direction used when the caller does not pick one.
    pub fn default_direction(&self) -> Option<Direction> {
        if !self.directional {
            return None;
        }
        self.direction_params.keys().next().copied()
    }

    /// Parameters with the direction variant layered over the base bag and the amplitude applied.
    pub fn resolve(&self, direction: Option<Direction>, amplitude: Option<f64>) -> PropertyBag {
        let mut params = self.parameters.clone();
        if self.directional {
            let dir = direction.or_else(|| self.default_direction());
            if let Some(variant) = dir.and_then(|d| self.direction_params.get(&d)) {
                for (k, v) in variant {
                    params.insert(k.clone(), v.clone());
                }
            }
        }

        let amplitude =
            amplitude.or_else(|| params.get("amplitude").and_then(Value::as_f64));
        if let (Some(cfg), Some(a)) = (&self.amplitude_config, amplitude) {
            cfg.apply(&mut params, a);
            params.insert("amplitude".to_owned(), number(cfg.clamp(a)));
        }
        params
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/preset.rs"]
mod tests;
