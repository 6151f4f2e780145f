//! Presets shipped with the engine.
//!
//! Only entrance and emphasis presets are authored here (plus a plain fade-out); exit variants of
//! every entrance preset are synthesized by reversal.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::{
    animation::value::PropertyBag,
    catalog::preset::{AmplitudeConfig, AnimationPreset},
    foundation::core::{Direction, Phase},
};

fn bag(v: Value) -> PropertyBag {
    match v {
        Value::Object(map) => map,
        _ => PropertyBag::new(),
    }
}

fn preset(id: &str, name: &str, phase: Phase, parameters: Value) -> AnimationPreset {
    AnimationPreset {
        id: id.to_owned(),
        name: name.to_owned(),
        phase,
        kind: "basic".to_owned(),
        parameters: bag(parameters),
        directional: false,
        direction_params: BTreeMap::new(),
        amplitude_config: None,
        supports_transform_origin: false,
    }
}

fn directions(
    up: Value,
    down: Value,
    left: Value,
    right: Value,
) -> BTreeMap<Direction, PropertyBag> {
    BTreeMap::from([
        (Direction::Up, bag(up)),
        (Direction::Down, bag(down)),
        (Direction::Left, bag(left)),
        (Direction::Right, bag(right)),
    ])
}

fn amplitude(default: f64, max: f64, unit: &str, targets: &[&str], rest: f64) -> AmplitudeConfig {
    AmplitudeConfig {
        min: 0.0,
        max,
        step: 1.0,
        unit: unit.to_owned(),
        default,
        targets: targets.iter().map(|t| (*t).to_owned()).collect(),
        rest,
    }
}

/// Presets shipped with the engine, in picker order.
pub fn builtin_presets() -> Vec<AnimationPreset> {
    let mut out = Vec::new();

    out.push(preset(
        "fade-in",
        "Fade in",
        Phase::Entrance,
        json!({ "opacity": [0, 1], "duration": 500, "ease": "easeOut" }),
    ));

    let mut slide = preset(
        "slide-in",
        "Slide in",
        Phase::Entrance,
        json!({ "opacity": [0, 1], "duration": 600, "ease": "cubicOut" }),
    );
    slide.directional = true;
    slide.direction_params = directions(
        json!({ "y": ["100%", "0%"] }),
        json!({ "y": ["-100%", "0%"] }),
        json!({ "x": ["100%", "0%"] }),
        json!({ "x": ["-100%", "0%"] }),
    );
    slide.amplitude_config = Some(amplitude(100.0, 300.0, "%", &["x", "y"], 0.0));
    out.push(slide);

    let mut zoom = preset(
        "zoom-in",
        "Zoom in",
        Phase::Entrance,
        json!({ "scale": [0.5, 1], "opacity": [0, 1], "duration": 500 }),
    );
    zoom.supports_transform_origin = true;
    out.push(zoom);

    let mut spin = preset(
        "spin-in",
        "Spin in",
        Phase::Entrance,
        json!({ "rotate": ["-180deg", "0deg"], "opacity": [0, 1], "duration": 700 }),
    );
    spin.supports_transform_origin = true;
    spin.amplitude_config = Some(amplitude(180.0, 720.0, "deg", &["rotate"], 0.0));
    out.push(spin);

    out.push(preset(
        "blur-in",
        "Blur in",
        Phase::Entrance,
        json!({ "filter": ["blur(12px)", "blur(0px)"], "opacity": [0, 1], "duration": 600 }),
    ));

    let mut wipe = preset(
        "wipe-in",
        "Wipe in",
        Phase::Entrance,
        json!({ "duration": 700, "ease": "easeInOut" }),
    );
    wipe.directional = true;
    wipe.direction_params = directions(
        json!({ "clipPath": ["inset(100% 0 0 0)", "inset(0% 0 0 0)"] }),
        json!({ "clipPath": ["inset(0 0 100% 0)", "inset(0 0 0% 0)"] }),
        json!({ "clipPath": ["inset(0 0 0 100%)", "inset(0 0 0 0%)"] }),
        json!({ "clipPath": ["inset(0 100% 0 0)", "inset(0 0% 0 0)"] }),
    );
    out.push(wipe);

    let mut rise = preset(
        "text-rise",
        "Rise by letter",
        Phase::Entrance,
        json!({ "y": ["0.6em", "0em"], "opacity": [0, 1], "duration": 400, "delay": 30 }),
    );
    rise.kind = "text".to_owned();
    out.push(rise);

    let mut pulse = preset(
        "pulse",
        "Pulse",
        Phase::Emphasis,
        json!({ "scale": [1, 1.08, 1], "duration": 800, "ease": "easeInOut" }),
    );
    pulse.supports_transform_origin = true;
    pulse.amplitude_config = Some(amplitude(8.0, 50.0, "%", &["scale"], 1.0));
    out.push(pulse);

    let mut shake = preset(
        "shake",
        "Shake",
        Phase::Emphasis,
        json!({ "x": [0, -10, 10, -10, 10, 0], "duration": 600, "ease": "linear" }),
    );
    shake.amplitude_config = Some(amplitude(10.0, 60.0, "px", &["x"], 0.0));
    out.push(shake);

    let mut wobble = preset(
        "wobble",
        "Wobble",
        Phase::Emphasis,
        json!({ "rotate": ["0deg", "-6deg", "6deg", "0deg"], "duration": 700 }),
    );
    wobble.supports_transform_origin = true;
    wobble.amplitude_config = Some(amplitude(6.0, 45.0, "deg", &["rotate"], 0.0));
    out.push(wobble);

    out.push(preset(
        "bounce",
        "Bounce",
        Phase::Emphasis,
        json!({ "y": [0, -24, 0, -12, 0], "duration": 900, "ease": "easeOut" }),
    ));

    out.push(preset(
        "flash",
        "Flash",
        Phase::Emphasis,
        json!({ "opacity": [1, 0.2, 1], "duration": 500 }),
    ));

    out.push(preset(
        "fade-out",
        "Fade out",
        Phase::Exit,
        json!({ "opacity": [1, 0], "duration": 500, "ease": "easeIn" }),
    ));

    out
}
