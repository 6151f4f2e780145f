use super::*;
use serde_json::json;

fn bag(v: Value) -> PropertyBag {
    v.as_object().cloned().unwrap()
}

#[test]
fn duration_defaults_when_missing_or_malformed() {
    assert_eq!(duration_ms(&bag(json!({}))), 500.0);
    assert_eq!(duration_ms(&bag(json!({ "duration": "fast" }))), 500.0);
    assert_eq!(duration_ms(&bag(json!({ "duration": 0 }))), 500.0);
    assert_eq!(duration_ms(&bag(json!({ "duration": 800 }))), 800.0);
}

#[test]
fn negative_delay_is_clamped() {
    assert_eq!(delay_ms(&bag(json!({ "delay": -200 }))), 0.0);
    assert_eq!(delay_ms(&bag(json!({ "delay": 150 }))), 150.0);
    assert_eq!(delay_ms(&bag(json!({ "delay": null }))), 0.0);
}

#[test]
fn only_literal_true_loops_forever() {
    assert!(loops_forever(&bag(json!({ "loop": true }))));
    assert!(!loops_forever(&bag(json!({ "loop": 3 }))));
    assert!(!loops_forever(&bag(json!({}))));
}

#[test]
fn split_unit_handles_numbers_and_suffixes() {
    assert_eq!(split_unit(&json!(4)), Some((4.0, String::new())));
    assert_eq!(split_unit(&json!("-12.5px")), Some((-12.5, "px".to_owned())));
    assert_eq!(split_unit(&json!("90deg")), Some((90.0, "deg".to_owned())));
    assert_eq!(split_unit(&json!("blur(4px)")), None);
}

#[test]
fn lerp_keeps_units_and_holds_non_numeric() {
    assert_eq!(lerp_value(&json!(0), &json!(100), 0.25), json!(25));
    assert_eq!(lerp_value(&json!("0px"), &json!("10px"), 0.5), json!("5px"));
    assert_eq!(
        lerp_value(&json!("blur(0px)"), &json!("blur(8px)"), 0.5),
        json!("blur(0px)")
    );
    assert_eq!(
        lerp_value(&json!("blur(0px)"), &json!("blur(8px)"), 1.0),
        json!("blur(8px)")
    );
}
