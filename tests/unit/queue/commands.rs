use super::*;
use serde_json::json;

fn catalog() -> Catalog {
    Catalog::builtin()
}

fn queue_with(phase: Phase, ids: &[&str]) -> AnimationQueue {
    let c = catalog();
    ids.iter().fold(AnimationQueue::default(), |q, id| {
        add_from_preset(&q, &c, phase, &PresetRequest::new(*id))
    })
}

#[test]
fn add_creates_phase_lazily() {
    let q = queue_with(Phase::Entrance, &["fade-in"]);
    assert_eq!(q.phase(Phase::Entrance).len(), 1);
    assert!(q.emphasis.is_none());
    let inst = &q.phase(Phase::Entrance)[0];
    assert_eq!(inst.parameters["duration"], json!(500));
    assert_eq!(inst.parameters["delay"], json!(0));
    assert_eq!(inst.parameters["ease"], json!("power1.out"));
}

#[test]
fn unknown_preset_is_a_no_op() {
    let q = queue_with(Phase::Entrance, &["fade-in"]);
    let next = add_from_preset(&q, &catalog(), Phase::Entrance, &PresetRequest::new("nope"));
    assert_eq!(next, q);
    let next = replace_from_preset(&q, &catalog(), Phase::Entrance, 0, &PresetRequest::new("nope"));
    assert_eq!(next, q);
}

#[test]
fn commands_do_not_mutate_their_input() {
    let q = queue_with(Phase::Emphasis, &["pulse", "shake"]);
    let before = q.clone();
    let _ = apply(&q, QueueCommand::DeleteAt { phase: Phase::Emphasis, index: 0 });
    assert_eq!(q, before);
}

#[test]
fn delete_last_instance_clears_phase() {
    let q = queue_with(Phase::Exit, &["fade-out"]);
    let q = apply(&q, QueueCommand::DeleteAt { phase: Phase::Exit, index: 0 });
    assert!(q.exit.is_none());
    assert!(q.is_empty());
}

#[test]
fn out_of_range_edits_are_ignored() {
    let q = queue_with(Phase::Emphasis, &["pulse"]);
    assert_eq!(apply(&q, QueueCommand::DeleteAt { phase: Phase::Emphasis, index: 3 }), q);
    assert_eq!(
        apply(&q, QueueCommand::Reorder { phase: Phase::Emphasis, from: 0, to: 4 }),
        q
    );
}

#[test]
fn reorder_moves_an_instance() {
    let q = queue_with(Phase::Emphasis, &["pulse", "shake", "wobble"]);
    let q = apply(&q, QueueCommand::Reorder { phase: Phase::Emphasis, from: 2, to: 0 });
    let ids: Vec<_> = q.phase(Phase::Emphasis).iter().map(|i| i.preset_id.as_str()).collect();
    assert_eq!(ids, vec!["wobble", "pulse", "shake"]);
}

#[test]
fn clear_one_or_all_phases() {
    let c = catalog();
    let q = queue_with(Phase::Entrance, &["fade-in"]);
    let q = add_from_preset(&q, &c, Phase::Exit, &PresetRequest::new("fade-out"));
    let only_entrance = apply(&q, QueueCommand::Clear { phase: Some(Phase::Exit) });
    assert!(only_entrance.exit.is_none());
    assert!(only_entrance.entrance.is_some());
    assert!(apply(&q, QueueCommand::Clear { phase: None }).is_empty());
}

#[test]
fn replace_keeps_user_timing() {
    let c = catalog();
    let q = queue_with(Phase::Entrance, &["fade-in"]);
    let q = retime(&q, Phase::Entrance, 0, Some(1200.0), Some(300.0));
    let q = replace_from_preset(&q, &c, Phase::Entrance, 0, &PresetRequest::new("zoom-in"));
    let inst = &q.phase(Phase::Entrance)[0];
    assert_eq!(inst.preset_id, "zoom-in");
    assert_eq!(inst.duration_ms(), 1200.0);
    assert_eq!(inst.delay_ms(), 300.0);
}

#[test]
fn exit_from_entrance_preset_is_reversed() {
    let c = catalog();
    let mut req = PresetRequest::new("slide-in");
    req.direction = Some(Direction::Left);
    req.delay_ms = Some(-50.0);
    let inst = instance_from_preset(&c, Phase::Exit, &req).unwrap();
    assert_eq!(inst.parameters["x"], json!(["0%", "100%"]));
    assert_eq!(inst.parameters["delay"], json!(0));
    assert_eq!(inst.direction, Some(Direction::Left));
}

#[test]
fn transform_origin_only_for_supporting_presets() {
    let c = catalog();
    let mut req = PresetRequest::new("zoom-in");
    req.transform_origin = Some("top left".to_owned());
    let zoom = instance_from_preset(&c, Phase::Entrance, &req).unwrap();
    assert_eq!(zoom.transform_origin.as_deref(), Some("top left"));

    req.preset_id = "fade-in".to_owned();
    let fade = instance_from_preset(&c, Phase::Entrance, &req).unwrap();
    assert_eq!(fade.transform_origin, None);
}

#[test]
fn text_presets_carry_text_category() {
    let inst = instance_from_preset(&catalog(), Phase::Entrance, &PresetRequest::new("text-rise"))
        .unwrap();
    assert!(inst.is_text());
    assert_eq!(inst.delay_ms(), 30.0);
}
