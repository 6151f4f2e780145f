use super::*;

#[test]
fn ms_and_secs_convert_both_ways() {
    assert_eq!(ms_to_secs(1500.0), 1.5);
    assert_eq!(secs_to_ms(0.25), 250.0);
}

#[test]
fn phases_order_entrance_emphasis_exit() {
    let mut phases = vec![Phase::Exit, Phase::Entrance, Phase::Emphasis];
    phases.sort();
    assert_eq!(phases, Phase::ALL.to_vec());
}

#[test]
fn phase_and_direction_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&Phase::Emphasis).unwrap(), "\"emphasis\"");
    let d: Direction = serde_json::from_str("\"left\"").unwrap();
    assert_eq!(d, Direction::Left);
}

#[test]
fn subject_id_is_transparent_on_the_wire() {
    let id = SubjectId::from("el-7");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"el-7\"");
    assert_eq!(id.to_string(), "el-7");
}
