use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StagecueError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StagecueError::catalog("x")
            .to_string()
            .contains("catalog error:")
    );
    assert!(
        StagecueError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        StagecueError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk gone");
    let err = StagecueError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk gone"));
}
