use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WaylineError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(WaylineError::timing("x").to_string().contains("timing error:"));
    assert!(
        WaylineError::offload("x")
            .to_string()
            .contains("offload error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WaylineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
