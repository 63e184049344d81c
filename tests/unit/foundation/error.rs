use super::*;

#[test]
fn display_messages_name_the_frame() {
    assert_eq!(
        FramecamError::missing_frame("intro").to_string(),
        "frame 'intro' not found"
    );
    assert_eq!(
        FramecamError::degenerate_geometry("intro").to_string(),
        "frame 'intro' has bad geometry"
    );
    assert_eq!(
        FramecamError::resource_load("canvas.svg").to_string(),
        "cannot load 'canvas.svg'"
    );
}

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FramecamError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FramecamError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn structural_errors_are_classified() {
    assert!(FramecamError::missing_frame("a").is_structural());
    assert!(FramecamError::degenerate_geometry("a").is_structural());
    assert!(!FramecamError::resource_load("a.md").is_structural());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FramecamError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
