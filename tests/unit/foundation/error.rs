use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PostergenError::config_load("x")
            .to_string()
            .contains("config load error:")
    );
    assert!(
        PostergenError::composition("x")
            .to_string()
            .contains("composition error:")
    );
    assert!(
        PostergenError::overlay("x")
            .to_string()
            .contains("overlay error:")
    );
    assert!(
        PostergenError::persist("x")
            .to_string()
            .contains("persist error:")
    );
    assert!(
        PostergenError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PostergenError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn copy_generation_kinds_are_distinguishable() {
    let a = CopyGenerationError::Unavailable("timeout".to_string());
    let b = CopyGenerationError::MalformedReply("empty".to_string());
    assert_eq!(a.kind(), "unavailable");
    assert_eq!(b.kind(), "malformed_reply");
    assert_ne!(a, b);
    assert!(b.to_string().contains("malformed"));
}
