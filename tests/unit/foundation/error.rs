use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BlendError::invalid_argument("x")
            .to_string()
            .contains("invalid argument:")
    );
    assert!(
        BlendError::out_of_bounds("x")
            .to_string()
            .contains("out of bounds:")
    );
    assert!(BlendError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BlendError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
