use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TesseraError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(TesseraError::decode("x").to_string().contains("decode error:"));
    assert!(TesseraError::font("x").to_string().contains("font error:"));
    assert!(TesseraError::render("x").to_string().contains("render error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TesseraError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
