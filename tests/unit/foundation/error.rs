use std::path::PathBuf;

use super::*;

#[test]
fn display_prefixes_are_stable() {
    let p = PathBuf::from("in/cat.png");
    assert!(
        MutateError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MutateError::load(&p, "bad header")
            .to_string()
            .contains("load error: in/cat.png: bad header")
    );
    assert!(
        MutateError::output(&p, "x")
            .to_string()
            .contains("output error:")
    );
    assert!(MutateError::write(&p, "x").to_string().contains("write error:"));
    assert!(
        MutateError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn operation_error_names_op_and_code() {
    let err = MutateError::Operation {
        op: "wave",
        code: 1,
        message: "wave length must be > 0".to_string(),
    };
    let s = err.to_string();
    assert!(s.contains("wave"));
    assert!(s.contains("error 1"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MutateError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
