use super::*;

#[test]
fn stem_strips_directories_and_final_extension() {
    assert_eq!(input_stem(Path::new("photos/cat.png")).unwrap(), "cat");
    assert_eq!(input_stem(Path::new("/abs/dir/dog.JPG")).unwrap(), "dog");
    assert_eq!(input_stem(Path::new("noext")).unwrap(), "noext");
    assert_eq!(input_stem(Path::new("dir.v2/a.b.png")).unwrap(), "a.b");
    assert!(input_stem(Path::new("/")).is_err());
}

#[test]
fn variant_names_follow_stem_index_ext() {
    assert_eq!(variant_file_name("cat", 0, "jpg"), "cat-0.jpg");
    assert_eq!(
        variant_path(Path::new("out"), "cat", 12, "png"),
        Path::new("out").join("cat-12.png")
    );
}

#[test]
fn extension_is_normalized() {
    assert_eq!(normalize_extension(".JPG").unwrap(), "jpg");
    assert_eq!(normalize_extension("png").unwrap(), "png");
    assert!(normalize_extension("").is_err());
    assert!(normalize_extension("tar.gz").is_err());
    assert!(normalize_extension("../x").is_err());
}

#[test]
fn colliding_stems_get_suffixes() {
    let inputs: Vec<PathBuf> = ["a/cat.png", "b/cat.jpg", "cat_1.png", "c/cat.gif", "dog.png"]
        .into_iter()
        .map(PathBuf::from)
        .collect();
    let stems = unique_stems(&inputs)
        .into_iter()
        .collect::<MutateResult<Vec<_>>>()
        .unwrap();
    assert_eq!(stems, vec!["cat", "cat_1", "cat_1_1", "cat_2", "dog"]);
}

#[test]
fn nameless_inputs_fail_alone() {
    let inputs: Vec<PathBuf> = ["cat.png", "..", "/", "dog.png"]
        .into_iter()
        .map(PathBuf::from)
        .collect();
    let stems = unique_stems(&inputs);
    assert_eq!(stems.len(), 4);
    assert_eq!(stems[0].as_deref().unwrap(), "cat");
    assert!(matches!(stems[1], Err(MutateError::Validation(_))));
    assert!(stems[2].is_err());
    assert_eq!(stems[3].as_deref().unwrap(), "dog");
}
