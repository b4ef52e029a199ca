use gta_util::fs::{copy_dir_all, remove_dir_if_exists, to_slash};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_copy_dir_all_copies_nested_files() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir_all(src.join("inner")).unwrap();
    std::fs::write(src.join("a.txt"), "a").unwrap();
    std::fs::write(src.join("inner").join("b.txt"), "b").unwrap();

    let dst = tmp.path().join("out").join("copy");
    copy_dir_all(&src, &dst).unwrap();

    assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
    assert_eq!(
        std::fs::read_to_string(dst.join("inner").join("b.txt")).unwrap(),
        "b"
    );
}

#[test]
fn test_remove_dir_if_exists() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("vendor");
    std::fs::create_dir_all(dir.join("x")).unwrap();
    assert!(remove_dir_if_exists(&dir).unwrap());
    assert!(!dir.exists());
    assert!(!remove_dir_if_exists(&dir).unwrap());
}

#[test]
fn test_to_slash_joins_components() {
    assert_eq!(to_slash(Path::new("example.com/foo/bar")), "example.com/foo/bar");
    assert_eq!(to_slash(Path::new("/abs/path/")), "abs/path");
}
