use gta_core::constraint::Constraint;
use gta_core::manifest::{DependencySpec, Manifest, ManifestLoader, TomlManifestLoader};
use gta_core::version::Version;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[package]
import-path = "example.com/me/app"

[dependencies]
"example.com/foo/bar" = "<2.0.0"
"example.com/foo/baz" = { branch = "master" }
"example.com/foo/qux" = { tag = "v0.3" }
"example.com/foo/any" = "*"
"#;

#[test]
fn parses_all_dependency_forms() {
    let manifest = Manifest::from_str(MANIFEST).unwrap();
    assert_eq!(
        manifest.package.import_path.as_deref(),
        Some("example.com/me/app")
    );
    assert!(matches!(
        manifest.dependencies["example.com/foo/bar"],
        DependencySpec::Short(_)
    ));

    let bar = manifest.constraint_for("example.com/foo/bar").unwrap().unwrap();
    assert!(bar.matches(&Version::tag("1.5.0")));
    assert!(!bar.matches(&Version::tag("2.0.0")));

    assert_eq!(
        manifest.constraint_for("example.com/foo/baz").unwrap(),
        Some(Constraint::Branch("master".into()))
    );
    assert_eq!(
        manifest.constraint_for("example.com/foo/qux").unwrap(),
        Some(Constraint::Exact("v0.3".into()))
    );
    assert_eq!(
        manifest.constraint_for("example.com/foo/any").unwrap(),
        Some(Constraint::Any)
    );
    assert_eq!(manifest.constraint_for("example.com/other").unwrap(), None);
}

#[test]
fn ambiguous_dependency_is_reported_with_root() {
    let manifest = Manifest::from_str(
        r#"
[dependencies]
"example.com/x" = { branch = "master", semver = "^1" }
"#,
    )
    .unwrap();
    let err = manifest.constraints().unwrap_err();
    assert!(err.to_string().contains("example.com/x"), "got: {err}");
}

#[test]
fn unknown_selector_key_is_rejected() {
    assert!(Manifest::from_str(
        r#"
[dependencies]
"example.com/x" = { color = "blue" }
"#,
    )
    .is_err());
}

#[test]
fn loader_without_manifest_returns_none() {
    let tmp = TempDir::new().unwrap();
    assert!(TomlManifestLoader.load(tmp.path()).unwrap().is_none());
}

#[test]
fn loader_reads_manifest_and_lock() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Gta.toml"), MANIFEST).unwrap();
    std::fs::write(
        tmp.path().join("Gta.lock"),
        "[[package]]\nroot = \"example.com/foo/bar\"\nversion = \"1.1.0\"\n",
    )
    .unwrap();

    let meta = TomlManifestLoader.load(tmp.path()).unwrap().unwrap();
    assert_eq!(meta.manifest.dependencies.len(), 4);
    assert_eq!(
        meta.lock.unwrap().locked_version("example.com/foo/bar"),
        Some("1.1.0")
    );
}
