use std::path::Path;

use gta_core::constraint::Constraint;
use gta_core::version::Version;
use gta_resolver::registry::Registry;
use gta_resolver::{IndexResolver, ResolveError, Resolver, SolveRequest};
use tempfile::TempDir;

/// Write `<registry>/<root>/index.toml` and a source tree per listed version.
fn publish(registry: &Path, root: &str, index: &str, versions: &[&str]) {
    let dir = registry.join(root);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.toml"), index).unwrap();
    for v in versions {
        let src = dir.join(v);
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("lib.go"), format!("package lib // {root}@{v}")).unwrap();
    }
}

fn fixture() -> (TempDir, IndexResolver) {
    let tmp = TempDir::new().unwrap();
    let reg = tmp.path();
    publish(
        reg,
        "example.com/lib",
        r#"
[[versions]]
name = "1.0.0"
[versions.dependencies]
"example.com/log" = "^0.3"

[[versions]]
name = "1.1.0"
[versions.dependencies]
"example.com/log" = ">=0.4.0"

[[versions]]
name = "2.0.0"
"#,
        &["1.0.0", "1.1.0", "2.0.0"],
    );
    publish(
        reg,
        "example.com/log",
        r#"
[[versions]]
name = "0.3.0"
[[versions]]
name = "0.3.5"
"#,
        &["0.3.0", "0.3.5"],
    );
    let resolver = IndexResolver::new(Registry::new(reg));
    (tmp, resolver)
}

fn request() -> SolveRequest {
    SolveRequest::new("/work/src/example.com/app", "example.com/app")
}

#[test]
fn pinned_version_pulls_highest_matching_transitive() {
    let (_tmp, resolver) = fixture();
    let req = request().pinned("example.com/lib", Version::tag("1.0.0"));
    let solution = resolver.solve(&req).unwrap();
    assert_eq!(
        solution.version_of("example.com/lib"),
        Some(&Version::tag("1.0.0"))
    );
    assert_eq!(
        solution.version_of("example.com/log"),
        Some(&Version::tag("0.3.5"))
    );
    assert_eq!(solution.graph.len(), 2);
}

#[test]
fn unsatisfiable_transitive_constraint_fails() {
    let (_tmp, resolver) = fixture();
    let req = request().pinned("example.com/lib", Version::tag("1.1.0"));
    let err = resolver.solve(&req).unwrap_err();
    assert!(matches!(err, ResolveError::Unsatisfiable(_)));
    let msg = err.to_string();
    assert!(msg.starts_with("unsatisfiable constraint"), "got: {msg}");
    assert!(msg.contains("example.com/log"), "got: {msg}");
}

#[test]
fn project_constraints_are_kept_while_target_is_pinned() {
    let (_tmp, resolver) = fixture();
    let mut req = request();
    req.constraints = vec![
        ("example.com/lib".to_string(), Constraint::semver("^2").unwrap()),
        ("example.com/log".to_string(), Constraint::Exact("0.3.0".into())),
    ];
    let solution = resolver
        .solve(&req.pinned("example.com/lib", Version::tag("1.0.0")))
        .unwrap();
    assert_eq!(
        solution.version_of("example.com/lib"),
        Some(&Version::tag("1.0.0"))
    );
    assert_eq!(
        solution.version_of("example.com/log"),
        Some(&Version::tag("0.3.0"))
    );
}

#[test]
fn locked_version_is_preferred_when_it_matches() {
    let (_tmp, resolver) = fixture();
    let mut req = request();
    req.locked.insert("example.com/log".into(), "0.3.0".into());
    let solution = resolver
        .solve(&req.pinned("example.com/lib", Version::tag("1.0.0")))
        .unwrap();
    assert_eq!(
        solution.version_of("example.com/log"),
        Some(&Version::tag("0.3.0"))
    );
}

#[test]
fn solves_are_independent() {
    let (_tmp, resolver) = fixture();
    let base = request();
    assert!(resolver
        .solve(&base.pinned("example.com/lib", Version::tag("1.1.0")))
        .is_err());
    let ok = resolver
        .solve(&base.pinned("example.com/lib", Version::tag("1.0.0")))
        .unwrap();
    assert_eq!(ok.packages.len(), 2);
}

#[test]
fn pin_missing_from_registry_errors() {
    let (_tmp, resolver) = fixture();
    let err = resolver
        .solve(&request().pinned("example.com/lib", Version::tag("9.9.9")))
        .unwrap_err();
    assert!(matches!(err, ResolveError::MissingVersion { .. }));
}

#[test]
fn export_writes_vendor_tree() {
    let (_tmp, resolver) = fixture();
    let solution = resolver
        .solve(&request().pinned("example.com/lib", Version::tag("1.0.0")))
        .unwrap();
    let out = TempDir::new().unwrap();
    let vendor = out.path().join("vendor");
    resolver.export(&solution, &vendor).unwrap();
    assert_eq!(
        std::fs::read_to_string(vendor.join("example.com/lib/lib.go")).unwrap(),
        "package lib // example.com/lib@1.0.0"
    );
    assert!(vendor.join("example.com/log/lib.go").is_file());
}

#[test]
fn branch_and_tag_sharing_a_name_stay_distinct() {
    let tmp = TempDir::new().unwrap();
    publish(
        tmp.path(),
        "example.com/lib",
        r#"
[[versions]]
name = "1.0.0"
[versions.dependencies]
"example.com/missing" = "^1"

[[versions]]
name = "1.0.0"
kind = "branch"
path = "branches/1.0.0"
"#,
        &["1.0.0"],
    );
    let branch_dir = tmp.path().join("example.com/lib/branches/1.0.0");
    std::fs::create_dir_all(&branch_dir).unwrap();
    std::fs::write(branch_dir.join("lib.go"), "package lib // branch").unwrap();
    let resolver = IndexResolver::new(Registry::new(tmp.path()));

    let solution = resolver
        .solve(&request().pinned("example.com/lib", Version::branch("1.0.0")))
        .unwrap();
    assert_eq!(
        solution.version_of("example.com/lib"),
        Some(&Version::branch("1.0.0"))
    );
    assert_eq!(solution.packages.len(), 1);

    let out = TempDir::new().unwrap();
    let vendor = out.path().join("vendor");
    resolver.export(&solution, &vendor).unwrap();
    assert_eq!(
        std::fs::read_to_string(vendor.join("example.com/lib/lib.go")).unwrap(),
        "package lib // branch"
    );

    assert!(resolver
        .solve(&request().pinned("example.com/lib", Version::tag("1.0.0")))
        .is_err());
}

#[test]
fn export_rejects_checksum_mismatch() {
    let tmp = TempDir::new().unwrap();
    publish(
        tmp.path(),
        "example.com/solo",
        r#"
[[versions]]
name = "1.0.0"
checksum = "0000"
"#,
        &["1.0.0"],
    );
    let resolver = IndexResolver::new(Registry::new(tmp.path()));
    let solution = resolver
        .solve(&request().pinned("example.com/solo", Version::tag("1.0.0")))
        .unwrap();
    let out = TempDir::new().unwrap();
    let err = resolver
        .export(&solution, &out.path().join("vendor"))
        .unwrap_err();
    assert!(matches!(err, ResolveError::ChecksumMismatch { .. }));
}

#[test]
fn export_accepts_matching_checksum() {
    let tmp = TempDir::new().unwrap();
    publish(tmp.path(), "example.com/solo", "", &["1.0.0"]);
    let digest = gta_util::hash::digest_tree(&tmp.path().join("example.com/solo/1.0.0")).unwrap();
    std::fs::write(
        tmp.path().join("example.com/solo/index.toml"),
        format!("[[versions]]\nname = \"1.0.0\"\nchecksum = \"{digest}\"\n"),
    )
    .unwrap();
    let resolver = IndexResolver::new(Registry::new(tmp.path()));
    let solution = resolver
        .solve(&request().pinned("example.com/solo", Version::tag("1.0.0")))
        .unwrap();
    let out = TempDir::new().unwrap();
    resolver.export(&solution, &out.path().join("vendor")).unwrap();
}
