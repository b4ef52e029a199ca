use std::path::Path;

use gta_core::workspace::derive_import_root;

#[test]
fn strips_workspace_src_prefix() {
    let root = derive_import_root(
        Path::new("/home/me/gta/src/example.com/me/app"),
        Path::new("/home/me/gta"),
    );
    assert_eq!(root, "example.com/me/app");
}

#[test]
fn outside_workspace_keeps_full_path() {
    let root = derive_import_root(Path::new("/srv/app"), Path::new("/home/me/gta"));
    assert_eq!(root, "srv/app");
}
