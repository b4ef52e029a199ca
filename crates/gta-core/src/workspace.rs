use std::path::Path;

/// Derive a project's import root from its directory and the workspace root.
///
/// Projects live at `<workspace>/src/<import path>`, so the import root is the
/// project directory with that prefix stripped, in slash form. A directory
/// outside the workspace keeps its full path.
pub fn derive_import_root(project_dir: &Path, workspace_dir: &Path) -> String {
    let src = workspace_dir.join("src");
    match project_dir.strip_prefix(&src) {
        Ok(rel) => gta_util::fs::to_slash(rel),
        Err(_) => {
            tracing::warn!(
                "{} is not inside {}, using its full path as the import root",
                project_dir.display(),
                src.display()
            );
            gta_util::fs::to_slash(project_dir)
        }
    }
}
