//! Writing a solution to the vendor path.

use std::path::Path;

use gta_resolver::resolver::{ResolveError, Resolver, Solution};

/// Write `solution` to `vendor_dir`, replacing whatever is there.
///
/// A failed export leaves nothing behind.
pub fn materialize(
    resolver: &dyn Resolver,
    solution: &Solution,
    vendor_dir: &Path,
) -> Result<(), ResolveError> {
    discard(vendor_dir).map_err(|source| ResolveError::Export {
        root: solution.import_root.clone(),
        source,
    })?;

    if let Err(e) = resolver.export(solution, vendor_dir) {
        if let Err(cleanup) = discard(vendor_dir) {
            tracing::warn!("could not remove partial tree {}: {cleanup}", vendor_dir.display());
        }
        return Err(e);
    }
    tracing::debug!(
        "wrote {} packages to {}",
        solution.packages.len(),
        vendor_dir.display()
    );
    Ok(())
}

/// Remove a transient tree.
pub fn discard(vendor_dir: &Path) -> std::io::Result<()> {
    gta_util::fs::remove_dir_if_exists(vendor_dir).map(|_| ())
}
