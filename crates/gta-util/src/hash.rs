use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Compute a SHA-256 digest over a whole directory tree.
///
/// Entries are visited in sorted order and each file contributes its
/// slash-separated relative path followed by its contents, so two trees hash
/// equal iff they have the same layout and bytes.
pub fn digest_tree(root: &Path) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    walk(&mut hasher, root, root)?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn walk(hasher: &mut Sha256, root: &Path, dir: &Path) -> std::io::Result<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(&path);
        let rel = crate::fs::to_slash(rel);
        if path.is_dir() {
            hasher.update(b"d:");
            hasher.update(rel.as_bytes());
            hasher.update([0]);
            walk(hasher, root, &path)?;
        } else {
            hasher.update(b"f:");
            hasher.update(rel.as_bytes());
            hasher.update([0]);
            feed_file(hasher, &path)?;
        }
    }
    Ok(())
}

fn feed_file(hasher: &mut Sha256, path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::open(path)?;
    let mut buffer = [0u8; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}
