//! On-disk registry of dependency indexes kept in the gta cache.
//!
//! Each dependency root has a directory `<registry>/<root>/` holding an
//! `index.toml` plus one source tree per version:
//!
//! ```toml
//! [[versions]]
//! name = "1.1.0"                 # kind inferred: semver, else tag
//! checksum = "<sha256 tree digest>"
//!
//! [versions.dependencies]
//! "example.com/log" = "^0.3"
//!
//! [[versions]]
//! name = "master"
//! kind = "branch"
//! path = "branches/master"       # default: the version name
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use gta_core::manifest::DependencySpec;
use gta_core::version::{Version, VersionKind};
use serde::{Deserialize, Serialize};

use crate::source::SourceError;

pub const INDEX_FILE: &str = "index.toml";

/// Parsed `index.toml` for one root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryIndex {
    #[serde(default)]
    pub versions: Vec<IndexEntry>,
}

/// One version of a root as listed in its index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    #[serde(default)]
    pub kind: Option<VersionKind>,
    /// Source directory relative to the root's registry directory.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
}

impl IndexEntry {
    /// The typed version this entry describes.
    pub fn version(&self, root: &str) -> Result<Version, SourceError> {
        match self.kind {
            None => Ok(Version::tag(&self.name)),
            Some(kind) => Version::with_kind(&self.name, kind).ok_or_else(|| SourceError::Index {
                root: root.to_string(),
                message: format!("version {} is declared semver but does not parse", self.name),
            }),
        }
    }
}

impl RegistryIndex {
    /// Find the entry for `version`, matching both name and kind.
    ///
    /// A branch and a tag may share a name; they are different entries.
    pub fn entry_for(&self, root: &str, version: &Version) -> Option<&IndexEntry> {
        self.versions.iter().find(|e| {
            e.name == version.name()
                && e.version(root).is_ok_and(|v| v.kind() == version.kind())
        })
    }
}

/// A registry directory.
#[derive(Debug, Clone)]
pub struct Registry {
    dir: PathBuf,
}

impl Registry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory for `root`, or `None` if the root is not a clean relative path.
    pub fn root_dir(&self, root: &str) -> Option<PathBuf> {
        clean_relative(root).map(|rel| self.dir.join(rel))
    }

    pub fn has_root(&self, root: &str) -> bool {
        self.root_dir(root)
            .is_some_and(|d| d.join(INDEX_FILE).is_file())
    }

    /// Read and parse the index for `root`.
    pub fn load(&self, root: &str) -> Result<RegistryIndex, SourceError> {
        let dir = self.root_dir(root).ok_or_else(|| SourceError::UnknownRoot {
            identifier: root.to_string(),
        })?;
        let path = dir.join(INDEX_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| SourceError::Index {
            root: root.to_string(),
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| SourceError::Index {
            root: root.to_string(),
            message: format!("failed to parse {}: {e}", path.display()),
        })
    }

    /// Source tree of one version.
    pub fn source_dir(&self, root: &str, entry: &IndexEntry) -> Option<PathBuf> {
        let root_dir = self.root_dir(root)?;
        let rel = clean_relative(entry.path.as_deref().unwrap_or(&entry.name))?;
        Some(root_dir.join(rel))
    }
}

/// Accept only relative `a/b/c`-style paths with no `..` segments.
fn clean_relative(path: &str) -> Option<PathBuf> {
    let path = path.trim().trim_end_matches('/');
    if path.is_empty() {
        return None;
    }
    let p = Path::new(path);
    if p.components().all(|c| matches!(c, Component::Normal(_))) {
        Some(p.to_path_buf())
    } else {
        None
    }
}
