//! The project manifest (`Gta.toml`) and the loader capability that reads it.
//!
//! ```toml
//! [package]
//! import-path = "example.com/me/app"
//!
//! [dependencies]
//! "example.com/foo/bar" = "^1.2"
//! "example.com/foo/baz" = { branch = "master" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, Selectors};
use crate::lockfile::Lockfile;

/// A parsed `Gta.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub package: PackageInfo,
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
}

/// `[package]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Overrides the import root derived from the workspace layout.
    #[serde(default, rename = "import-path")]
    pub import_path: Option<String>,
}

/// A dependency constraint: a semver range string or a selector table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Short(String),
    Detailed(Selectors),
}

impl DependencySpec {
    pub fn constraint(&self) -> Result<Constraint, gta_util::errors::GtaError> {
        match self {
            DependencySpec::Short(s) if s.trim() == "*" => Ok(Constraint::Any),
            DependencySpec::Short(s) => Constraint::semver(s),
            DependencySpec::Detailed(sel) => sel.resolve(),
        }
    }
}

impl Manifest {
    /// Load and parse a `Gta.toml` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            gta_util::errors::GtaError::Manifest {
                message: format!("Failed to read {}: {e}", path.display()),
            }
        })?;
        Self::from_str(&content)
    }

    /// Parse a `Gta.toml` from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            gta_util::errors::GtaError::Manifest {
                message: format!("Failed to parse Gta.toml: {e}"),
            }
            .into()
        })
    }

    /// Every declared dependency with its constraint, in key order.
    pub fn constraints(&self) -> miette::Result<Vec<(String, Constraint)>> {
        self.dependencies
            .iter()
            .map(|(root, spec)| {
                let c = spec.constraint().map_err(|e| {
                    gta_util::errors::GtaError::Manifest {
                        message: format!("dependency {root}: {e}"),
                    }
                })?;
                Ok((root.clone(), c))
            })
            .collect()
    }

    /// The declared constraint for `root`, if the manifest names it.
    pub fn constraint_for(&self, root: &str) -> miette::Result<Option<Constraint>> {
        Ok(self
            .constraints()?
            .into_iter()
            .find(|(r, _)| r == root)
            .map(|(_, c)| c))
    }
}

/// Package-manager metadata for a project: manifest plus optional lock.
#[derive(Debug, Clone, Default)]
pub struct ProjectMetadata {
    pub manifest: Manifest,
    pub lock: Option<Lockfile>,
}

/// Reads a project's package-manager metadata, if any is present.
pub trait ManifestLoader: Send + Sync {
    /// Returns `Ok(None)` when the project has no manifest this loader understands.
    fn load(&self, project_root: &Path) -> miette::Result<Option<ProjectMetadata>>;
}

/// Loader for `Gta.toml` / `Gta.lock`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlManifestLoader;

impl ManifestLoader for TomlManifestLoader {
    fn load(&self, project_root: &Path) -> miette::Result<Option<ProjectMetadata>> {
        let manifest_path = project_root.join(crate::MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Ok(None);
        }
        let manifest = Manifest::from_path(&manifest_path)?;
        let lock_path = project_root.join(crate::LOCK_FILE);
        let lock = if lock_path.is_file() {
            Some(Lockfile::from_path(&lock_path)?)
        } else {
            None
        };
        tracing::debug!(
            "loaded {} ({} dependencies, lock: {})",
            manifest_path.display(),
            manifest.dependencies.len(),
            lock.is_some()
        );
        Ok(Some(ProjectMetadata { manifest, lock }))
    }
}
