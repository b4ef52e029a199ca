use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lockfile recording the versions last selected for a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub package: Vec<LockedPackage>,
}

/// A single locked dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedPackage {
    pub root: String,
    pub version: String,
    #[serde(default)]
    pub checksum: Option<String>,
}

impl Lockfile {
    /// Load and parse a `Gta.lock` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| gta_util::errors::GtaError::Manifest {
                message: format!("Failed to read lockfile: {e}"),
            })?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            gta_util::errors::GtaError::Manifest {
                message: format!("Failed to parse lockfile: {e}"),
            }
            .into()
        })
    }

    /// The locked version name for a root, if any.
    pub fn locked_version(&self, root: &str) -> Option<&str> {
        self.package
            .iter()
            .find(|p| p.root == root)
            .map(|p| p.version.as_str())
    }
}
