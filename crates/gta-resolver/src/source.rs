//! The version source capability: root deduction and version listing.

use gta_core::version::Version;
use thiserror::Error;

use crate::registry::Registry;

/// Failures of a [`VersionSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// No known root contains the identifier.
    #[error("no known source root contains {identifier}")]
    UnknownRoot { identifier: String },

    /// The index for a root could not be read or is malformed.
    #[error("index for {root} is unavailable: {message}")]
    Index { root: String, message: String },
}

/// Deduces dependency roots and enumerates their versions.
pub trait VersionSource: Send + Sync {
    /// Map an import-path-like identifier to the root it lives under.
    fn deduce_root(&self, identifier: &str) -> Result<String, SourceError>;

    /// Every known version of `root`, in catalog order.
    fn list_versions(&self, root: &str) -> Result<Vec<Version>, SourceError>;
}

/// [`VersionSource`] backed by the on-disk registry.
#[derive(Debug, Clone)]
pub struct RegistrySource {
    registry: Registry,
}

impl RegistrySource {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl VersionSource for RegistrySource {
    /// The longest `/`-separated prefix of `identifier` that has an index.
    fn deduce_root(&self, identifier: &str) -> Result<String, SourceError> {
        let identifier = identifier.trim().trim_end_matches('/');
        let segments: Vec<&str> = identifier.split('/').collect();
        for end in (1..=segments.len()).rev() {
            let candidate = segments[..end].join("/");
            if self.registry.has_root(&candidate) {
                tracing::debug!("deduced root {candidate} for {identifier}");
                return Ok(candidate);
            }
        }
        Err(SourceError::UnknownRoot {
            identifier: identifier.to_string(),
        })
    }

    fn list_versions(&self, root: &str) -> Result<Vec<Version>, SourceError> {
        let index = self.registry.load(root)?;
        index.versions.iter().map(|e| e.version(root)).collect()
    }
}
