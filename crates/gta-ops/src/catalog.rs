//! Candidate versions of the target dependency.

use gta_core::constraint::Constraint;
use gta_core::version::Version;
use gta_resolver::source::{SourceError, VersionSource};
use gta_util::errors::GtaError;

/// Every version the source knows for one root, in catalog order.
#[derive(Debug, Clone)]
pub struct RawCatalog {
    pub root: String,
    pub versions: Vec<Version>,
}

/// The versions of a root admitted by a constraint. Never empty.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub root: String,
    /// Size of the unfiltered catalog.
    pub total: usize,
    pub candidates: Vec<Version>,
}

impl RawCatalog {
    /// Deduce the root of `dependency` and list its versions.
    pub fn fetch(source: &dyn VersionSource, dependency: &str) -> Result<Self, GtaError> {
        let root = source.deduce_root(dependency).map_err(|e| match e {
            SourceError::UnknownRoot { .. } => GtaError::RootDeductionFailed {
                dependency: dependency.to_string(),
                message: e.to_string(),
            },
            SourceError::Index { root, message } => GtaError::CatalogUnavailable { root, message },
        })?;

        let versions = source
            .list_versions(&root)
            .map_err(|e| GtaError::CatalogUnavailable {
                root: root.clone(),
                message: e.to_string(),
            })?;
        if versions.is_empty() {
            return Err(GtaError::NoVersionsFound { root });
        }

        tracing::debug!("{} versions listed for {root}", versions.len());
        Ok(Self { root, versions })
    }

    /// Keep the versions `constraint` admits, preserving order.
    pub fn filter(&self, constraint: &Constraint) -> Result<CandidateSet, GtaError> {
        let candidates: Vec<Version> = self
            .versions
            .iter()
            .filter(|v| constraint.matches(v))
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Err(GtaError::NoMatchingVersions {
                root: self.root.clone(),
                constraint: constraint.to_string(),
                total: self.versions.len(),
            });
        }
        Ok(CandidateSet {
            root: self.root.clone(),
            total: self.versions.len(),
            candidates,
        })
    }
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate names joined for display.
    pub fn names(&self) -> String {
        self.candidates
            .iter()
            .map(|v| v.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
