//! Versions of a dependency as reported by a version source.
//!
//! A version is an identifier plus a kind tag. Tags that parse as semantic
//! versions (optionally with a leading `v`, as in `v1.2.3`) carry their
//! parsed form so range matching never re-parses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a version identifier names in the upstream repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionKind {
    Branch,
    Semver,
    Tag,
    Revision,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VersionKind::Branch => "branch",
            VersionKind::Semver => "semver",
            VersionKind::Tag => "tag",
            VersionKind::Revision => "revision",
        })
    }
}

/// An immutable dependency version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    name: String,
    kind: VersionKind,
    semver: Option<semver::Version>,
}

impl Version {
    pub fn branch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VersionKind::Branch,
            semver: None,
        }
    }

    pub fn revision(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VersionKind::Revision,
            semver: None,
        }
    }

    /// A tag, classified as [`VersionKind::Semver`] when it parses as one.
    pub fn tag(name: impl Into<String>) -> Self {
        let name = name.into();
        match parse_semver(&name) {
            Some(v) => Self {
                name,
                kind: VersionKind::Semver,
                semver: Some(v),
            },
            None => Self {
                name,
                kind: VersionKind::Tag,
                semver: None,
            },
        }
    }

    /// Build a version of an explicit kind.
    ///
    /// Returns `None` when `kind` is [`VersionKind::Semver`] but the name does
    /// not parse as a semantic version.
    pub fn with_kind(name: impl Into<String>, kind: VersionKind) -> Option<Self> {
        let name = name.into();
        Some(match kind {
            VersionKind::Branch => Self::branch(name),
            VersionKind::Revision => Self::revision(name),
            VersionKind::Tag => Self {
                name,
                kind,
                semver: None,
            },
            VersionKind::Semver => {
                let v = parse_semver(&name)?;
                Self {
                    name,
                    kind,
                    semver: Some(v),
                }
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VersionKind {
        self.kind
    }

    /// The parsed semantic version, for semver-kind versions only.
    pub fn as_semver(&self) -> Option<&semver::Version> {
        self.semver.as_ref()
    }

    pub fn is_branch(&self) -> bool {
        self.kind == VersionKind::Branch
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Parse `1.2.3` or `v1.2.3` as a semantic version.
pub fn parse_semver(s: &str) -> Option<semver::Version> {
    let s = s.strip_prefix('v').unwrap_or(s);
    semver::Version::parse(s).ok()
}
