//! Version constraints and the selector-to-constraint resolution.

use std::fmt;

use gta_util::errors::GtaError;
use semver::VersionReq;
use serde::{Deserialize, Serialize};

use crate::version::{parse_semver, Version, VersionKind};

/// A rule selecting which versions of a dependency are acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Every version.
    Any,
    /// A branch with exactly this name.
    Branch(String),
    /// A tag or revision with exactly this name.
    Exact(String),
    /// Semver-kind versions inside this range.
    SemverRange(VersionReq),
}

impl Constraint {
    /// Parse a semver range. A bare version such as `1.2.3` selects exactly
    /// that version rather than the caret range the `semver` crate would infer.
    pub fn semver(expression: &str) -> Result<Self, GtaError> {
        let expression = expression.trim();
        let parsed = match parse_semver(expression) {
            Some(v) => VersionReq::parse(&format!("={v}")),
            None => VersionReq::parse(expression),
        };
        parsed
            .map(Constraint::SemverRange)
            .map_err(|e| GtaError::InvalidConstraintExpression {
                expression: expression.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }

    /// Whether `version` is admitted by this constraint.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Branch(name) => version.is_branch() && version.name() == name,
            Constraint::Exact(name) => {
                matches!(
                    version.kind(),
                    VersionKind::Tag | VersionKind::Semver | VersionKind::Revision
                ) && version.name() == name
            }
            Constraint::SemverRange(req) => {
                version.as_semver().is_some_and(|v| req.matches(v))
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => f.write_str("*"),
            Constraint::Branch(name) => write!(f, "branch {name}"),
            Constraint::Exact(name) => f.write_str(name),
            Constraint::SemverRange(req) => write!(f, "{req}"),
        }
    }
}

/// The user-facing constraint selectors: at most one may be set.
///
/// Also the table form of a dependency in `Gta.toml` and registry indexes,
/// e.g. `{ branch = "master" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Selectors {
    #[serde(default)]
    pub branch: Option<String>,
    /// Exact version, tag or revision.
    #[serde(default, alias = "version", alias = "revision")]
    pub tag: Option<String>,
    #[serde(default)]
    pub semver: Option<String>,
}

impl Selectors {
    /// Turn the selectors into exactly one [`Constraint`].
    ///
    /// No selector yields [`Constraint::Any`]; more than one is rejected with
    /// [`GtaError::AmbiguousConstraint`]. Empty strings count as unset.
    pub fn resolve(&self) -> Result<Constraint, GtaError> {
        fn set(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|s| !s.is_empty())
        }
        let branch = set(&self.branch);
        let tag = set(&self.tag);
        let semver = set(&self.semver);

        let given: Vec<&str> = [("branch", branch), ("tag", tag), ("semver", semver)]
            .iter()
            .filter(|(_, v)| v.is_some())
            .map(|(k, _)| *k)
            .collect();
        if given.len() > 1 {
            return Err(GtaError::AmbiguousConstraint {
                given: given.join(", "),
            });
        }

        match (branch, tag, semver) {
            (Some(b), _, _) => Ok(Constraint::Branch(b.to_string())),
            (_, Some(t), _) => Ok(Constraint::Exact(t.to_string())),
            (_, _, Some(s)) => Constraint::semver(s),
            _ => Ok(Constraint::Any),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(branch: Option<&str>, tag: Option<&str>, semver: Option<&str>) -> Selectors {
        Selectors {
            branch: branch.map(String::from),
            tag: tag.map(String::from),
            semver: semver.map(String::from),
        }
    }

    #[test]
    fn none_is_any() {
        assert_eq!(sel(None, None, None).resolve().unwrap(), Constraint::Any);
        assert_eq!(sel(Some(""), None, None).resolve().unwrap(), Constraint::Any);
    }

    #[test]
    fn single_selectors() {
        assert_eq!(
            sel(Some("master"), None, None).resolve().unwrap(),
            Constraint::Branch("master".into())
        );
        assert_eq!(
            sel(None, Some("v1.0"), None).resolve().unwrap(),
            Constraint::Exact("v1.0".into())
        );
        assert!(matches!(
            sel(None, None, Some("<2.0.0")).resolve().unwrap(),
            Constraint::SemverRange(_)
        ));
        assert_eq!(
            sel(Some(""), Some("v1.0"), Some("")).resolve().unwrap(),
            Constraint::Exact("v1.0".into())
        );
    }

    #[test]
    fn every_pair_is_ambiguous() {
        let combos = [
            sel(Some("a"), Some("b"), None),
            sel(Some("a"), None, Some("^1")),
            sel(None, Some("b"), Some("^1")),
            sel(Some("a"), Some("b"), Some("^1")),
        ];
        for c in combos {
            assert!(matches!(
                c.resolve(),
                Err(GtaError::AmbiguousConstraint { .. })
            ));
        }
    }

    #[test]
    fn invalid_semver_expression() {
        assert!(matches!(
            sel(None, None, Some("not a range")).resolve(),
            Err(GtaError::InvalidConstraintExpression { .. })
        ));
    }

    #[test]
    fn semver_range_only_matches_semver_versions() {
        let c = Constraint::semver("<2.0.0").unwrap();
        assert!(c.matches(&Version::tag("1.0.0")));
        assert!(c.matches(&Version::tag("v1.9.9")));
        assert!(!c.matches(&Version::tag("2.0.0")));
        assert!(!c.matches(&Version::tag("2.1.0")));
        assert!(!c.matches(&Version::branch("1.0.0")));
        assert!(!c.matches(&Version::branch("<2.0.0")));
        assert!(!c.matches(&Version::tag("nightly")));
        assert!(!c.matches(&Version::revision("abc123")));
    }

    #[test]
    fn bare_semver_is_exact() {
        let c = Constraint::semver("1.1.0").unwrap();
        assert!(c.matches(&Version::tag("1.1.0")));
        assert!(!c.matches(&Version::tag("1.2.0")));
    }

    #[test]
    fn branch_and_exact_matching() {
        let b = Constraint::Branch("master".into());
        assert!(b.matches(&Version::branch("master")));
        assert!(!b.matches(&Version::tag("master")));

        let e = Constraint::Exact("v1.0.0".into());
        assert!(e.matches(&Version::tag("v1.0.0")));
        assert!(!e.matches(&Version::branch("v1.0.0")));
        assert!(Constraint::Exact("abc123".into()).matches(&Version::revision("abc123")));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Constraint::Any.to_string(), "*");
        assert_eq!(Constraint::Branch("dev".into()).to_string(), "branch dev");
        assert_eq!(Constraint::semver("<2.0.0").unwrap().to_string(), "<2.0.0");
    }
}
