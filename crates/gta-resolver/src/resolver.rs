//! The resolver capability and the registry-backed implementation.
//!
//! [`IndexResolver`] performs a nearest-first BFS from the project's direct
//! dependencies. The first selection for a root wins; every later requirement
//! on that root must be satisfied by it, otherwise the solve fails with the
//! full list of conflicts. There is no backtracking.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use gta_core::constraint::Constraint;
use gta_core::manifest::ProjectMetadata;
use gta_core::version::Version;
use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::conflict::{ConflictReport, VersionConflict};
use crate::graph::{DepEdge, DependencyGraph, ResolvedNode};
use crate::registry::{IndexEntry, Registry, RegistryIndex};
use crate::source::SourceError;

/// A per-version resolution or export failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsatisfiable constraint: {0}")]
    Unsatisfiable(ConflictReport),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("{root}@{version} is not in the registry")]
    MissingVersion { root: String, version: String },

    #[error("checksum mismatch for {root}@{version}: expected {expected}, found {actual}")]
    ChecksumMismatch {
        root: String,
        version: String,
        expected: String,
        actual: String,
    },

    #[error("resolution task aborted: {0}")]
    Aborted(String),

    #[error("failed to export {root}: {source}")]
    Export {
        root: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a resolver needs to solve the project with one root pinned.
#[derive(Debug, Clone)]
pub struct SolveRequest {
    pub project_root: PathBuf,
    pub import_root: String,
    /// The project's own direct constraints, in manifest order.
    pub constraints: Vec<(String, Constraint)>,
    /// Preferred versions from the project lockfile.
    pub locked: BTreeMap<String, String>,
    pub pin: Option<Pin>,
}

/// A root fixed to one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub root: String,
    pub version: Version,
}

impl SolveRequest {
    pub fn new(project_root: impl Into<PathBuf>, import_root: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            import_root: import_root.into(),
            constraints: Vec::new(),
            locked: BTreeMap::new(),
            pin: None,
        }
    }

    /// Take direct constraints and locked versions from project metadata.
    pub fn with_metadata(mut self, meta: &ProjectMetadata) -> miette::Result<Self> {
        self.constraints = meta.manifest.constraints()?;
        if let Some(ref lock) = meta.lock {
            self.locked = lock
                .package
                .iter()
                .map(|p| (p.root.clone(), p.version.clone()))
                .collect();
        }
        Ok(self)
    }

    /// A copy of this request with `root` fixed to `version`.
    ///
    /// The pin replaces any direct constraint on `root`; every other
    /// constraint and lock entry is left untouched.
    pub fn pinned(&self, root: &str, version: Version) -> Self {
        let mut req = self.clone();
        req.pin = Some(Pin {
            root: root.to_string(),
            version,
        });
        req
    }
}

/// A complete, consistent set of resolved versions.
#[derive(Debug, Clone)]
pub struct Solution {
    pub import_root: String,
    pub packages: Vec<ResolvedPackage>,
    pub graph: DependencyGraph,
}

/// One package of a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub root: String,
    pub version: Version,
}

impl Solution {
    pub fn version_of(&self, root: &str) -> Option<&Version> {
        self.packages
            .iter()
            .find(|p| p.root == root)
            .map(|p| &p.version)
    }
}

/// Produces solutions and writes them to disk.
pub trait Resolver: Send + Sync {
    /// Resolve a full dependency set for `request`.
    ///
    /// Calls must not share state: the outcome for one request may not depend
    /// on any earlier call.
    fn solve(&self, request: &SolveRequest) -> Result<Solution, ResolveError>;

    /// Write every package of `solution` under `vendor_dir`.
    fn export(&self, solution: &Solution, vendor_dir: &Path) -> Result<(), ResolveError>;
}

/// [`Resolver`] backed by the on-disk registry.
#[derive(Debug, Clone)]
pub struct IndexResolver {
    registry: Registry,
}

impl IndexResolver {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

/// Entry in the BFS queue.
struct QueueEntry {
    root: String,
    constraint: Constraint,
    depth: usize,
    parent: Option<String>,
}

/// Per-call state. Indexes are re-read for every solve.
struct Session<'a> {
    registry: &'a Registry,
    indexes: HashMap<String, RegistryIndex>,
}

impl<'a> Session<'a> {
    fn index(&mut self, root: &str) -> Result<&RegistryIndex, SourceError> {
        if !self.indexes.contains_key(root) {
            let index = self.registry.load(root)?;
            self.indexes.insert(root.to_string(), index);
        }
        Ok(&self.indexes[root])
    }
}

impl Resolver for IndexResolver {
    fn solve(&self, request: &SolveRequest) -> Result<Solution, ResolveError> {
        let mut session = Session {
            registry: &self.registry,
            indexes: HashMap::new(),
        };
        let mut graph = DependencyGraph::new();
        let mut conflicts = ConflictReport::new();

        let project = graph.add_node(ResolvedNode {
            root: request.import_root.clone(),
            version: String::new(),
        });
        graph.set_root(project);

        let pin = request.pin.as_ref();
        let mut queue: VecDeque<QueueEntry> = VecDeque::new();
        if let Some(pin) = pin {
            queue.push_back(QueueEntry {
                root: pin.root.clone(),
                constraint: Constraint::Any,
                depth: 1,
                parent: None,
            });
        }
        for (root, constraint) in &request.constraints {
            if pin.is_some_and(|p| &p.root == root) {
                continue;
            }
            queue.push_back(QueueEntry {
                root: root.clone(),
                constraint: constraint.clone(),
                depth: 1,
                parent: None,
            });
        }

        let mut selected: HashMap<String, (Version, NodeIndex)> = HashMap::new();
        let mut packages: Vec<ResolvedPackage> = Vec::new();

        while let Some(entry) = queue.pop_front() {
            let parent_idx = match entry.parent {
                Some(ref p) => graph.find(p).unwrap_or(project),
                None => project,
            };
            let required_by = graph.node(parent_idx).to_string();
            let edge = DepEdge {
                constraint: entry.constraint.to_string(),
            };

            if let Some((version, idx)) = selected.get(&entry.root) {
                if !entry.constraint.matches(version) {
                    conflicts.add(VersionConflict {
                        root: entry.root.clone(),
                        required_by,
                        constraint: entry.constraint.to_string(),
                        selected: Some(version.to_string()),
                    });
                }
                graph.add_edge(parent_idx, *idx, edge);
                continue;
            }

            let index = session.index(&entry.root)?;
            let chosen = match pin.filter(|p| p.root == entry.root) {
                Some(p) if entry.constraint.matches(&p.version) => {
                    let e = index.entry_for(&p.root, &p.version).ok_or_else(|| {
                        ResolveError::MissingVersion {
                            root: p.root.clone(),
                            version: p.version.to_string(),
                        }
                    })?;
                    Some((p.version.clone(), e.clone()))
                }
                Some(_) => None,
                None => select(
                    index,
                    &entry.root,
                    &entry.constraint,
                    request.locked.get(&entry.root),
                )?,
            };

            let Some((version, index_entry)) = chosen else {
                conflicts.add(VersionConflict {
                    root: entry.root.clone(),
                    required_by,
                    constraint: entry.constraint.to_string(),
                    selected: None,
                });
                continue;
            };

            tracing::trace!("selected {}@{} at depth {}", entry.root, version, entry.depth);
            let idx = graph.add_node(ResolvedNode {
                root: entry.root.clone(),
                version: version.to_string(),
            });
            graph.add_edge(parent_idx, idx, edge);
            selected.insert(entry.root.clone(), (version.clone(), idx));
            packages.push(ResolvedPackage {
                root: entry.root.clone(),
                version,
            });

            for (dep_root, spec) in &index_entry.dependencies {
                let constraint = spec.constraint().map_err(|e| SourceError::Index {
                    root: entry.root.clone(),
                    message: format!("dependency {dep_root}: {e}"),
                })?;
                queue.push_back(QueueEntry {
                    root: dep_root.clone(),
                    constraint,
                    depth: entry.depth + 1,
                    parent: Some(entry.root.clone()),
                });
            }
        }

        if !conflicts.is_empty() {
            return Err(ResolveError::Unsatisfiable(conflicts));
        }

        Ok(Solution {
            import_root: request.import_root.clone(),
            packages,
            graph,
        })
    }

    fn export(&self, solution: &Solution, vendor_dir: &Path) -> Result<(), ResolveError> {
        for pkg in &solution.packages {
            let missing = || ResolveError::MissingVersion {
                root: pkg.root.clone(),
                version: pkg.version.to_string(),
            };
            let index = self.registry.load(&pkg.root)?;
            let entry = index.entry_for(&pkg.root, &pkg.version).ok_or_else(missing)?;
            let src = self
                .registry
                .source_dir(&pkg.root, entry)
                .filter(|p| p.is_dir())
                .ok_or_else(missing)?;

            let export_err = |source| ResolveError::Export {
                root: pkg.root.clone(),
                source,
            };
            if let Some(ref expected) = entry.checksum {
                let actual = gta_util::hash::digest_tree(&src).map_err(export_err)?;
                if !actual.eq_ignore_ascii_case(expected) {
                    return Err(ResolveError::ChecksumMismatch {
                        root: pkg.root.clone(),
                        version: pkg.version.to_string(),
                        expected: expected.clone(),
                        actual,
                    });
                }
            }

            let dst = vendor_dir.join(&pkg.root);
            gta_util::fs::copy_dir_all(&src, &dst).map_err(export_err)?;
            tracing::debug!("exported {}@{} to {}", pkg.root, pkg.version, dst.display());
        }
        Ok(())
    }
}

/// Pick a version of `root` for `constraint`.
///
/// A locked version wins if it matches. Otherwise the highest matching semver
/// version is taken, falling back to the first match in catalog order.
fn select(
    index: &RegistryIndex,
    root: &str,
    constraint: &Constraint,
    locked: Option<&String>,
) -> Result<Option<(Version, IndexEntry)>, ResolveError> {
    let mut candidates: Vec<(Version, &IndexEntry)> = Vec::new();
    for entry in &index.versions {
        let version = entry.version(root)?;
        if constraint.matches(&version) {
            candidates.push((version, entry));
        }
    }

    if let Some(locked) = locked {
        if let Some((v, e)) = candidates.iter().find(|(v, _)| v.name() == locked) {
            return Ok(Some((v.clone(), (*e).clone())));
        }
    }

    let best = candidates
        .iter()
        .filter(|(v, _)| v.as_semver().is_some())
        .max_by(|(a, _), (b, _)| a.as_semver().cmp(&b.as_semver()))
        .or_else(|| candidates.first());
    Ok(best.map(|(v, e)| (v.clone(), (*e).clone())))
}
