//! Operation: sweep one dependency across its candidate versions.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use gta_core::constraint::Constraint;
use gta_core::manifest::{ManifestLoader, ProjectMetadata, TomlManifestLoader};
use gta_resolver::registry::Registry;
use gta_resolver::resolver::{IndexResolver, Resolver, SolveRequest};
use gta_resolver::source::{RegistrySource, VersionSource};
use gta_util::errors::GtaError;
use gta_util::progress;

use crate::catalog::{CandidateSet, RawCatalog};
use crate::materialize;
use crate::report::{SweepReport, VersionStatus};
use crate::solve::{self, SolveOutcome};
use crate::vendor::{VendorGuard, VENDOR_DIR};
use crate::verify::Verifier;

/// Options for `gta <dependency>`.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub project_root: PathBuf,
    /// Import root derived from the workspace layout. A manifest
    /// `import-path` takes precedence.
    pub import_root: String,
    pub dependency: String,
    pub constraint: Constraint,
    /// Check command run against every materialized tree.
    pub run: Option<String>,
    pub jobs: usize,
    pub timeout: Option<Duration>,
    /// Narrow an unconstrained sweep to the manifest's declared constraint.
    pub manifest_narrowing: bool,
}

/// The external collaborators a sweep talks to.
#[derive(Clone)]
pub struct Capabilities {
    pub source: Arc<dyn VersionSource>,
    pub resolver: Arc<dyn Resolver>,
    pub manifest: Option<Arc<dyn ManifestLoader>>,
}

impl Capabilities {
    /// File-backed collaborators reading the registry at `dir`.
    pub fn registry(dir: impl Into<PathBuf>) -> Self {
        let registry = Registry::new(dir);
        Self {
            source: Arc::new(RegistrySource::new(registry.clone())),
            resolver: Arc::new(IndexResolver::new(registry)),
            manifest: Some(Arc::new(TomlManifestLoader)),
        }
    }
}

/// Everything decided before the first solve.
struct Plan {
    metadata: Option<ProjectMetadata>,
    import_root: String,
    constraint: Constraint,
    candidates: CandidateSet,
}

fn plan(opts: &SweepOptions, caps: &Capabilities) -> miette::Result<Plan> {
    let metadata = match caps.manifest {
        Some(ref loader) => loader.load(&opts.project_root)?,
        None => None,
    };
    let import_root = metadata
        .as_ref()
        .and_then(|m| m.manifest.package.import_path.clone())
        .unwrap_or_else(|| opts.import_root.clone());

    let sp = progress::spinner(&format!("Listing versions of {}", opts.dependency));
    let catalog = RawCatalog::fetch(caps.source.as_ref(), &opts.dependency);
    sp.finish_and_clear();
    let catalog = catalog?;

    let mut constraint = opts.constraint.clone();
    if constraint.is_any() && opts.manifest_narrowing {
        if let Some(ref meta) = metadata {
            if let Some(declared) = meta.manifest.constraint_for(&catalog.root)? {
                progress::status_info(
                    "Narrowing",
                    &format!("{} to manifest constraint {declared}", catalog.root),
                );
                constraint = declared;
            }
        }
    }

    let candidates = catalog.filter(&constraint)?;
    Ok(Plan {
        metadata,
        import_root,
        constraint,
        candidates,
    })
}

/// The versions a sweep would visit, without solving anything.
pub fn list_candidates(opts: &SweepOptions, caps: &Capabilities) -> miette::Result<CandidateSet> {
    Ok(plan(opts, caps)?.candidates)
}

/// Solve, materialize and check every candidate version of the dependency.
///
/// One report line per version is printed to stdout as soon as the version is
/// done. If `cancel` completes first the sweep stops, the vendor tree is
/// restored and [`GtaError::Cancelled`] is returned. A report with failed
/// versions is still `Ok`; see [`SweepReport::into_result`].
pub async fn sweep<F>(
    opts: &SweepOptions,
    caps: &Capabilities,
    cancel: F,
) -> miette::Result<SweepReport>
where
    F: Future<Output = ()>,
{
    // Poll once up front so a signal handler is installed before the vendor
    // tree is moved.
    let mut cancel = std::pin::pin!(cancel);
    tokio::select! {
        biased;
        _ = &mut cancel => return Err(GtaError::Cancelled.into()),
        _ = std::future::ready(()) => {}
    }

    let plan = plan(opts, caps)?;
    let root = plan.candidates.root.clone();
    progress::status(
        "Sweeping",
        &format!(
            "{root} ({} of {} versions match {})",
            plan.candidates.len(),
            plan.candidates.total,
            plan.constraint
        ),
    );
    tracing::info!("import root {}, {} jobs", plan.import_root, opts.jobs.max(1));

    let mut base = SolveRequest::new(&opts.project_root, &plan.import_root);
    if let Some(ref meta) = plan.metadata {
        base = base.with_metadata(meta)?;
    }

    let verifier = opts
        .run
        .as_deref()
        .and_then(|line| Verifier::new(line, &opts.project_root, opts.timeout));

    // Trees only land in the project when they are going to be checked.
    let (guard, _scratch, vendor_dir) = match verifier {
        Some(_) => {
            let guard = VendorGuard::acquire(&opts.project_root)?;
            let dir = guard.vendor_dir().to_path_buf();
            (Some(guard), None, dir)
        }
        None => {
            let scratch = tempfile::TempDir::new().map_err(GtaError::from)?;
            let dir = scratch.path().join(VENDOR_DIR);
            (None, Some(scratch), dir)
        }
    };

    let mut report = SweepReport::new(&root);
    let stage = Stage {
        resolver: caps.resolver.as_ref(),
        verifier: verifier.as_ref(),
        vendor_dir: &vendor_dir,
    };
    let body = async {
        let outcomes = solve::solve_all(
            caps.resolver.clone(),
            &base,
            &root,
            &plan.candidates.candidates,
            opts.jobs,
        )
        .await;
        for outcome in outcomes {
            stage.run(outcome, &mut report).await;
        }
    };

    let finished = tokio::select! {
        _ = body => true,
        _ = &mut cancel => false,
    };
    tracing::info!(
        "sweep of {root}: {} of {} versions processed",
        report.len(),
        plan.candidates.len()
    );

    if let Some(guard) = guard {
        guard.restore()?;
    }

    if !finished {
        progress::status_warn(
            "Cancelled",
            &format!("{} of {} versions processed", report.len(), plan.candidates.len()),
        );
        return Err(GtaError::Cancelled.into());
    }
    Ok(report)
}

/// The serial write, check and cleanup stage for one solved version.
struct Stage<'a> {
    resolver: &'a dyn Resolver,
    verifier: Option<&'a Verifier>,
    vendor_dir: &'a Path,
}

impl Stage<'_> {
    async fn run(&self, outcome: SolveOutcome, report: &mut SweepReport) {
        let version = outcome.version;
        let solution = match outcome.result {
            Ok(solution) => solution,
            Err(e) => {
                let entry =
                    report.record(version, VersionStatus::SolveFailed, Some(e.to_string()), false);
                println!("{entry}");
                return;
            }
        };

        tracing::debug!(
            "solution for {}@{version}:\n{}",
            report.root,
            solution.graph.print_tree(None)
        );
        if let Err(e) = materialize::materialize(self.resolver, &solution, self.vendor_dir) {
            let entry =
                report.record(version, VersionStatus::WriteFailed, Some(e.to_string()), false);
            println!("{entry}");
            return;
        }

        let entry = match self.verifier {
            None => {
                self.discard();
                report.record(version, VersionStatus::Succeeded, None, false)
            }
            Some(verifier) => {
                progress::status("Checking", &format!("{}@{version}", report.root));
                let result = verifier.verify(&version).await;
                self.discard();
                if result.passed() {
                    report.record(version, VersionStatus::Succeeded, None, true)
                } else {
                    report.record(
                        version,
                        VersionStatus::VerifyFailed,
                        Some(result.diagnostic()),
                        true,
                    )
                }
            }
        };
        println!("{entry}");
    }

    fn discard(&self) {
        if let Err(e) = materialize::discard(self.vendor_dir) {
            tracing::warn!("could not remove {}: {e}", self.vendor_dir.display());
        }
    }
}
