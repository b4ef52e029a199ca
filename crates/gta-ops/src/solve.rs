//! Per-version dependency resolution on a bounded worker pool.

use std::sync::Arc;

use gta_core::version::Version;
use gta_resolver::resolver::{ResolveError, Resolver, Solution, SolveRequest};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The result of solving the project with the target pinned to one version.
#[derive(Debug)]
pub struct SolveOutcome {
    pub version: Version,
    pub result: Result<Solution, ResolveError>,
}

/// Solve `base` once per candidate, pinning `root` to each in turn.
///
/// At most `jobs` solves run at once (0 is treated as 1). The returned
/// outcomes are in candidate order no matter which solve finished first, and
/// a failing solve never stops the others.
pub async fn solve_all(
    resolver: Arc<dyn Resolver>,
    base: &SolveRequest,
    root: &str,
    candidates: &[Version],
    jobs: usize,
) -> Vec<SolveOutcome> {
    let jobs = jobs.max(1);
    let pb = gta_util::progress::progress_bar(candidates.len() as u64, "Solving");
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut join_set = JoinSet::new();

    for (position, version) in candidates.iter().enumerate() {
        let request = base.pinned(root, version.clone());
        let resolver = resolver.clone();
        let sem = semaphore.clone();

        join_set.spawn(async move {
            let result = match sem.acquire_owned().await {
                Ok(_permit) => tokio::task::spawn_blocking(move || resolver.solve(&request))
                    .await
                    .unwrap_or_else(|e| Err(ResolveError::Aborted(e.to_string()))),
                Err(e) => Err(ResolveError::Aborted(e.to_string())),
            };
            (position, result)
        });
    }

    let mut slots: Vec<Option<Result<Solution, ResolveError>>> =
        candidates.iter().map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((position, result)) => {
                tracing::debug!(
                    "solved {root}@{}: {}",
                    candidates[position],
                    if result.is_ok() { "ok" } else { "failed" }
                );
                slots[position] = Some(result);
            }
            Err(e) => tracing::warn!("solve task failed: {e}"),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    candidates
        .iter()
        .zip(slots)
        .map(|(version, slot)| SolveOutcome {
            version: version.clone(),
            result: slot.unwrap_or_else(|| {
                Err(ResolveError::Aborted("solve task did not complete".to_string()))
            }),
        })
        .collect()
}
