//! Handler for `gta <dependency>`.

use std::time::Duration;

use console::style;
use miette::Result;

use gta_core::config::GlobalConfig;
use gta_core::constraint::Selectors;
use gta_core::workspace::derive_import_root;
use gta_ops::ops_sweep::{self, Capabilities, SweepOptions};
use gta_util::errors::GtaError;

use crate::cli::Cli;

/// Merge flags over the global config into one set of sweep options.
fn options(cli: &Cli) -> Result<(SweepOptions, Capabilities)> {
    let constraint = Selectors {
        branch: cli.branch.clone(),
        tag: cli.tag.clone(),
        semver: cli.semver.clone(),
    }
    .resolve()?;

    let config = GlobalConfig::load()?;
    let project_root = std::env::current_dir().map_err(GtaError::Io)?;
    let import_root = derive_import_root(&project_root, &config.workspace_dir());

    let timeout_secs = cli.timeout.unwrap_or(config.verify.timeout_secs);
    let opts = SweepOptions {
        project_root,
        import_root,
        dependency: cli.dependency.clone(),
        constraint,
        run: cli.run.clone().filter(|r| !r.trim().is_empty()),
        jobs: cli.jobs.unwrap_or(config.sweep.jobs).max(1),
        timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        manifest_narrowing: !cli.no_pm,
    };
    tracing::debug!("registry at {}", config.registry_dir().display());
    Ok((opts, Capabilities::registry(config.registry_dir())))
}

pub async fn exec(cli: &Cli) -> Result<()> {
    let (opts, caps) = options(cli)?;

    let cancel = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let report = ops_sweep::sweep(&opts, &caps, cancel).await?;

    let summary = report.summary();
    if report.failed() {
        println!("{}", style(summary).red().bold());
    } else {
        println!("{}", style(summary).green().bold());
    }
    report.into_result()?;
    Ok(())
}

pub fn dry_run(cli: &Cli) -> Result<()> {
    let (opts, caps) = options(cli)?;
    let set = ops_sweep::list_candidates(&opts, &caps)?;
    gta_util::progress::status_info(
        "Candidates",
        &format!("{} of {} versions of {}", set.len(), set.total, set.root),
    );
    for version in &set.candidates {
        println!("{}@{} ({})", set.root, version, version.kind());
    }
    Ok(())
}
