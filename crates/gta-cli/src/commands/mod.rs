//! Command dispatch and handler modules.

mod sweep;

use miette::Result;

use crate::cli::Cli;

/// Route a parsed CLI invocation to the sweep handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    if cli.dry_run {
        sweep::dry_run(&cli)
    } else {
        sweep::exec(&cli).await
    }
}
