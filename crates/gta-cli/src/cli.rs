//! CLI argument definitions for gta.
//!
//! gta has a single command surface: the dependency to sweep plus flags that
//! select versions and configure the check.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "gta",
    version,
    about = "Check a project against every version of one dependency",
    long_about = "gta resolves the project once per candidate version of a dependency, \
                  writes each resolved tree into the project's vendor directory and runs \
                  an optional check command against it. The original vendor directory is \
                  restored afterwards."
)]
pub struct Cli {
    /// Dependency to sweep (an import path under a known root)
    pub dependency: String,

    /// Only the branch with this name
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Only the exact version, tag or revision with this name
    #[arg(long, value_name = "NAME")]
    pub tag: Option<String>,

    /// Only semver versions inside this range (e.g. "<2.0.0")
    #[arg(long, value_name = "RANGE")]
    pub semver: Option<String>,

    /// Check command run in the project root for every version, e.g. "go test ./..."
    ///
    /// The command is split on whitespace; quoting is not supported.
    #[arg(short, long, value_name = "CMD")]
    pub run: Option<String>,

    /// Number of versions solved in parallel
    #[arg(short, long, env = "GTA_JOBS", value_name = "N")]
    pub jobs: Option<usize>,

    /// Kill the check command after this many seconds (0 = never)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Ignore the constraint declared in Gta.toml for the swept dependency
    #[arg(long)]
    pub no_pm: bool,

    /// Print the candidate versions and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
