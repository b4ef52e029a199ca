use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for setup-level failures and sweep aggregation.
///
/// Per-version failures (solve, write, verify) are not represented here; they
/// are captured into the sweep report and only surface through
/// [`GtaError::SweepFailed`].
#[derive(Debug, Error, Diagnostic)]
pub enum GtaError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// More than one kind of constraint selector was supplied.
    #[error("Please specify only one type of constraint - branch, tag, or semver (got {given})")]
    #[diagnostic(help("Pass at most one of --branch, --tag, --semver"))]
    AmbiguousConstraint { given: String },

    /// A semver range expression could not be parsed.
    #[error("{expression} is not a valid semver constraint: {reason}")]
    InvalidConstraintExpression { expression: String, reason: String },

    /// The version source could not map an identifier onto a known root.
    #[error("Could not detect source info for {dependency}: {message}")]
    #[diagnostic(help("Check that the dependency is present in the registry cache"))]
    RootDeductionFailed { dependency: String, message: String },

    /// The version list for a root could not be retrieved.
    #[error("Could not retrieve version list for {root}: {message}")]
    CatalogUnavailable { root: String, message: String },

    /// The root exists but has no versions at all.
    #[error("No versions could be located for {root}")]
    NoVersionsFound { root: String },

    /// The root has versions, but the active constraint excludes all of them.
    #[error("{root} has {total} versions, but none matched constraint {constraint}")]
    NoMatchingVersions {
        root: String,
        constraint: String,
        total: usize,
    },

    /// The existing vendor directory could not be moved out of the way.
    #[error("Failed to back up vendor folder: {message}")]
    #[diagnostic(help("Remove or rename a stale `_origvendor` directory and retry"))]
    VendorBackupFailed { message: String },

    /// The original vendor directory could not be put back.
    #[error("Failed to restore vendor folder: {message}")]
    #[diagnostic(help("The original vendor tree is preserved in `_origvendor`"))]
    VendorRestoreFailed { message: String },

    /// Invalid or malformed project manifest or lockfile.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Gta.toml for syntax errors"))]
    Manifest { message: String },

    /// Invalid global configuration.
    #[error("Config error: {message}")]
    Config { message: String },

    /// A child process ran past its deadline and was killed.
    #[error("`{program}` timed out after {secs} seconds")]
    TimedOut { program: String, secs: u64 },

    /// At least one candidate version did not succeed.
    #[error("{failed} of {total} versions failed")]
    SweepFailed { failed: usize, total: usize },

    /// The sweep was interrupted before every version was processed.
    #[error("Sweep cancelled")]
    Cancelled,
}
