//! Running the user's check command against a materialized tree.

use std::path::Path;
use std::time::Duration;

use gta_core::version::Version;
use gta_util::errors::GtaError;
use gta_util::process::CommandBuilder;

/// Outcome of one check command run.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub version: Version,
    /// `None` if the command never ran to an exit code.
    pub exit_code: Option<i32>,
    /// Stdout followed by stderr.
    pub output: String,
    /// Launch failure or timeout.
    pub error: Option<String>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.exit_code == Some(0)
    }

    /// Text worth showing for a failed check.
    pub fn diagnostic(&self) -> String {
        let mut text = match (&self.error, self.exit_code) {
            (Some(e), _) => e.clone(),
            (None, Some(code)) => format!("exit status {code}"),
            (None, None) => "terminated by signal".to_string(),
        };
        let output = self.output.trim_end();
        if !output.is_empty() {
            text.push('\n');
            text.push_str(output);
        }
        text
    }
}

/// The configured check command.
///
/// The command line is split on whitespace; quoting is not supported, so an
/// argument cannot contain spaces.
#[derive(Debug, Clone)]
pub struct Verifier {
    command: CommandBuilder,
    timeout: Option<Duration>,
}

impl Verifier {
    /// Returns `None` for a blank command line.
    pub fn new(command_line: &str, project_root: &Path, timeout: Option<Duration>) -> Option<Self> {
        let command = CommandBuilder::from_command_line(command_line)?.cwd(project_root);
        Some(Self { command, timeout })
    }

    pub fn command(&self) -> &CommandBuilder {
        &self.command
    }

    /// Run the command and wait for it to exit or time out.
    pub async fn verify(&self, version: &Version) -> VerificationResult {
        tracing::debug!(
            "running `{} {}` for {version}",
            self.command.program(),
            self.command.arguments().join(" ")
        );
        match self.command.exec_captured(self.timeout).await {
            Ok(out) => VerificationResult {
                version: version.clone(),
                exit_code: out.code,
                output: out.combined,
                error: None,
            },
            Err(e) => {
                let error = match e {
                    GtaError::TimedOut { .. } => e.to_string(),
                    _ => format!("could not run `{}`: {e}", self.command.program()),
                };
                VerificationResult {
                    version: version.clone(),
                    exit_code: None,
                    output: String::new(),
                    error: Some(error),
                }
            }
        }
    }
}
