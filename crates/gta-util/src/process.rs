use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use crate::errors::GtaError;

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting program, arguments and working directory.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

/// Exit status and captured output of a finished child.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// Exit code, or `None` if the child was terminated by a signal.
    pub code: Option<i32>,
    pub success: bool,
    /// Stdout followed by stderr, lossily decoded.
    pub combined: String,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Build from a single command line split on ASCII whitespace.
    ///
    /// There is no quoting or escaping: an argument containing whitespace
    /// cannot be expressed. Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).args(parts))
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the child process.
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Run the command to completion, capturing stdout and stderr together.
    ///
    /// With a `timeout` the child is killed once the deadline passes. The child
    /// is also killed if the returned future is dropped before it exits.
    pub async fn exec_captured(
        &self,
        timeout: Option<Duration>,
    ) -> Result<CapturedOutput, GtaError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn()?;
        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| GtaError::TimedOut {
                    program: self.program.clone(),
                    secs: limit.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CapturedOutput {
            code: output.status.code(),
            success: output.status.success(),
            combined,
        })
    }
}
