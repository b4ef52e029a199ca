//! Per-version outcomes and the overall verdict.

use std::fmt;

use gta_core::version::Version;
use gta_util::errors::GtaError;

/// Terminal status of one candidate version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    SolveFailed,
    WriteFailed,
    VerifyFailed,
    Succeeded,
}

/// One line of the report.
#[derive(Debug, Clone)]
pub struct VersionReport {
    pub root: String,
    pub version: Version,
    pub status: VersionStatus,
    /// Error text or captured command output.
    pub diagnostic: Option<String>,
    /// Whether a check command ran for this version.
    pub verified: bool,
}

impl fmt::Display for VersionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ", self.root, self.version)?;
        match self.status {
            VersionStatus::Succeeded if self.verified => f.write_str("succeeded")?,
            VersionStatus::Succeeded => f.write_str("succeeded (no check command)")?,
            VersionStatus::SolveFailed => f.write_str("failed solving")?,
            VersionStatus::WriteFailed => f.write_str("could not write tree, skipping check")?,
            VersionStatus::VerifyFailed => f.write_str("failed verification")?,
        }
        if let Some(ref diag) = self.diagnostic {
            write!(f, ": {diag}")?;
        }
        Ok(())
    }
}

/// Outcomes for every candidate, in catalog order.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub root: String,
    pub entries: Vec<VersionReport>,
}

impl SweepReport {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        version: Version,
        status: VersionStatus,
        diagnostic: Option<String>,
        verified: bool,
    ) -> &VersionReport {
        self.entries.push(VersionReport {
            root: self.root.clone(),
            version,
            status,
            diagnostic,
            verified,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// True if any version did not succeed.
    pub fn failed(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.status != VersionStatus::Succeeded)
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status != VersionStatus::Succeeded)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Final verdict line.
    pub fn summary(&self) -> String {
        if self.failed() {
            format!(
                "FAIL: {} of {} versions of {} failed",
                self.failed_count(),
                self.len(),
                self.root
            )
        } else {
            format!("PASS: all {} versions of {} succeeded", self.len(), self.root)
        }
    }

    /// `Err(SweepFailed)` unless every version succeeded.
    pub fn into_result(self) -> Result<Self, GtaError> {
        if self.failed() {
            return Err(GtaError::SweepFailed {
                failed: self.failed_count(),
                total: self.len(),
            });
        }
        Ok(self)
    }
}
