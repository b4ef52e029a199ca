//! Backup and restore of the project's own vendor directory.
//!
//! A sweep writes one transient tree after another into `<project>/vendor`.
//! [`VendorGuard`] moves the original tree aside before the first write and
//! puts it back when the sweep ends, on every exit path.

use std::path::{Path, PathBuf};

use gta_util::errors::GtaError;

pub const VENDOR_DIR: &str = "vendor";
pub const BACKUP_DIR: &str = "_origvendor";

/// Lifecycle of a [`VendorGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// There was no vendor tree; nothing to put back.
    Idle,
    /// The original tree sits at the backup path.
    BackedUp,
    Restored,
}

/// Exclusive owner of `<project>/vendor` for the duration of a sweep.
///
/// Call [`VendorGuard::restore`] to observe restore errors. If the guard is
/// dropped without it (cancellation, early return, panic) the restore runs in
/// `Drop` and failures are logged.
#[derive(Debug)]
pub struct VendorGuard {
    vendor: PathBuf,
    backup: PathBuf,
    state: GuardState,
}

impl VendorGuard {
    /// Move an existing vendor tree out of the way.
    ///
    /// Fails without touching anything if the backup path is already taken.
    pub fn acquire(project_root: &Path) -> Result<Self, GtaError> {
        let vendor = project_root.join(VENDOR_DIR);
        let backup = project_root.join(BACKUP_DIR);

        if std::fs::symlink_metadata(&backup).is_ok() {
            return Err(GtaError::VendorBackupFailed {
                message: format!("{} already exists", backup.display()),
            });
        }

        let state = if std::fs::symlink_metadata(&vendor).is_ok() {
            std::fs::rename(&vendor, &backup).map_err(|e| GtaError::VendorBackupFailed {
                message: format!(
                    "cannot move {} to {}: {e}",
                    vendor.display(),
                    backup.display()
                ),
            })?;
            tracing::debug!("moved {} to {}", vendor.display(), backup.display());
            GuardState::BackedUp
        } else {
            GuardState::Idle
        };

        Ok(Self {
            vendor,
            backup,
            state,
        })
    }

    /// Where transient trees are written.
    pub fn vendor_dir(&self) -> &Path {
        &self.vendor
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Remove any transient tree and put the original back.
    pub fn restore(mut self) -> Result<(), GtaError> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> Result<(), GtaError> {
        if self.state == GuardState::Restored {
            return Ok(());
        }

        gta_util::fs::remove_dir_if_exists(&self.vendor).map_err(|e| {
            GtaError::VendorRestoreFailed {
                message: format!("cannot remove {}: {e}", self.vendor.display()),
            }
        })?;

        if self.state == GuardState::BackedUp {
            std::fs::rename(&self.backup, &self.vendor).map_err(|e| {
                GtaError::VendorRestoreFailed {
                    message: format!(
                        "cannot move {} back to {}: {e}",
                        self.backup.display(),
                        self.vendor.display()
                    ),
                }
            })?;
            tracing::debug!("restored {}", self.vendor.display());
        }
        // Only a completed restore is final; a failed one is retried on drop.
        self.state = GuardState::Restored;
        Ok(())
    }
}

impl Drop for VendorGuard {
    fn drop(&mut self) {
        if self.state != GuardState::Restored {
            if let Err(e) = self.restore_inner() {
                tracing::error!("{e}");
            }
        }
    }
}
