//! Core data types for gta.
//!
//! This crate defines the vocabulary shared by the resolver and the sweep
//! engine: dependency versions and their kinds, version constraints, the
//! project manifest and lockfile, global configuration, and the workspace
//! layout used to derive a project's import root.
//!
//! This crate is intentionally free of async code and process spawning.

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "Gta.toml";

/// File name of the project lockfile.
pub const LOCK_FILE: &str = "Gta.lock";

pub mod config;
pub mod constraint;
pub mod lockfile;
pub mod manifest;
pub mod version;
pub mod workspace;
