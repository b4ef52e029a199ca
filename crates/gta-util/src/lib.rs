//! Shared utilities for gta.
//!
//! This crate provides cross-cutting concerns used by all other gta crates:
//! error types, filesystem helpers, tree hashing, process spawning, and
//! terminal status output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod process;
pub mod progress;
