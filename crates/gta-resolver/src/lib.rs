//! Dependency resolution capabilities for gta.
//!
//! The sweep engine only sees the [`resolver::Resolver`] and
//! [`source::VersionSource`] traits. The registry-backed implementations
//! ([`resolver::IndexResolver`], [`source::RegistrySource`]) read dependency
//! indexes and source trees from the local cache.

pub mod conflict;
pub mod graph;
pub mod registry;
pub mod resolver;
pub mod source;

pub use resolver::{IndexResolver, ResolveError, Resolver, Solution, SolveRequest};
pub use source::{RegistrySource, SourceError, VersionSource};
