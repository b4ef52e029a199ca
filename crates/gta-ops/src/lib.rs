//! The gta sweep engine.
//!
//! [`ops_sweep::sweep`] drives one dependency across every candidate version:
//! the [`catalog`] filters versions, [`solve`] resolves them on a bounded
//! worker pool, and each solution is written by [`materialize`], checked by
//! [`verify`] and recorded by [`report`]. The project's own vendor tree is
//! protected by [`vendor::VendorGuard`] for the whole run.

pub mod catalog;
pub mod materialize;
pub mod ops_sweep;
pub mod report;
pub mod solve;
pub mod vendor;
pub mod verify;
