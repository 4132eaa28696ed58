//! ns-3 bridge installer library.
//!
//! This crate downloads the pinned ns-3 all-in-one release, unpacks it, runs
//! its own build driver, and copies local bridge code into the simulator's
//! scratch directory. It is used by the `ns3-bridge-installer` binary and can
//! be driven programmatically with injected collaborators for testing.
//!
//! # Modules
//!
//! - [`build_driver`] - Invocation of the package's `build.py`
//! - [`cli`] - Command-line argument definitions
//! - [`deploy`] - Bridge code copy into the scratch directory
//! - [`error`] - Stage-aware error types and exit codes
//! - [`extraction`] - Compressed tarball extraction
//! - [`fetch`] - Release archive download
//! - [`layout`] - Workspace handle and derived paths
//! - [`output`] - Progress and dry-run text
//! - [`pipeline`] - Fail-fast stage orchestration
//! - [`release`] - Pinned release coordinates
//! - [`sha256_digest`] - Opt-in archive digest check
//! - [`stage`] - Stage enumeration and pipeline state machine

pub mod build_driver;
pub mod cli;
pub mod deploy;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod release;
pub mod sha256_digest;
pub mod stage;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
