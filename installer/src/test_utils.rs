//! Shared test utilities for the installer crate.

use crate::build_driver::{BuildDriver, BuildError};
use crate::fetch::{ArchiveFetcher, FetchError};
use crate::release::{BUILD_SCRIPT, Ns3Release, SCRATCH_DIR};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Name of the sample file placed in the fixture's scratch directory.
pub const FIXTURE_SCRATCH_FILE: &str = "scratch-simulator.cc";

/// Build a `.tar.bz2` shaped like an ns-3 all-in-one release.
///
/// The archive holds `<package>/build.py` (executable) and
/// `<package>/<simulator>/scratch/scratch-simulator.cc`.
///
/// # Panics
///
/// Panics if the in-memory archive cannot be written.
#[must_use]
pub fn fixture_archive(release: &Ns3Release) -> Vec<u8> {
    let package = release.package_dir_name();
    let scratch = format!(
        "{package}/{}/{SCRATCH_DIR}",
        release.simulator_dir_name()
    );

    let encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    append_dir(&mut builder, &format!("{package}/"));
    append_file(
        &mut builder,
        &format!("{package}/{BUILD_SCRIPT}"),
        b"#!/bin/sh\nexit 0\n",
        0o755,
    );
    append_dir(&mut builder, &format!("{scratch}/"));
    append_file(
        &mut builder,
        &format!("{scratch}/{FIXTURE_SCRATCH_FILE}"),
        b"int main() { return 0; }\n",
        0o644,
    );
    builder
        .into_inner()
        .expect("finish fixture tar stream")
        .finish()
        .expect("finish fixture bzip2 stream")
}

fn append_dir<W: Write>(builder: &mut tar::Builder<W>, path: &str) {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    builder
        .append_data(&mut header, path, std::io::empty())
        .expect("append fixture directory");
}

fn append_file<W: Write>(builder: &mut tar::Builder<W>, path: &str, contents: &[u8], mode: u32) {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(mode);
    builder
        .append_data(&mut header, path, contents)
        .expect("append fixture file");
}

/// A fetcher that writes fixed bytes instead of touching the network.
#[derive(Debug)]
pub struct FixtureFetcher {
    bytes: Vec<u8>,
    calls: RefCell<Vec<String>>,
}

impl FixtureFetcher {
    /// Serve `bytes` for every fetch.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ArchiveFetcher for FixtureFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        self.calls.borrow_mut().push(url.to_owned());
        std::fs::write(dest, &self.bytes)?;
        Ok(self.bytes.len() as u64)
    }
}

/// A fetcher that always fails as an unreachable host would.
#[derive(Debug, Default)]
pub struct UnreachableFetcher;

impl ArchiveFetcher for UnreachableFetcher {
    fn fetch(&self, url: &str, _dest: &Path) -> Result<u64, FetchError> {
        Err(FetchError::Http {
            url: url.to_owned(),
            reason: "dns failed: host not found".to_owned(),
        })
    }
}

/// One recorded build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCall {
    /// Directory the build ran in.
    pub package_root: PathBuf,
    /// Flags passed through.
    pub flags: Vec<String>,
}

/// A stub implementation of [`BuildDriver`] for testing.
///
/// Records each invocation and answers with a fixed exit code, allowing tests
/// to drive the build stage without running the real build tooling.
#[derive(Debug)]
pub struct StubBuildDriver {
    exit_code: i32,
    calls: RefCell<Vec<BuildCall>>,
}

impl StubBuildDriver {
    /// A driver that exits with `exit_code`.
    #[must_use]
    pub fn exiting_with(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A driver that succeeds.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::exiting_with(0)
    }

    /// Invocations recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.borrow().clone()
    }
}

impl BuildDriver for StubBuildDriver {
    fn build(&self, package_root: &Path, flags: &[&str]) -> Result<ExitStatus, BuildError> {
        self.calls.borrow_mut().push(BuildCall {
            package_root: package_root.to_path_buf(),
            flags: flags.iter().map(|&f| f.to_owned()).collect(),
        });
        Ok(exit_status(self.exit_code))
    }
}
