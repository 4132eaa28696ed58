//! Install pipeline orchestration.
//!
//! Runs fetch → extract → build → deploy against an [`InstallLayout`],
//! stopping at the first failing stage. Nothing is retried or rolled back: a
//! failed run leaves the workspace exactly as the failing stage left it.

use crate::build_driver::{BuildDriver, ScriptBuildDriver, check_status};
use crate::deploy::deploy_bridge;
use crate::error::{InstallerError, Result};
use crate::extraction::{ArchiveExtractor, ExtractionError, TarExtractor};
use crate::fetch::{ArchiveFetcher, FetchError, HttpFetcher};
use crate::layout::InstallLayout;
use crate::output::{
    completion_message, install_complete_message, unpack_complete_message, write_line,
};
use crate::release::BUILD_FLAGS;
use crate::sha256_digest::{Sha256Digest, compute_sha256};
use crate::stage::{PipelineState, Stage};
use log::{debug, info, warn};
use std::io::Write;

/// Run-time switches for one installation.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Verify the downloaded archive against this digest before extracting.
    pub expected_sha256: Option<Sha256Digest>,
    /// Suppress progress output.
    pub quiet: bool,
}

/// External collaborators used by the pipeline.
pub struct Collaborators<'a> {
    /// Downloads the release archive.
    pub fetcher: &'a dyn ArchiveFetcher,
    /// Unpacks the release archive.
    pub extractor: &'a dyn ArchiveExtractor,
    /// Runs the package's build entry point.
    pub build_driver: &'a dyn BuildDriver,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Bytes downloaded.
    pub archive_bytes: u64,
    /// Archive entries unpacked.
    pub extracted_entries: usize,
    /// Bridge bytes copied into the scratch directory.
    pub deployed_bytes: u64,
    /// Final pipeline state; always [`PipelineState::Done`].
    pub state: PipelineState,
}

/// Run the full pipeline with the production HTTP fetcher, tar extractor,
/// and `build.py` driver.
///
/// # Errors
///
/// Returns the first stage failure.
pub fn run_install(
    layout: &InstallLayout,
    options: &InstallOptions,
    stdout: &mut dyn Write,
) -> Result<InstallReport> {
    let collaborators = Collaborators {
        fetcher: &HttpFetcher,
        extractor: &TarExtractor,
        build_driver: &ScriptBuildDriver,
    };
    run_install_with(layout, options, &collaborators, stdout)
}

/// Testable inner function with injected collaborators.
///
/// The production entry point [`run_install`] delegates here; tests inject
/// stubs and mocks.
///
/// # Errors
///
/// Returns the first stage failure.
pub fn run_install_with(
    layout: &InstallLayout,
    options: &InstallOptions,
    collaborators: &Collaborators<'_>,
    stdout: &mut dyn Write,
) -> Result<InstallReport> {
    let mut tracker = StageTracker::default();

    tracker.enter(Stage::Fetch);
    let archive_bytes = tracker.complete(fetch_archive(layout, options, collaborators.fetcher))?;

    tracker.enter(Stage::Extract);
    let extracted_entries = tracker.complete(extract_archive(layout, collaborators.extractor))?;
    report(options, stdout, unpack_complete_message(layout));

    tracker.enter(Stage::Build);
    tracker.complete(build_package(layout, collaborators.build_driver))?;
    report(options, stdout, install_complete_message(layout));

    tracker.enter(Stage::Deploy);
    let deployed_bytes = tracker.complete(deploy(layout))?;
    report(options, stdout, completion_message(&layout.scratch_dir()));

    Ok(InstallReport {
        archive_bytes,
        extracted_entries,
        deployed_bytes,
        state: tracker.state,
    })
}

fn report(options: &InstallOptions, stdout: &mut dyn Write, message: String) {
    if !options.quiet {
        write_line(stdout, message);
    }
}

/// Tracks the pipeline state across stage boundaries.
#[derive(Debug, Default)]
struct StageTracker {
    state: PipelineState,
}

impl StageTracker {
    fn enter(&self, stage: Stage) {
        debug_assert_eq!(self.state, PipelineState::Active(stage));
        info!("{stage} stage started");
    }

    fn complete<T>(&mut self, result: Result<T>) -> Result<T> {
        self.state = match &result {
            Ok(_) => self.state.advance(),
            Err(_) => self.state.fail(),
        };
        debug!("pipeline state: {}", self.state);
        result
    }
}

/// Download the archive and, when requested, verify its digest.
fn fetch_archive(
    layout: &InstallLayout,
    options: &InstallOptions,
    fetcher: &dyn ArchiveFetcher,
) -> Result<u64> {
    let url = layout.release().url();
    let archive_path = layout.archive_path();
    info!("downloading {url} to {archive_path}");

    let bytes = fetcher.fetch(&url, archive_path.as_std_path())?;

    match &options.expected_sha256 {
        Some(expected) => {
            let actual = compute_sha256(archive_path.as_std_path()).map_err(FetchError::Io)?;
            debug!("archive SHA-256: {actual}");
            if &actual != expected {
                return Err(InstallerError::ChecksumMismatch {
                    path: archive_path,
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        None => debug!("no expected SHA-256 given; archive integrity is not checked"),
    }

    Ok(bytes)
}

/// Unpack the archive into the workspace root, then delete it.
fn extract_archive(layout: &InstallLayout, extractor: &dyn ArchiveExtractor) -> Result<usize> {
    let archive_path = layout.archive_path();
    let package_root = layout.package_root();
    if package_root.exists() {
        warn!("{package_root} already exists; extracting over it");
    }

    let entries = extractor.extract(
        archive_path.as_std_path(),
        layout.workspace_root().as_std_path(),
    )?;
    info!("unpacked {entries} entries into {}", layout.workspace_root());

    std::fs::remove_file(&archive_path).map_err(ExtractionError::Io)?;
    debug!("removed {archive_path}");
    Ok(entries)
}

/// Run the package's build driver and require a zero exit.
fn build_package(layout: &InstallLayout, build_driver: &dyn BuildDriver) -> Result<()> {
    let package_root = layout.package_root();
    let status = build_driver.build(package_root.as_std_path(), BUILD_FLAGS)?;
    check_status(status)?;
    Ok(())
}

/// Copy the bridge code into the scratch directory.
fn deploy(layout: &InstallLayout) -> Result<u64> {
    let source = layout.bridge_source();
    let destination = layout.scratch_dir();
    let bytes = deploy_bridge(&source, &destination)?;
    info!("copied {bytes} bytes from {source} to {destination}");
    Ok(bytes)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
