//! Unit tests for install pipeline orchestration.

use super::*;
use crate::build_driver::BuildError;
use crate::extraction::MockArchiveExtractor;
use crate::fetch::{FetchError, MockArchiveFetcher};
use crate::release::Ns3Release;
use crate::test_utils::{
    FIXTURE_SCRATCH_FILE, FixtureFetcher, StubBuildDriver, UnreachableFetcher, fixture_archive,
    sha256_hex,
};
use camino::Utf8PathBuf;
use rstest::rstest;
use std::fs;

struct Workspace {
    _temp: tempfile::TempDir,
    layout: InstallLayout,
}

/// A temporary workspace holding an `ns3/` bridge directory.
fn workspace() -> Workspace {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
    let layout = InstallLayout::new(root, Ns3Release::default());
    let bridge = layout.bridge_source();
    fs::create_dir_all(bridge.join("include")).expect("create bridge dir");
    fs::write(bridge.join("carla-ns3-bridge.cc"), b"// bridge").expect("write bridge file");
    fs::write(bridge.join("include/bridge.h"), b"#pragma once").expect("write bridge header");
    Workspace {
        _temp: temp,
        layout,
    }
}

fn run(
    layout: &InstallLayout,
    options: &InstallOptions,
    fetcher: &dyn ArchiveFetcher,
    build_driver: &dyn BuildDriver,
) -> (Result<InstallReport>, String) {
    let collaborators = Collaborators {
        fetcher,
        extractor: &TarExtractor,
        build_driver,
    };
    let mut stdout = Vec::new();
    let result = run_install_with(layout, options, &collaborators, &mut stdout);
    (result, String::from_utf8(stdout).expect("stdout was not UTF-8"))
}

#[test]
fn happy_path_deploys_bridge_and_removes_archive() {
    let ws = workspace();
    let fetcher = FixtureFetcher::new(fixture_archive(ws.layout.release()));
    let driver = StubBuildDriver::succeeding();

    let (result, stdout) = run(&ws.layout, &InstallOptions::default(), &fetcher, &driver);

    let report = result.expect("pipeline should succeed");
    assert_eq!(report.state, PipelineState::Done);
    assert!(!ws.layout.archive_path().exists(), "archive must be removed");
    let scratch = ws.layout.scratch_dir();
    assert_eq!(
        fs::read(scratch.join("carla-ns3-bridge.cc")).expect("bridge file"),
        b"// bridge"
    );
    assert_eq!(
        fs::read(scratch.join("include/bridge.h")).expect("bridge header"),
        b"#pragma once"
    );
    assert!(scratch.join(FIXTURE_SCRATCH_FILE).is_file());
    assert!(stdout.contains("download/unpack complete"));
    assert!(stdout.contains("installation completed"));
    assert!(stdout.contains("setup complete"));
}

#[test]
fn happy_path_fetches_release_url_and_builds_with_fixed_flags() {
    let ws = workspace();
    let fetcher = FixtureFetcher::new(fixture_archive(ws.layout.release()));
    let driver = StubBuildDriver::succeeding();

    let (result, _) = run(&ws.layout, &InstallOptions::default(), &fetcher, &driver);
    result.expect("pipeline should succeed");

    assert_eq!(
        fetcher.requested_urls(),
        vec!["https://www.nsnam.org/releases/ns-allinone-3.44.tar.bz2"]
    );
    let calls = driver.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].package_root, ws.layout.package_root().as_std_path());
    assert_eq!(calls[0].flags, ["--enable-examples", "--enable-tests"]);
}

#[test]
fn quiet_mode_prints_nothing() {
    let ws = workspace();
    let fetcher = FixtureFetcher::new(fixture_archive(ws.layout.release()));
    let options = InstallOptions {
        quiet: true,
        ..InstallOptions::default()
    };

    let (result, stdout) = run(&ws.layout, &options, &fetcher, &StubBuildDriver::succeeding());

    result.expect("pipeline should succeed");
    assert!(stdout.is_empty());
}

#[test]
fn fetch_failure_stops_before_extraction() {
    let ws = workspace();
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();
    let driver = StubBuildDriver::succeeding();
    let collaborators = Collaborators {
        fetcher: &UnreachableFetcher,
        extractor: &extractor,
        build_driver: &driver,
    };
    let mut stdout = Vec::new();

    let err = run_install_with(
        &ws.layout,
        &InstallOptions::default(),
        &collaborators,
        &mut stdout,
    )
    .expect_err("fetch failure must abort");

    assert!(matches!(err, InstallerError::Fetch(FetchError::Http { .. })));
    assert_eq!(err.stage(), Some(Stage::Fetch));
    assert_ne!(err.exit_code(), 0);
    assert!(driver.calls().is_empty());
    assert!(!ws.layout.package_root().exists());
    assert!(stdout.is_empty());
}

#[test]
fn not_found_from_mocked_fetcher_is_reported() {
    let ws = workspace();
    let mut fetcher = MockArchiveFetcher::new();
    fetcher.expect_fetch().times(1).returning(|url, _dest| {
        Err(FetchError::NotFound {
            url: url.to_owned(),
        })
    });
    let driver = StubBuildDriver::succeeding();

    let (result, _) = run(&ws.layout, &InstallOptions::default(), &fetcher, &driver);

    let err = result.expect_err("404 must abort");
    assert!(matches!(err, InstallerError::Fetch(FetchError::NotFound { .. })));
    assert!(driver.calls().is_empty());
}

#[test]
fn corrupt_archive_fails_extraction_and_is_left_in_place() {
    let ws = workspace();
    let fetcher = FixtureFetcher::new(b"truncated download".to_vec());
    let driver = StubBuildDriver::succeeding();

    let (result, stdout) = run(&ws.layout, &InstallOptions::default(), &fetcher, &driver);

    let err = result.expect_err("corrupt archive must abort");
    assert_eq!(err.stage(), Some(Stage::Extract));
    assert!(ws.layout.archive_path().exists(), "no cleanup on failure");
    assert!(driver.calls().is_empty());
    assert!(stdout.is_empty());
}

#[rstest]
#[case::generic(1)]
#[case::configure_error(2)]
#[case::custom(42)]
fn build_failure_skips_deploy_and_propagates_code(#[case] code: i32) {
    let ws = workspace();
    let fetcher = FixtureFetcher::new(fixture_archive(ws.layout.release()));
    let driver = StubBuildDriver::exiting_with(code);

    let (result, stdout) = run(&ws.layout, &InstallOptions::default(), &fetcher, &driver);

    let err = result.expect_err("build failure must abort");
    assert!(matches!(err, InstallerError::Build(BuildError::Exited { .. })));
    assert_eq!(err.exit_code(), code);
    assert!(!ws.layout.scratch_dir().join("carla-ns3-bridge.cc").exists());
    assert!(stdout.contains("download/unpack complete"));
    assert!(!stdout.contains("installation completed"));
}

#[test]
fn missing_bridge_source_fails_deploy() {
    let ws = workspace();
    fs::remove_dir_all(ws.layout.bridge_source()).expect("remove bridge dir");
    let fetcher = FixtureFetcher::new(fixture_archive(ws.layout.release()));

    let (result, stdout) = run(
        &ws.layout,
        &InstallOptions::default(),
        &fetcher,
        &StubBuildDriver::succeeding(),
    );

    let err = result.expect_err("missing bridge dir must abort");
    assert_eq!(err.stage(), Some(Stage::Deploy));
    assert!(stdout.contains("installation completed"));
    assert!(!stdout.contains("setup complete"));
}

#[test]
fn matching_checksum_allows_install() {
    let ws = workspace();
    let archive = fixture_archive(ws.layout.release());
    let options = InstallOptions {
        expected_sha256: Some(
            Sha256Digest::try_from(sha256_hex(&archive)).expect("valid digest"),
        ),
        quiet: true,
    };
    let fetcher = FixtureFetcher::new(archive);

    let (result, _) = run(&ws.layout, &options, &fetcher, &StubBuildDriver::succeeding());

    result.expect("matching digest should pass");
}

#[test]
fn checksum_mismatch_aborts_before_extraction() {
    let ws = workspace();
    let options = InstallOptions {
        expected_sha256: Some(Sha256Digest::try_from("0".repeat(64)).expect("valid digest")),
        quiet: true,
    };
    let fetcher = FixtureFetcher::new(fixture_archive(ws.layout.release()));
    let driver = StubBuildDriver::succeeding();

    let (result, _) = run(&ws.layout, &options, &fetcher, &driver);

    let err = result.expect_err("mismatch must abort");
    assert!(matches!(err, InstallerError::ChecksumMismatch { .. }));
    assert!(!ws.layout.package_root().exists());
    assert!(driver.calls().is_empty());
}

#[test]
fn rerun_over_existing_tree_overwrites_cleanly() {
    let ws = workspace();
    let release = ws.layout.release().clone();
    let driver = StubBuildDriver::succeeding();

    let first = FixtureFetcher::new(fixture_archive(&release));
    let (result, _) = run(&ws.layout, &InstallOptions::default(), &first, &driver);
    result.expect("first run should succeed");

    let scratch_file = ws.layout.scratch_dir().join(FIXTURE_SCRATCH_FILE);
    fs::write(&scratch_file, b"local edit").expect("edit extracted file");

    let second = FixtureFetcher::new(fixture_archive(&release));
    let (result, _) = run(&ws.layout, &InstallOptions::default(), &second, &driver);

    let report = result.expect("second run should succeed");
    assert_eq!(report.state, PipelineState::Done);
    assert_eq!(
        fs::read(&scratch_file).expect("re-extracted file"),
        b"int main() { return 0; }\n"
    );
    assert!(!ws.layout.archive_path().exists());
    assert_eq!(driver.calls().len(), 2);
}

#[test]
fn stage_tracker_fails_into_absorbing_state() {
    let mut tracker = StageTracker::default();
    tracker.enter(Stage::Fetch);
    let failed: Result<()> = Err(InstallerError::WorkspaceNotFound {
        reason: "test".to_owned(),
    });
    assert!(tracker.complete(failed).is_err());
    assert_eq!(tracker.state, PipelineState::Failed(Stage::Fetch));

    let later: Result<()> = Ok(());
    assert!(tracker.complete(later).is_ok());
    assert_eq!(tracker.state, PipelineState::Failed(Stage::Fetch));
}
