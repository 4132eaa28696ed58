//! Tests for installer CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

#[test]
fn cli_parses_defaults() {
    let cli = Cli::parse_from(["ns3-bridge-installer"]);
    assert!(cli.workspace.is_none());
    assert!(cli.expected_sha256.is_none());
    assert!(!cli.dry_run);
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[test]
fn bare_invocation_matches_default_options() {
    let cli = Cli::parse_from(["ns3-bridge-installer"]);
    let options = cli.install_options();
    assert!(options.expected_sha256.is_none());
    assert!(!options.quiet);
}

#[test]
fn cli_parses_workspace() {
    let cli = Cli::parse_from(["ns3-bridge-installer", "-C", "/tmp/sim"]);
    assert_eq!(cli.workspace, Some(Utf8PathBuf::from("/tmp/sim")));
}

#[test]
fn cli_normalises_expected_digest() {
    let hex = "AB".repeat(32);
    let cli = Cli::parse_from(["ns3-bridge-installer", "--expected-sha256", &hex]);
    let digest = cli.expected_sha256.expect("digest parsed");
    assert_eq!(digest.as_str(), "ab".repeat(32));
}

#[test]
fn cli_rejects_malformed_digest() {
    let result = Cli::try_parse_from(["ns3-bridge-installer", "--expected-sha256", "abc"]);
    assert!(result.is_err());
}

#[rstest]
#[case::none(&["ns3-bridge-installer"], LevelFilter::Warn)]
#[case::one(&["ns3-bridge-installer", "-v"], LevelFilter::Info)]
#[case::two(&["ns3-bridge-installer", "-vv"], LevelFilter::Debug)]
#[case::many(&["ns3-bridge-installer", "-vvvv"], LevelFilter::Trace)]
fn verbosity_maps_to_log_level(#[case] args: &[&str], #[case] expected: LevelFilter) {
    let cli = Cli::parse_from(args);
    assert_eq!(cli.log_level(), expected);
}

#[test]
fn quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["ns3-bridge-installer", "-q", "-v"]);
    assert!(result.is_err());
}

#[test]
fn quiet_flows_into_install_options() {
    let cli = Cli::parse_from(["ns3-bridge-installer", "--quiet"]);
    assert!(cli.install_options().quiet);
}
