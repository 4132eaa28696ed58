//! CLI argument definitions for the ns-3 bridge installer.
//!
//! Every flag is optional: a bare invocation fetches, builds, and seeds the
//! release in the current directory with no further configuration.

use crate::pipeline::InstallOptions;
use crate::sha256_digest::{Sha256Digest, parse_sha256};
use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Install the ns-3 all-in-one release and seed its scratch directory with
/// local bridge code.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ns3-bridge-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the ns-3 all-in-one release and seed its scratch directory.\n\n",
    "Downloads ns-allinone-3.44.tar.bz2 from nsnam.org, unpacks it, runs ",
    "build.py --enable-examples --enable-tests, then copies every entry of ",
    "the local ns3/ directory into ns-allinone-3.44/ns-3.44/scratch/.\n\n",
    "The first failing step stops the run. Nothing is retried or rolled back.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install into the current directory:\n",
    "    $ ns3-bridge-installer\n\n",
    "  Install into another workspace and pin the archive digest:\n",
    "    $ ns3-bridge-installer -C ~/sim --expected-sha256 <HEX>\n\n",
    "  Preview the plan:\n",
    "    $ ns3-bridge-installer --dry-run",
))]
pub struct Cli {
    /// Workspace root holding ns3/ [default: current directory].
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workspace: Option<Utf8PathBuf>,

    /// Abort unless the downloaded archive has this SHA-256 digest.
    #[arg(long, value_name = "HEX", value_parser = parse_sha256)]
    pub expected_sha256: Option<Sha256Digest>,

    /// Show the resolved plan and exit without side effects.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Log level implied by the verbosity count.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use log::LevelFilter;
    /// use ns3_bridge_installer::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["ns3-bridge-installer", "-vv"]);
    /// assert_eq!(cli.log_level(), LevelFilter::Debug);
    /// ```
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Pipeline options derived from the flags.
    #[must_use]
    pub fn install_options(&self) -> InstallOptions {
        InstallOptions {
            expected_sha256: self.expected_sha256.clone(),
            quiet: self.quiet,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
