//! ns-3 bridge installer CLI entrypoint.
//!
//! Fetches and builds the pinned ns-3 all-in-one release, then copies the
//! local `ns3/` bridge code into its scratch directory. Progress goes to
//! stdout; logs and the failing error go to stderr.

use clap::Parser;
use log::LevelFilter;
use ns3_bridge_installer::cli::Cli;
use ns3_bridge_installer::error::Result;
use ns3_bridge_installer::layout::{InstallLayout, resolve_workspace};
use ns3_bridge_installer::output::{DryRunInfo, write_line};
use ns3_bridge_installer::pipeline::run_install;
use ns3_bridge_installer::release::Ns3Release;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Initialise `env_logger`; `RUST_LOG` overrides the flag-derived level.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let workspace_root = resolve_workspace(cli.workspace.as_deref())?;
    let layout = InstallLayout::new(workspace_root, Ns3Release::default());

    if cli.dry_run {
        let info = DryRunInfo {
            layout: &layout,
            expected_sha256: cli.expected_sha256.as_ref(),
        };
        write_line(stdout, info.display_text());
        return Ok(());
    }

    run_install(&layout, &cli.install_options(), stdout)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format!("error: {err}"));
            err.exit_code()
        }
    }
}
