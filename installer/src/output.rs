//! User-facing progress text.
//!
//! Progress goes to stdout at fixed checkpoints; diagnostics belong to the
//! `log` facade. Writes are best-effort and never fail a run.

use crate::layout::InstallLayout;
use crate::release::BUILD_FLAGS;
use crate::sha256_digest::Sha256Digest;
use camino::Utf8Path;
use std::io::Write;

/// Checkpoint printed once the archive is downloaded and unpacked.
#[must_use]
pub fn unpack_complete_message(layout: &InstallLayout) -> String {
    format!(
        "{} download/unpack complete",
        layout.release().package_dir_name()
    )
}

/// Checkpoint printed once the build driver succeeds.
#[must_use]
pub fn install_complete_message(layout: &InstallLayout) -> String {
    format!("{} installation completed", layout.release())
}

/// Final message printed after the bridge code is deployed.
#[must_use]
pub fn completion_message(scratch_dir: &Utf8Path) -> String {
    format!("Bridge code copied to {scratch_dir}; setup complete")
}

/// Plan shown by `--dry-run`.
///
/// # Example
///
/// ```
/// use ns3_bridge_installer::layout::InstallLayout;
/// use ns3_bridge_installer::output::DryRunInfo;
/// use ns3_bridge_installer::release::Ns3Release;
///
/// let layout = InstallLayout::new("/work", Ns3Release::default());
/// let info = DryRunInfo { layout: &layout, expected_sha256: None };
/// assert!(info.display_text().contains("--enable-examples --enable-tests"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Resolved workspace layout.
    pub layout: &'a InstallLayout,
    /// Digest the archive would be checked against.
    pub expected_sha256: Option<&'a Sha256Digest>,
}

impl DryRunInfo<'_> {
    /// Format the plan for display to the user.
    #[must_use]
    pub fn display_text(&self) -> String {
        let layout = self.layout;
        let checksum = self
            .expected_sha256
            .map_or_else(|| "not checked".to_owned(), ToString::to_string);
        let lines = [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Workspace root: {}", layout.workspace_root()),
            format!("Download URL: {}", layout.release().url()),
            format!("Archive: {}", layout.archive_path()),
            format!("Expected SHA-256: {checksum}"),
            format!("Package root: {}", layout.package_root()),
            format!(
                "Build command: {} {}",
                layout.build_script(),
                BUILD_FLAGS.join(" ")
            ),
            format!("Bridge source: {}", layout.bridge_source()),
            format!("Bridge destination: {}", layout.scratch_dir()),
        ];
        lines.join("\n")
    }
}

/// Write one line, ignoring write failures.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Ns3Release;

    fn layout() -> InstallLayout {
        InstallLayout::new("/work", Ns3Release::default())
    }

    #[test]
    fn checkpoints_carry_fixed_phrases() {
        let layout = layout();
        assert_eq!(
            unpack_complete_message(&layout),
            "ns-allinone-3.44 download/unpack complete"
        );
        assert_eq!(
            install_complete_message(&layout),
            "ns-3.44 installation completed"
        );
        assert!(completion_message(&layout.scratch_dir()).contains("ns-3.44/scratch"));
    }

    #[test]
    fn dry_run_lists_every_path() {
        let layout = layout();
        let text = DryRunInfo {
            layout: &layout,
            expected_sha256: None,
        }
        .display_text();

        assert!(text.contains("https://www.nsnam.org/releases/ns-allinone-3.44.tar.bz2"));
        assert!(text.contains("/work/ns-allinone-3.44/build.py --enable-examples"));
        assert!(text.contains("Bridge source: /work/ns3"));
        assert!(text.contains("Expected SHA-256: not checked"));
    }

    #[test]
    fn dry_run_shows_requested_digest() {
        let layout = layout();
        let digest = Sha256Digest::try_from("c".repeat(64)).expect("valid digest");
        let text = DryRunInfo {
            layout: &layout,
            expected_sha256: Some(&digest),
        }
        .display_text();
        assert!(text.contains(&"c".repeat(64)));
    }

    #[test]
    fn write_line_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, "hello");
        assert_eq!(out, b"hello\n");
    }
}
