//! Workspace layout and path resolution.
//!
//! [`InstallLayout`] is the explicit workspace handle threaded through every
//! pipeline stage. Stages never consult the process's current directory; they
//! ask the layout for the path they need.

use crate::error::{InstallerError, Result};
use crate::release::{BRIDGE_DIR, BUILD_SCRIPT, Ns3Release, SCRATCH_DIR};
use camino::{Utf8Path, Utf8PathBuf};

/// Paths used by one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    workspace_root: Utf8PathBuf,
    release: Ns3Release,
}

impl InstallLayout {
    /// Create a layout rooted at `workspace_root` for the given release.
    ///
    /// # Examples
    ///
    /// ```
    /// use ns3_bridge_installer::layout::InstallLayout;
    /// use ns3_bridge_installer::release::Ns3Release;
    ///
    /// let layout = InstallLayout::new("/work", Ns3Release::default());
    /// assert_eq!(
    ///     layout.scratch_dir().as_str(),
    ///     "/work/ns-allinone-3.44/ns-3.44/scratch"
    /// );
    /// ```
    #[must_use]
    pub fn new(workspace_root: impl Into<Utf8PathBuf>, release: Ns3Release) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            release,
        }
    }

    /// Return the workspace root.
    #[must_use]
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Return the release this layout was derived for.
    #[must_use]
    pub fn release(&self) -> &Ns3Release {
        &self.release
    }

    /// Path the archive is downloaded to.
    #[must_use]
    pub fn archive_path(&self) -> Utf8PathBuf {
        self.workspace_root.join(self.release.archive_filename())
    }

    /// Top-level directory produced by extraction.
    #[must_use]
    pub fn package_root(&self) -> Utf8PathBuf {
        self.workspace_root.join(self.release.package_dir_name())
    }

    /// Build entry point inside the package root.
    #[must_use]
    pub fn build_script(&self) -> Utf8PathBuf {
        self.package_root().join(BUILD_SCRIPT)
    }

    /// Simulator source tree inside the package root.
    #[must_use]
    pub fn simulator_dir(&self) -> Utf8PathBuf {
        self.package_root().join(self.release.simulator_dir_name())
    }

    /// Destination of the bridge code.
    #[must_use]
    pub fn scratch_dir(&self) -> Utf8PathBuf {
        self.simulator_dir().join(SCRATCH_DIR)
    }

    /// Local bridge code directory, a sibling of the package root.
    #[must_use]
    pub fn bridge_source(&self) -> Utf8PathBuf {
        self.workspace_root.join(BRIDGE_DIR)
    }
}

/// Resolve the workspace root from an optional explicit directory.
///
/// An explicit directory is canonicalised so the build driver can be spawned
/// by absolute path. Without one, the process's current directory is used.
///
/// # Errors
///
/// Returns [`InstallerError::WorkspaceNotFound`] when the directory does not
/// exist or is not valid UTF-8.
pub fn resolve_workspace(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    match explicit {
        Some(dir) => dir
            .canonicalize_utf8()
            .map_err(|e| InstallerError::WorkspaceNotFound {
                reason: format!("{dir}: {e}"),
            }),
        None => {
            let cwd = std::env::current_dir()?;
            Utf8PathBuf::try_from(cwd).map_err(|e| InstallerError::WorkspaceNotFound {
                reason: format!("current directory is not valid UTF-8: {e}"),
            })
        }
    }
}
