//! Release coordinates for the ns-3 all-in-one distribution.
//!
//! The installer targets one pinned release. Every name it derives (the
//! download URL, the archive filename, the extracted directory names) flows
//! from the version held by [`Ns3Release`], so tests can point the pipeline at
//! a differently-versioned fixture without touching the stages themselves.

use std::fmt;

/// The pinned ns-3 release version.
pub const NS3_VERSION: &str = "3.44";

/// Base URL of the ns-3 release downloads.
pub const RELEASE_BASE_URL: &str = "https://www.nsnam.org/releases";

/// Build entry point shipped at the root of the all-in-one package.
pub const BUILD_SCRIPT: &str = "build.py";

/// Flags passed verbatim to the build entry point.
pub const BUILD_FLAGS: &[&str] = &["--enable-examples", "--enable-tests"];

/// Local directory holding the bridge code, relative to the workspace root.
pub const BRIDGE_DIR: &str = "ns3";

/// Directory inside the simulator tree where user code is picked up.
pub const SCRATCH_DIR: &str = "scratch";

/// A versioned ns-3 all-in-one release.
///
/// # Examples
///
/// ```
/// use ns3_bridge_installer::release::Ns3Release;
///
/// let release = Ns3Release::default();
/// assert_eq!(release.package_dir_name(), "ns-allinone-3.44");
/// assert_eq!(
///     release.url(),
///     "https://www.nsnam.org/releases/ns-allinone-3.44.tar.bz2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ns3Release {
    version: String,
}

impl Ns3Release {
    /// Create a release descriptor for the given version string.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Return the version string (for example `3.44`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the top-level directory produced by extraction.
    #[must_use]
    pub fn package_dir_name(&self) -> String {
        format!("ns-allinone-{}", self.version)
    }

    /// Name of the simulator source tree inside the package.
    #[must_use]
    pub fn simulator_dir_name(&self) -> String {
        format!("ns-{}", self.version)
    }

    /// Filename the archive is downloaded to.
    #[must_use]
    pub fn archive_filename(&self) -> String {
        format!("{}.tar.bz2", self.package_dir_name())
    }

    /// Full download URL of the release archive.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{RELEASE_BASE_URL}/{}", self.archive_filename())
    }
}

impl Default for Ns3Release {
    fn default() -> Self {
        Self::new(NS3_VERSION)
    }
}

impl fmt::Display for Ns3Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns-{}", self.version)
    }
}
