//! Error types for the ns-3 bridge installer.
//!
//! Each stage owns its own error enum; [`InstallerError`] wraps them so the
//! pipeline can short-circuit with `?` and the binary can map the failure to
//! an exit code.

use crate::build_driver::BuildError;
use crate::deploy::DeployError;
use crate::extraction::ExtractionError;
use crate::fetch::FetchError;
use crate::sha256_digest::Sha256Digest;
use crate::stage::Stage;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Exit code used for every failure that does not carry its own.
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// Errors that can end an installer run.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The release archive could not be downloaded.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The downloaded archive does not match the requested digest.
    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The downloaded archive.
        path: Utf8PathBuf,
        /// Digest requested on the command line.
        expected: Sha256Digest,
        /// Digest of the bytes on disk.
        actual: Sha256Digest,
    },

    /// The archive could not be unpacked or removed.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractionError),

    /// The package's build driver failed.
    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    /// The bridge code could not be copied.
    #[error("deploy failed: {0}")]
    Deploy(#[from] DeployError),

    /// The workspace root could not be resolved.
    #[error("workspace not found: {reason}")]
    WorkspaceNotFound {
        /// Description of why the workspace was not found.
        reason: String,
    },

    /// An I/O operation outside any stage failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallerError {
    /// The stage this error ended, if it arose inside one.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Fetch(_) | Self::ChecksumMismatch { .. } => Some(Stage::Fetch),
            Self::Extract(_) => Some(Stage::Extract),
            Self::Build(_) => Some(Stage::Build),
            Self::Deploy(_) => Some(Stage::Deploy),
            Self::WorkspaceNotFound { .. } | Self::Io(_) => None,
        }
    }

    /// Process exit code for this failure.
    ///
    /// A build driver that exited non-zero lends the installer its own code;
    /// everything else exits with [`GENERIC_FAILURE_CODE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ns3_bridge_installer::build_driver::BuildError;
    /// use ns3_bridge_installer::error::InstallerError;
    ///
    /// let err = InstallerError::from(BuildError::Exited { code: 2 });
    /// assert_eq!(err.exit_code(), 2);
    /// ```
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Build(BuildError::Exited { code }) if *code != 0 => *code,
            _ => GENERIC_FAILURE_CODE,
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
