//! Bridge code deployment.
//!
//! Copies the local bridge directory into the simulator's scratch directory.
//! The copy merges: colliding names are overwritten and unrelated entries in
//! the destination are left alone.

use camino::{Utf8Path, Utf8PathBuf};
use fs_extra::dir::CopyOptions;

/// Errors arising from the deploy stage.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The bridge source directory does not exist.
    #[error("bridge source directory {path} does not exist")]
    SourceMissing {
        /// Expected source path.
        path: Utf8PathBuf,
    },

    /// The scratch directory does not exist.
    #[error("destination directory {path} does not exist")]
    DestinationMissing {
        /// Expected destination path.
        path: Utf8PathBuf,
    },

    /// The recursive copy failed part-way.
    #[error("failed to copy {from} into {to}: {source}")]
    Copy {
        /// Source directory.
        from: Utf8PathBuf,
        /// Destination directory.
        to: Utf8PathBuf,
        /// The underlying copy error.
        #[source]
        source: fs_extra::error::Error,
    },
}

/// Copy every entry of `source` into `destination`.
///
/// Neither directory is created; both must already exist. Returns the number
/// of bytes copied.
///
/// # Errors
///
/// Returns [`DeployError::SourceMissing`] or
/// [`DeployError::DestinationMissing`] when a directory is absent, and
/// [`DeployError::Copy`] when the copy itself fails.
pub fn deploy_bridge(source: &Utf8Path, destination: &Utf8Path) -> Result<u64, DeployError> {
    if !source.is_dir() {
        return Err(DeployError::SourceMissing {
            path: source.to_owned(),
        });
    }
    if !destination.is_dir() {
        return Err(DeployError::DestinationMissing {
            path: destination.to_owned(),
        });
    }

    let options = CopyOptions {
        overwrite: true,
        content_only: true,
        ..CopyOptions::new()
    };
    fs_extra::dir::copy(source, destination, &options).map_err(|source_err| DeployError::Copy {
        from: source.to_owned(),
        to: destination.to_owned(),
        source: source_err,
    })
}
