//! Release archive extraction.
//!
//! Unpacks compressed tar archives into a destination directory with path
//! traversal protection. The decoder is chosen from the archive's suffix; the
//! ns-3 releases ship as `.tar.bz2`, while gzip and zstd tarballs are accepted
//! for mirrors and locally repacked trees.

use log::trace;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};

/// Compression wrapped around the tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// bzip2 (`.tar.bz2`, `.tbz2`).
    TarBz2,
    /// gzip (`.tar.gz`, `.tgz`).
    TarGz,
    /// Zstandard (`.tar.zst`).
    TarZst,
}

impl ArchiveFormat {
    /// Detect the format from an archive filename.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::UnsupportedFormat`] for any other suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use ns3_bridge_installer::extraction::ArchiveFormat;
    /// use std::path::Path;
    ///
    /// let format = ArchiveFormat::from_path(Path::new("ns-allinone-3.44.tar.bz2"));
    /// assert_eq!(format.ok(), Some(ArchiveFormat::TarBz2));
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
            Ok(Self::TarBz2)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else if name.ends_with(".tar.zst") {
            Ok(Self::TarZst)
        } else {
            Err(ExtractionError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TarBz2 => "tar.bz2",
            Self::TarGz => "tar.gz",
            Self::TarZst => "tar.zst",
        };
        f.write_str(label)
    }
}

/// Trait for extracting release archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the number of entries unpacked. Existing files with colliding
    /// names are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::UnsupportedFormat`] for unknown suffixes,
    /// [`ExtractionError::PathTraversal`] if any entry attempts to escape the
    /// destination, [`ExtractionError::EmptyArchive`] if nothing was
    /// unpacked, and [`ExtractionError::Io`] on I/O or decode failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O or decompression error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive suffix does not name a supported compression.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The archive path.
        path: String,
    },

    /// The archive contains no entries.
    #[error("archive contains no entries")]
    EmptyArchive,
}

/// Default extractor using the `tar` crate over a suffix-selected decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarExtractor;

impl ArchiveExtractor for TarExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError> {
        let format = ArchiveFormat::from_path(archive_path)?;
        let file = File::open(archive_path)?;
        let reader: Box<dyn Read> = match format {
            ArchiveFormat::TarBz2 => Box::new(bzip2::read::BzDecoder::new(file)),
            ArchiveFormat::TarGz => Box::new(flate2::read::GzDecoder::new(file)),
            ArchiveFormat::TarZst => Box::new(zstd::Decoder::new(file)?),
        };
        unpack_entries(reader, dest_dir)
    }
}

fn unpack_entries(reader: impl Read, dest_dir: &Path) -> Result<usize, ExtractionError> {
    let mut archive = tar::Archive::new(reader);
    let mut unpacked = 0_usize;

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();

        validate_entry_path(&entry_path)?;

        // `unpack_in` resolves hard links against `dest_dir` and refuses to
        // write through symlinks that lead outside it.
        if !entry.unpack_in(dest_dir)? {
            return Err(ExtractionError::PathTraversal {
                path: entry_path.display().to_string(),
            });
        }
        trace!("unpacked {}", entry_path.display());
        unpacked += 1;
    }

    if unpacked == 0 {
        return Err(ExtractionError::EmptyArchive);
    }

    Ok(unpacked)
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir | Component::Prefix(_)) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}
