//! Release archive download.
//!
//! Provides a trait-based abstraction over the HTTP fetch so the pipeline can
//! be exercised without network access.

use log::debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Connect and response-header timeout for the release download.
///
/// The body itself is not bounded: the all-in-one tarball is large and slow
/// mirrors are common.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for downloading a remote archive to a local file.
///
/// # Examples
///
/// ```no_run
/// use ns3_bridge_installer::fetch::{ArchiveFetcher, HttpFetcher};
/// use std::path::Path;
///
/// let bytes = HttpFetcher.fetch(
///     "https://www.nsnam.org/releases/ns-allinone-3.44.tar.bz2",
///     Path::new("ns-allinone-3.44.tar.bz2"),
/// )?;
/// assert!(bytes > 0);
/// # Ok::<(), ns3_bridge_installer::fetch::FetchError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveFetcher {
    /// Download `url` into `dest`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails or the file cannot be written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// Errors arising from the archive download.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The transport failed or the server answered with an error status.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered 404.
    #[error("release archive not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// Writing the downloaded bytes failed.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP fetcher backed by `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = File::create(dest)?;
        let bytes = std::io::copy(&mut response.into_body().as_reader(), &mut file)
            .map_err(|e| map_body_error(url, e))?;
        file.flush()?;
        debug!("wrote {bytes} bytes to {}", dest.display());
        Ok(bytes)
    }
}

/// Shared `ureq` agent with timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(FETCH_TIMEOUT))
            .timeout_recv_response(Some(FETCH_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// Body reads surface transport resets as I/O errors; keep those distinct
/// from local write failures such as a full disk.
fn map_body_error(url: &str, err: std::io::Error) -> FetchError {
    match err.kind() {
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::TimedOut
        | std::io::ErrorKind::UnexpectedEof => FetchError::Http {
            url: url.to_owned(),
            reason: err.to_string(),
        },
        _ => FetchError::Io(err),
    }
}
