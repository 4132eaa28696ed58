//! Invocation of the package's own build entry point.
//!
//! The ns-3 build tooling is a black box: the installer spawns it with fixed
//! flags, lets it write straight to the terminal, and consumes nothing but its
//! exit status.

use crate::release::BUILD_SCRIPT;
use log::debug;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Abstraction over the third-party build driver.
pub trait BuildDriver {
    /// Run the build inside `package_root` with `flags`, returning the exit
    /// status unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Spawn`] when the driver cannot be started. A
    /// driver that starts and then fails is reported through the returned
    /// status, not as an error.
    fn build(&self, package_root: &Path, flags: &[&str]) -> Result<ExitStatus, BuildError>;
}

/// Errors arising from the build stage.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The build driver could not be spawned.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Path of the program that failed to start.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The build driver exited with a non-zero status.
    #[error("build driver exited with status {code}")]
    Exited {
        /// The driver's exit code.
        code: i32,
    },

    /// The build driver was terminated by a signal.
    #[error("build driver was terminated by a signal")]
    Terminated,
}

/// Runs `build.py` from the package root.
///
/// # Examples
///
/// ```no_run
/// use ns3_bridge_installer::build_driver::{BuildDriver, ScriptBuildDriver, check_status};
/// use ns3_bridge_installer::release::BUILD_FLAGS;
/// use std::path::Path;
///
/// let status = ScriptBuildDriver.build(Path::new("/work/ns-allinone-3.44"), BUILD_FLAGS)?;
/// check_status(status)?;
/// # Ok::<(), ns3_bridge_installer::build_driver::BuildError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptBuildDriver;

impl BuildDriver for ScriptBuildDriver {
    fn build(&self, package_root: &Path, flags: &[&str]) -> Result<ExitStatus, BuildError> {
        let program = package_root.join(BUILD_SCRIPT);
        debug!("running {} {}", program.display(), flags.join(" "));
        Command::new(&program)
            .args(flags)
            .current_dir(package_root)
            .status()
            .map_err(|source| BuildError::Spawn {
                program: program.display().to_string(),
                source,
            })
    }
}

/// Translate a non-success exit status into a [`BuildError`].
///
/// # Errors
///
/// Returns [`BuildError::Exited`] with the driver's code, or
/// [`BuildError::Terminated`] when no code is available.
pub fn check_status(status: ExitStatus) -> Result<(), BuildError> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(BuildError::Exited { code }),
        None => Err(BuildError::Terminated),
    }
}
