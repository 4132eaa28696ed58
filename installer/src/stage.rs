//! Pipeline stages and the linear state machine that sequences them.
//!
//! The run moves `Fetch → Extract → Build → Deploy → Done`. Any active stage
//! may fail into `Failed`, which, like `Done`, is absorbing.

use std::fmt;

/// One of the four installer stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Download the release archive.
    Fetch,
    /// Unpack the archive and remove it.
    Extract,
    /// Run the package's build driver.
    Build,
    /// Copy the bridge code into the scratch directory.
    Deploy,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Self; 4] = [Self::Fetch, Self::Extract, Self::Build, Self::Deploy];

    /// The stage that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Fetch => Some(Self::Extract),
            Self::Extract => Some(Self::Build),
            Self::Build => Some(Self::Deploy),
            Self::Deploy => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Fetch => "fetch",
            Self::Extract => "extract",
            Self::Build => "build",
            Self::Deploy => "deploy",
        };
        f.write_str(label)
    }
}

/// Where a pipeline run currently stands.
///
/// # Examples
///
/// ```
/// use ns3_bridge_installer::stage::{PipelineState, Stage};
///
/// let state = PipelineState::default();
/// assert_eq!(state, PipelineState::Active(Stage::Fetch));
/// assert_eq!(state.fail(), PipelineState::Failed(Stage::Fetch));
/// assert_eq!(state.fail().advance(), PipelineState::Failed(Stage::Fetch));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// The given stage is running.
    Active(Stage),
    /// Every stage succeeded.
    Done,
    /// The given stage failed; no later stage ran.
    Failed(Stage),
}

impl PipelineState {
    /// Transition after the active stage succeeded.
    ///
    /// Terminal states are returned unchanged.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Active(stage) => match stage.next() {
                Some(next) => Self::Active(next),
                None => Self::Done,
            },
            terminal => terminal,
        }
    }

    /// Transition after the active stage failed.
    ///
    /// Terminal states are returned unchanged.
    #[must_use]
    pub const fn fail(self) -> Self {
        match self {
            Self::Active(stage) => Self::Failed(stage),
            terminal => terminal,
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Active(Stage::Fetch)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active(stage) => write!(f, "{stage}ing"),
            Self::Done => f.write_str("done"),
            Self::Failed(stage) => write!(f, "failed during {stage}"),
        }
    }
}
