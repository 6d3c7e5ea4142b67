//! Run-level error type.

use crate::{InstallError, MaterializeError, ProbeError, ToolKind};
use thiserror::Error;

/// Fatal errors that abort a bootstrap run.
///
/// Every variant maps to a one-line cause printed with an `ERROR:` prefix and
/// a non-zero exit code (see [`BootstrapError::exit_code`]).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    /// Invalid command-line usage.
    #[error("{0}")]
    Usage(String),

    /// The home directory could not be determined.
    #[error("cannot determine the home directory")]
    NoHome,

    /// An environment setting has an unusable value.
    #[error("invalid value for {name}: {value:?}")]
    InvalidSetting {
        /// Variable name.
        name: String,
        /// Rejected value.
        value: String,
    },

    /// A required tool is missing and installs are disabled.
    #[error("{tool} is missing or too old and installs are disabled (--no-install)")]
    PreconditionUnmet {
        /// The unsatisfied tool.
        tool: ToolKind,
    },

    /// Probing a tool failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// No install strategy succeeded.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// The installer reported success but the tool is still unsatisfied.
    #[error("{tool} is still unsatisfied after installing it with {strategy}")]
    InstallVerificationFailed {
        /// The tool that was installed.
        tool: ToolKind,
        /// Description of the strategy that reported success.
        strategy: String,
    },

    /// A substitution override failed validation.
    #[error("{name}={value:?} is not an existing directory")]
    InvalidSubstitution {
        /// Variable name.
        name: String,
        /// Rejected value.
        value: String,
    },

    /// A config file could not be materialized.
    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    /// The final verification found tools that are still unsatisfied.
    #[error("tools unsatisfied at end of run: {}", join(.tools))]
    PostconditionUnmet {
        /// Every tool that failed the final check.
        tools: Vec<ToolKind>,
    },
}

fn join(tools: &[ToolKind]) -> String {
    tools
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl BootstrapError {
    /// Process exit code for this error: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }

    /// Get an actionable suggestion for fixing this error.
    pub fn fix_suggestion(&self) -> String {
        match self {
            Self::Usage(_) => "Run with --help for usage".to_string(),
            Self::NoHome => "Set HOME to your home directory".to_string(),
            Self::InvalidSetting { name, .. } => format!("Set {name} to a major version number"),
            Self::PreconditionUnmet { tool } => {
                format!("Install {tool} or rerun without --no-install")
            }
            Self::Probe(e) => e.fix_suggestion(),
            Self::Install(e) => e.fix_suggestion().to_string(),
            Self::InstallVerificationFailed { tool, .. } => {
                format!("Check that the installed {tool} is on PATH and rerun")
            }
            Self::InvalidSubstitution { name, .. } => {
                format!("Point {name} at an existing directory or unset it")
            }
            Self::Materialize(e) => e.fix_suggestion(),
            Self::PostconditionUnmet { .. } => {
                "Check the installer output above and your PATH".to_string()
            }
        }
    }
}
