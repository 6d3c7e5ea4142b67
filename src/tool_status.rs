//! Tool status types representing probe results.

use semver::Version;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result of probing a tool.
///
/// A status is derived fresh on every probe and never cached; callers that
/// need to confirm an install simply probe again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolStatus {
    /// Whether the tool and all of its companion executables resolved.
    pub present: bool,

    /// Path to the primary executable, when it resolved.
    pub path: Option<PathBuf>,

    /// Version reported by the tool, when it could be extracted.
    pub version: Option<Version>,

    /// Whether the executable lives inside a version manager's private tree.
    ///
    /// Such installs work in the current shell but may vanish in a fresh one
    /// that has not sourced the version manager's hook.
    pub shadowed: bool,

    /// Companion executables that did not resolve.
    pub missing_companions: Vec<String>,
}

impl ToolStatus {
    /// Status of a tool whose executable could not be found.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Check whether the detected version meets a minimum major version.
    ///
    /// With no minimum, any present tool is sufficient. With a minimum, an
    /// unknown version is treated as insufficient.
    ///
    /// # Example
    ///
    /// ```rust
    /// use agent_bootstrap::ToolStatus;
    /// use semver::Version;
    /// use std::path::PathBuf;
    ///
    /// let status = ToolStatus {
    ///     present: true,
    ///     path: Some(PathBuf::from("/usr/bin/node")),
    ///     version: Some(Version::new(18, 19, 0)),
    ///     ..Default::default()
    /// };
    /// assert!(status.meets_minimum(Some(18)));
    /// assert!(!status.meets_minimum(Some(20)));
    /// ```
    pub fn meets_minimum(&self, min_major: Option<u64>) -> bool {
        if !self.present {
            return false;
        }
        match min_major {
            None => true,
            Some(min) => self.version.as_ref().is_some_and(|v| v.major >= min),
        }
    }

    /// Present, version-sufficient and not shadowed by a version manager.
    pub fn is_satisfied(&self, min_major: Option<u64>) -> bool {
        self.meets_minimum(min_major) && !self.shadowed
    }

    /// Path to the primary executable if available.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Hard failure while probing an executable that was already resolved.
///
/// "Not found" is never an error; it is reported as [`ToolStatus::absent`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// The executable exists but could not be run.
    #[error("permission denied running {}", path.display())]
    PermissionDenied {
        /// The executable that could not be run.
        path: PathBuf,
    },

    /// Spawning the executable failed for another reason.
    #[error("failed to run {}: {source}", path.display())]
    Io {
        /// The executable that could not be run.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    /// Actionable suggestion for resolving the error.
    pub fn fix_suggestion(&self) -> String {
        match self {
            Self::PermissionDenied { path } => {
                format!("Check the execute permission on {}", path.display())
            }
            Self::Io { path, .. } => {
                format!("Verify that {} is a working executable", path.display())
            }
        }
    }
}
