//! Error types for installation operations.
//!
//! This module defines the error types that can occur while installing a
//! tool. Each error variant includes an actionable fix suggestion to help
//! users resolve the issue.

use crate::ToolKind;
use thiserror::Error;

/// Errors that can occur during tool installation.
///
/// Every variant except [`InstallError::NoViableStrategy`] describes the
/// failure of a single strategy; the installer records it and moves on to
/// the next one.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::InstallError;
///
/// fn handle_error(error: InstallError) {
///     eprintln!("Installation failed: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    /// A program the strategy drives is not available.
    #[error("missing prerequisite: {program}")]
    PrerequisiteMissing {
        /// Program that could not be resolved (e.g., "apt-get").
        program: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The strategy needs root, the process is not root, and no
    /// escalation tool is available.
    #[error("privilege escalation unavailable for {strategy}")]
    PrivilegeUnavailable {
        /// Description of the strategy that needed privileges.
        strategy: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A network error occurred while the installer ran.
    #[error("network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
        /// Standard error output from the failed command, if available.
        stderr: Option<String>,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Permission was denied while spawning the installer.
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Description of what permission was denied.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The installer process failed.
    #[error("installation failed: {message}")]
    InstallerFailed {
        /// Description of the failure.
        message: String,
        /// Exit code from the installer, if available.
        exit_code: Option<i32>,
        /// Standard error from the installer, if available.
        stderr: Option<String>,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Every strategy for the tool was tried and none succeeded.
    #[error("no viable install strategy for {tool} ({} attempted)", .attempts.len())]
    NoViableStrategy {
        /// The tool being installed.
        tool: ToolKind,
        /// One line per attempted strategy: description and failure.
        attempts: Vec<String>,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl InstallError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use agent_bootstrap::InstallError;
    ///
    /// let error = InstallError::PrivilegeUnavailable {
    ///     strategy: "apt-get install of nodejs".to_string(),
    ///     fix: "Run as root or install sudo".to_string(),
    /// };
    /// assert!(error.fix_suggestion().contains("sudo"));
    /// ```
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::PrerequisiteMissing { fix, .. } => fix,
            Self::PrivilegeUnavailable { fix, .. } => fix,
            Self::Network { fix, .. } => fix,
            Self::PermissionDenied { fix, .. } => fix,
            Self::InstallerFailed { fix, .. } => fix,
            Self::NoViableStrategy { fix, .. } => fix,
        }
    }
}
