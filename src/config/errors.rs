//! Error types for config materialization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while materializing a config file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MaterializeError {
    /// The local template does not exist and no remote source was configured.
    #[error("template not found: {}", path.display())]
    TemplateMissing {
        /// Where the template was expected.
        path: PathBuf,
    },

    /// A template URL is not an HTTPS URL.
    #[error("refusing to fetch template from {url}: {reason}")]
    InsecureUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Fetching a remote template failed.
    #[error("failed to fetch template {url}: {message}")]
    FetchFailed {
        /// The URL that failed.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// Reading a template or writing the config failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being done (e.g., "writing").
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl MaterializeError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Actionable suggestion for resolving the error.
    pub fn fix_suggestion(&self) -> String {
        match self {
            Self::TemplateMissing { .. } => {
                "Set TEMPLATE_DIR to a directory with the templates, or TEMPLATE_BASE_URL to fetch them"
                    .to_string()
            }
            Self::InsecureUrl { .. } => "Use an https:// TEMPLATE_BASE_URL".to_string(),
            Self::FetchFailed { .. } => {
                "Check TEMPLATE_BASE_URL and your network connection".to_string()
            }
            Self::Io { path, .. } => format!("Check permissions on {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_missing_display() {
        let err = MaterializeError::TemplateMissing {
            path: PathBuf::from("/work/templates/codex-config.toml"),
        };
        assert_eq!(
            err.to_string(),
            "template not found: /work/templates/codex-config.toml"
        );
        assert!(err.fix_suggestion().contains("TEMPLATE_DIR"));
    }

    #[test]
    fn test_io_display() {
        let err = MaterializeError::io(
            "writing",
            "/home/dev/.codex/config.toml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "writing /home/dev/.codex/config.toml: denied");
    }
}
