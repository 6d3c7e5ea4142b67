//! Immutable snapshot of the process environment.
//!
//! Every component reads the search path, working directory, home directory
//! and environment variables from a [`RunContext`] instead of the ambient
//! process state, so tests can hand in a synthetic context.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory on every user's default search path.
pub const SYSTEM_BIN_DIR: &str = "/usr/local/bin";

/// Snapshot of the environment a bootstrap run executes in.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The current user's home directory.
    pub home: PathBuf,

    /// Working directory at startup.
    pub cwd: PathBuf,

    /// Executable search path (`PATH`), if set.
    pub search_path: Option<OsString>,

    /// Environment variables captured at startup.
    pub env: HashMap<String, String>,

    /// Whether the process runs with an effective uid of 0.
    pub is_root: bool,

    /// System-wide bin directory that user-local installs are linked into.
    pub system_bin_dir: PathBuf,
}

impl RunContext {
    /// Capture the current process environment.
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn from_process() -> Option<Self> {
        let home = dirs::home_dir()?;
        let cwd = std::env::current_dir().unwrap_or_else(|_| home.clone());
        Some(Self {
            home,
            cwd,
            search_path: std::env::var_os("PATH"),
            env: std::env::vars().collect(),
            is_root: effective_uid_is_root(),
            system_bin_dir: PathBuf::from(SYSTEM_BIN_DIR),
        })
    }

    /// A context rooted at `home` with an empty environment.
    ///
    /// Useful as a starting point for tests and dry runs.
    pub fn synthetic(home: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            cwd: cwd.into(),
            search_path: None,
            env: HashMap::new(),
            is_root: false,
            system_bin_dir: PathBuf::from(SYSTEM_BIN_DIR),
        }
    }

    /// Look up an environment variable, treating empty values as unset.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.env
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Builder-style helper to set an environment variable.
    pub fn with_var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.insert(key.to_string(), value.into());
        self
    }

    /// The user-local prefix (`~/.local`).
    pub fn user_prefix(&self) -> PathBuf {
        self.home.join(".local")
    }

    /// The user-local bin directory (`~/.local/bin`).
    pub fn user_bin_dir(&self) -> PathBuf {
        self.user_prefix().join("bin")
    }

    /// Expand a leading `~/` against the context's home directory.
    pub fn expand_home(&self, raw: &str) -> PathBuf {
        match raw.strip_prefix("~/") {
            Some(rest) => self.home.join(rest),
            None if raw == "~" => self.home.clone(),
            None => {
                let path = Path::new(raw);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.cwd.join(path)
                }
            }
        }
    }
}

#[cfg(unix)]
fn effective_uid_is_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
fn effective_uid_is_root() -> bool {
    false
}
