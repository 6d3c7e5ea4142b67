//! Environment-driven settings.
//!
//! All environment input is read once from the [`RunContext`] into an
//! immutable [`Settings`] value at startup.

use crate::{BootstrapError, RunContext};
use std::path::PathBuf;

/// Major Node.js version the runtime installer targets.
pub const DEFAULT_NODE_MAJOR: u64 = 22;

/// Oldest Node.js major accepted from a pre-existing install.
pub const DEFAULT_NODE_MIN_MAJOR: u64 = 20;

/// Environment variable names.
pub mod vars {
    pub const NODE_MAJOR: &str = "NODE_MAJOR";
    pub const NODE_MIN_MAJOR: &str = "NODE_MIN_MAJOR";
    pub const ALLOWED_DIR: &str = "CODEX_ALLOWED_DIR";
    pub const MCP_CONFIG_PATH: &str = "MCP_CONFIG_PATH";
    pub const WORKSPACE_DIR: &str = "MCP_WORKSPACE_DIR";
    pub const TEMPLATE_BASE_URL: &str = "TEMPLATE_BASE_URL";
    pub const TEMPLATE_DIR: &str = "TEMPLATE_DIR";
    pub const NVM_DIR: &str = "NVM_DIR";
}

/// Settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Major version the runtime installer targets.
    pub node_major: u64,

    /// Minimum acceptable runtime major version.
    pub node_min_major: u64,

    /// Explicit allowed-directory override.
    pub allowed_dir: Option<String>,

    /// Destination override for the MCP servers config.
    pub mcp_config_path: Option<PathBuf>,

    /// Explicit workspace-directory override.
    pub workspace_dir: Option<String>,

    /// Base URL for fetching templates remotely.
    pub template_base_url: Option<String>,

    /// Explicit local template directory.
    ///
    /// When unset, `<cwd>/templates` is tried and the built-in templates
    /// are the final fallback.
    pub template_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the context's environment snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::InvalidSetting`] when a major-version
    /// variable is not a number.
    pub fn from_context(ctx: &RunContext) -> Result<Self, BootstrapError> {
        Ok(Self {
            node_major: parse_major(ctx, vars::NODE_MAJOR, DEFAULT_NODE_MAJOR)?,
            node_min_major: parse_major(ctx, vars::NODE_MIN_MAJOR, DEFAULT_NODE_MIN_MAJOR)?,
            allowed_dir: ctx.var(vars::ALLOWED_DIR).map(str::to_string),
            mcp_config_path: ctx.var(vars::MCP_CONFIG_PATH).map(|p| ctx.expand_home(p)),
            workspace_dir: ctx.var(vars::WORKSPACE_DIR).map(str::to_string),
            template_base_url: ctx
                .var(vars::TEMPLATE_BASE_URL)
                .map(|u| u.trim_end_matches('/').to_string()),
            template_dir: ctx.var(vars::TEMPLATE_DIR).map(|d| ctx.expand_home(d)),
        })
    }
}

fn parse_major(ctx: &RunContext, key: &str, default: u64) -> Result<u64, BootstrapError> {
    match ctx.var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim_start_matches('v')
            .parse()
            .map_err(|_| BootstrapError::InvalidSetting {
                name: key.to_string(),
                value: raw.to_string(),
            }),
    }
}
