//! Config targets and template sources.

use crate::settings::vars;
use crate::{BootstrapError, RunContext, Settings};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Template file for the Codex CLI config.
pub const CODEX_TEMPLATE: &str = "codex-config.toml";

/// Template file for the MCP servers config.
pub const MCP_TEMPLATE: &str = "mcp-servers.json";

/// Placeholder replaced with the allowed directory.
pub const ALLOWED_DIR_TOKEN: &str = "__ALLOWED_DIR__";

/// Placeholder replaced with the workspace directory.
pub const WORKSPACE_DIR_TOKEN: &str = "__WORKSPACE_DIR__";

/// Built-in templates, used when no template directory or base URL provides them.
const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    (CODEX_TEMPLATE, include_str!("../../templates/codex-config.toml")),
    (MCP_TEMPLATE, include_str!("../../templates/mcp-servers.json")),
];

/// Owner read/write only.
pub const CONFIG_FILE_MODE: u32 = 0o600;

/// Owner-only access for directories created to hold config files.
pub const CONFIG_DIR_MODE: u32 = 0o700;

/// Where a template's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A file on the local filesystem.
    Local(PathBuf),
    /// A URL fetched into a staging directory before materialization.
    Remote(String),
    /// A template compiled into the binary.
    Embedded {
        /// Template file name.
        name: &'static str,
        /// Template text.
        body: &'static str,
    },
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
            Self::Embedded { name, .. } => write!(f, "built-in {name}"),
        }
    }
}

/// A config file to write once, if absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTarget {
    /// Short name used in logs and the report (e.g., "codex").
    pub name: String,
    /// Where the config is written.
    pub destination: PathBuf,
    /// Template to render.
    pub template: TemplateSource,
    /// Placeholder token to replacement value.
    pub substitutions: BTreeMap<String, String>,
    /// Permission mode of the written file.
    pub mode: u32,
}

/// Directory used as the allowed directory when it exists and no override is set.
pub const CONVENTIONAL_WORKSPACE: &str = "/workspace";

/// Build the config targets for this run.
///
/// Placeholder values are resolved from the settings with these fallbacks:
/// - `__ALLOWED_DIR__`: `CODEX_ALLOWED_DIR`, else `/workspace` if it is a
///   directory, else the working directory
/// - `__WORKSPACE_DIR__`: `MCP_WORKSPACE_DIR`, else the allowed directory
///
/// Templates are taken as a set, from the first source that applies:
/// 1. `TEMPLATE_DIR` (or `<cwd>/templates`) when every file is there
/// 2. `TEMPLATE_BASE_URL`, fetching all of them
/// 3. `TEMPLATE_DIR` as given, when it was set explicitly
/// 4. The templates built into the binary
///
/// # Errors
///
/// Returns [`BootstrapError::InvalidSubstitution`] when an override is neither
/// an existing directory nor a deferred `${...}` placeholder.
pub fn resolve_config_targets(
    settings: &Settings,
    ctx: &RunContext,
) -> Result<Vec<ConfigTarget>, BootstrapError> {
    resolve_with_workspace(settings, ctx, Path::new(CONVENTIONAL_WORKSPACE))
}

fn resolve_with_workspace(
    settings: &Settings,
    ctx: &RunContext,
    conventional: &Path,
) -> Result<Vec<ConfigTarget>, BootstrapError> {
    let allowed_dir = match settings.allowed_dir.as_deref() {
        Some(raw) => validate_override(vars::ALLOWED_DIR, raw, ctx)?,
        None if conventional.is_dir() => conventional.display().to_string(),
        None => ctx.cwd.display().to_string(),
    };
    let workspace_dir = match settings.workspace_dir.as_deref() {
        Some(raw) => validate_override(vars::WORKSPACE_DIR, raw, ctx)?,
        None => allowed_dir.clone(),
    };

    let sources = template_sources(settings, ctx, &[CODEX_TEMPLATE, MCP_TEMPLATE]);
    let mcp_destination = settings
        .mcp_config_path
        .clone()
        .unwrap_or_else(|| ctx.home.join(".config/mcp/servers.json"));

    Ok(vec![
        ConfigTarget {
            name: "codex".to_string(),
            destination: ctx.home.join(".codex/config.toml"),
            template: sources[0].clone(),
            substitutions: BTreeMap::from([(ALLOWED_DIR_TOKEN.to_string(), allowed_dir)]),
            mode: CONFIG_FILE_MODE,
        },
        ConfigTarget {
            name: "mcp".to_string(),
            destination: mcp_destination,
            template: sources[1].clone(),
            substitutions: BTreeMap::from([(WORKSPACE_DIR_TOKEN.to_string(), workspace_dir)]),
            mode: CONFIG_FILE_MODE,
        },
    ])
}

fn validate_override(name: &str, raw: &str, ctx: &RunContext) -> Result<String, BootstrapError> {
    // Expanded later by whatever consumes the config.
    if raw.contains("${") {
        return Ok(raw.to_string());
    }
    let path = ctx.expand_home(raw);
    if path.is_dir() {
        Ok(path.display().to_string())
    } else {
        Err(BootstrapError::InvalidSubstitution {
            name: name.to_string(),
            value: raw.to_string(),
        })
    }
}

fn template_sources(
    settings: &Settings,
    ctx: &RunContext,
    files: &[&str],
) -> Vec<TemplateSource> {
    let dir = settings
        .template_dir
        .clone()
        .unwrap_or_else(|| ctx.cwd.join("templates"));
    let local: Vec<PathBuf> = files.iter().map(|f| dir.join(f)).collect();
    if local.iter().all(|p| p.is_file()) {
        return local.into_iter().map(TemplateSource::Local).collect();
    }

    if let Some(base) = settings.template_base_url.as_deref() {
        return files
            .iter()
            .map(|f| TemplateSource::Remote(format!("{base}/{f}")))
            .collect();
    }
    if settings.template_dir.is_some() {
        // Reported as missing when the target is materialized.
        return local.into_iter().map(TemplateSource::Local).collect();
    }

    tracing::debug!(dir = %dir.display(), "no local templates, using built-in ones");
    let embedded: Option<Vec<TemplateSource>> = files.iter().map(|f| built_in(f)).collect();
    embedded.unwrap_or_else(|| local.into_iter().map(TemplateSource::Local).collect())
}

fn built_in(file: &str) -> Option<TemplateSource> {
    EMBEDDED_TEMPLATES
        .iter()
        .find(|(name, _)| *name == file)
        .map(|&(name, body)| TemplateSource::Embedded { name, body })
}

/// URLs of every remote template among `targets`.
pub fn remote_urls(targets: &[ConfigTarget]) -> Vec<String> {
    targets
        .iter()
        .filter_map(|t| match &t.template {
            TemplateSource::Remote(url) => Some(url.clone()),
            TemplateSource::Local(_) | TemplateSource::Embedded { .. } => None,
        })
        .collect()
}
