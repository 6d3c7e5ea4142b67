//! Run summary.

use crate::{MaterializeOutcome, ToolKind};
use semver::Version;
use std::fmt;
use std::path::PathBuf;

/// What a run did about one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAction {
    /// Already present, recent enough and not shadowed.
    Satisfied,
    /// Installed by the named strategy.
    Installed(String),
    /// Shadowed by a version manager; installed system-wide by the named strategy.
    MadeDurable(String),
    /// Shadowed by a version manager and kept as-is because installs are disabled.
    AcceptedShadowed,
    /// Dry run: the named strategy would have been used.
    Planned(String),
}

impl fmt::Display for ToolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfied => f.write_str("already satisfied"),
            Self::Installed(strategy) => write!(f, "installed ({strategy})"),
            Self::MadeDurable(strategy) => write!(f, "made durable ({strategy})"),
            Self::AcceptedShadowed => f.write_str("accepted version-manager install for this run"),
            Self::Planned(strategy) => write!(f, "would install ({strategy})"),
        }
    }
}

/// One tool line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolEntry {
    /// Which tool this line is about.
    pub kind: ToolKind,

    /// What the run did about it.
    pub action: ToolAction,

    /// Executable the tool resolved to after the action, if any.
    ///
    /// For a planned install this is where it resolved before the run.
    pub path: Option<PathBuf>,

    /// Version reported at `path`.
    pub version: Option<Version>,
}

/// One config line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Short target name (e.g., "codex").
    pub name: String,

    /// Where the config lives.
    pub destination: PathBuf,

    /// Whether it was written or left alone.
    pub outcome: MaterializeOutcome,
}

/// Everything a successful run resolved, in the order it happened.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::{Report, ToolAction, ToolEntry, ToolKind};
///
/// let report = Report {
///     tools: vec![ToolEntry {
///         kind: ToolKind::Uv,
///         action: ToolAction::Satisfied,
///         path: Some("/usr/local/bin/uv".into()),
///         version: Some(semver::Version::new(0, 4, 18)),
///     }],
///     configs: Vec::new(),
/// };
/// assert_eq!(report.tool(ToolKind::Uv).unwrap().action, ToolAction::Satisfied);
/// assert!(report.to_string().contains("/usr/local/bin/uv 0.4.18"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// One entry per tool, in bootstrap order.
    pub tools: Vec<ToolEntry>,

    /// One entry per config target; empty under `--no-config`.
    pub configs: Vec<ConfigEntry>,
}

impl Report {
    /// The entry for `kind`, if the run covered it.
    pub fn tool(&self, kind: ToolKind) -> Option<&ToolEntry> {
        self.tools.iter().find(|t| t.kind == kind)
    }

    /// The entry for the config target named `name`.
    pub fn config(&self, name: &str) -> Option<&ConfigEntry> {
        self.configs.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tools:")?;
        for tool in &self.tools {
            let path = tool
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            let version = tool
                .version
                .as_ref()
                .map(|v| format!(" {v}"))
                .unwrap_or_default();
            writeln!(
                f,
                "  {:<10} {path}{version}: {}",
                tool.kind.display_name(),
                tool.action
            )?;
        }

        if !self.configs.is_empty() {
            writeln!(f, "Config:")?;
            for config in &self.configs {
                let outcome = match &config.outcome {
                    MaterializeOutcome::Written(_) => "written".to_string(),
                    MaterializeOutcome::Skipped(reason) => format!("skipped ({reason})"),
                };
                writeln!(
                    f,
                    "  {:<10} {}: {outcome}",
                    config.name,
                    config.destination.display()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SkipReason;

    #[test]
    fn test_display() {
        let report = Report {
            tools: vec![
                ToolEntry {
                    kind: ToolKind::Node,
                    action: ToolAction::Satisfied,
                    path: Some(PathBuf::from("/usr/bin/node")),
                    version: Some(Version::new(22, 3, 0)),
                },
                ToolEntry {
                    kind: ToolKind::Codex,
                    action: ToolAction::Planned("npm global install of @openai/codex".into()),
                    path: None,
                    version: None,
                },
            ],
            configs: vec![ConfigEntry {
                name: "codex".into(),
                destination: PathBuf::from("/home/dev/.codex/config.toml"),
                outcome: MaterializeOutcome::Skipped(SkipReason::AlreadyExists),
            }],
        };

        let text = report.to_string();
        assert!(text.contains("Node.js    /usr/bin/node 22.3.0: already satisfied"));
        assert!(text.contains("Codex CLI  -: would install (npm global install of @openai/codex)"));
        assert!(text.contains("codex      /home/dev/.codex/config.toml: skipped (already exists)"));
    }

    #[test]
    fn test_lookup() {
        let report = Report {
            tools: vec![ToolEntry {
                kind: ToolKind::Uv,
                action: ToolAction::AcceptedShadowed,
                path: None,
                version: None,
            }],
            configs: vec![],
        };
        assert_eq!(report.tool(ToolKind::Uv).unwrap().action, ToolAction::AcceptedShadowed);
        assert!(report.tool(ToolKind::Node).is_none());
        assert!(report.config("mcp").is_none());
        assert!(!report.to_string().contains("Config:"));
    }
}
