//! Probe and install details for each managed tool.
//!
//! Each function returns the [`ToolSpec`] for one tool, with install
//! strategies ordered from system-global to user-local.

use super::{InstallStrategy, LinkSet, PackageManager, ToolSpec, VersionQuery};
use crate::{RunContext, Settings, ToolKind};

const NODESOURCE_DEB: &str = "https://deb.nodesource.com";
const NODESOURCE_RPM: &str = "https://rpm.nodesource.com";
const UV_INSTALLER: &str = "https://astral.sh/uv/install.sh";
const CODEX_PACKAGE: &str = "@openai/codex";

/// Specs for every managed tool, in bootstrap order.
pub fn default_tool_specs(settings: &Settings, ctx: &RunContext) -> Vec<ToolSpec> {
    ToolKind::all()
        .map(|kind| tool_spec(kind, settings, ctx))
        .collect()
}

/// Probe and install details for a single tool.
pub fn tool_spec(kind: ToolKind, settings: &Settings, ctx: &RunContext) -> ToolSpec {
    match kind {
        ToolKind::Node => node_spec(settings),
        ToolKind::Uv => uv_spec(ctx),
        ToolKind::Codex => codex_spec(ctx),
    }
}

/// Node.js.
///
/// - apt-get or dnf after the NodeSource repository setup (root)
/// - Homebrew `node@<major>`, force-linked (no root)
fn node_spec(settings: &Settings) -> ToolSpec {
    let major = settings.node_major;
    let nodesource = |base: &str| Some(format!("{base}/setup_{major}.x"));

    ToolSpec {
        kind: ToolKind::Node,
        command: ToolKind::Node.executable_name().to_string(),
        companions: companions(ToolKind::Node),
        min_major: Some(settings.node_min_major),
        version_query: VersionQuery::Flag("--version"),
        strategies: vec![
            InstallStrategy::OsPackage {
                manager: PackageManager::Apt,
                packages: vec!["nodejs".to_string()],
                repo_setup: nodesource(NODESOURCE_DEB),
            },
            InstallStrategy::OsPackage {
                manager: PackageManager::Dnf,
                packages: vec!["nodejs".to_string()],
                repo_setup: nodesource(NODESOURCE_RPM),
            },
            InstallStrategy::OsPackage {
                manager: PackageManager::Brew,
                packages: vec![format!("node@{major}")],
                repo_setup: None,
            },
        ],
    }
}

/// uv / uvx via Astral's installer, system-wide first, then into `~/.local/bin`.
fn uv_spec(ctx: &RunContext) -> ToolSpec {
    let user_bin = ctx.user_bin_dir();
    let installer = |dir: String, privileged: bool, links: Option<LinkSet>| {
        InstallStrategy::VendorScript {
            url: UV_INSTALLER.to_string(),
            env_vars: vec![
                ("UV_INSTALL_DIR".to_string(), dir),
                ("UV_NO_MODIFY_PATH".to_string(), "1".to_string()),
            ],
            privileged,
            links,
        }
    };

    ToolSpec {
        kind: ToolKind::Uv,
        command: ToolKind::Uv.executable_name().to_string(),
        companions: companions(ToolKind::Uv),
        min_major: None,
        version_query: VersionQuery::Flag("--version"),
        strategies: vec![
            installer(ctx.system_bin_dir.display().to_string(), true, None),
            installer(
                user_bin.display().to_string(),
                false,
                Some(LinkSet {
                    source_dir: user_bin.clone(),
                    binaries: vec!["uv".to_string(), "uvx".to_string()],
                }),
            ),
        ],
    }
}

/// Codex CLI via npm, globally first, then into the `~/.local` prefix.
fn codex_spec(ctx: &RunContext) -> ToolSpec {
    ToolSpec {
        kind: ToolKind::Codex,
        command: ToolKind::Codex.executable_name().to_string(),
        companions: companions(ToolKind::Codex),
        min_major: None,
        version_query: VersionQuery::Flag("--version"),
        strategies: vec![
            InstallStrategy::PackageGlobal {
                runner: "npm".to_string(),
                package: CODEX_PACKAGE.to_string(),
            },
            InstallStrategy::PackageUserPrefix {
                runner: "npm".to_string(),
                package: CODEX_PACKAGE.to_string(),
                prefix: ctx.user_prefix(),
                binaries: vec!["codex".to_string()],
            },
        ],
    }
}

fn companions(kind: ToolKind) -> Vec<String> {
    kind.companions().iter().map(|c| c.to_string()).collect()
}
