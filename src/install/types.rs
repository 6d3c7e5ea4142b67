//! Type definitions for tool descriptions and install strategies.
//!
//! This module defines the data structures that describe how a tool is
//! probed and the ordered strategies used to install it. Strategies render
//! into [`StructuredCommand`]s for programmatic execution and display.

use crate::ToolKind;
use std::fmt;
use std::path::PathBuf;

/// Where an installation method installs to.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::InstallLocation;
///
/// let location = InstallLocation::UserLocal;
/// assert_ne!(location, InstallLocation::System);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallLocation {
    /// User-local installation (no elevated privileges required).
    ///
    /// Examples: `~/.local/bin`, npm global with a user prefix.
    UserLocal,

    /// System-wide installation on every user's default search path.
    ///
    /// Examples: `/usr/bin`, `/usr/local/bin`.
    System,
}

/// A structured command for programmatic execution.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::StructuredCommand;
///
/// let cmd = StructuredCommand::new("npm", ["install", "-g", "@openai/codex"]);
/// assert_eq!(cmd.to_string(), "npm install -g @openai/codex");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredCommand {
    /// The program to execute (e.g., "sh", "apt-get", "npm").
    pub program: String,

    /// Arguments to pass to the program.
    pub args: Vec<String>,

    /// Environment variables to set before execution (key, value pairs).
    pub env_vars: Vec<(String, String)>,
}

impl StructuredCommand {
    /// Build a command without extra environment variables.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env_vars: vec![],
        }
    }

    /// A shell pipeline run through `shell -c`.
    pub fn shell(shell: &str, script: String) -> Self {
        Self::new(shell, ["-c".to_string(), script])
    }

    /// Builder-style helper to add an environment variable.
    pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env_vars.push((key.to_string(), value.into()));
        self
    }
}

impl fmt::Display for StructuredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env_vars {
            write!(f, "{key}={value} ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// OS package managers a runtime can be installed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian/Ubuntu `apt-get`.
    Apt,
    /// Fedora/RHEL `dnf`.
    Dnf,
    /// Homebrew.
    Brew,
}

impl PackageManager {
    /// The program that drives this package manager.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Brew => "brew",
        }
    }

    /// Whether installs through this manager need root.
    pub fn requires_privilege(&self) -> bool {
        !matches!(self, Self::Brew)
    }

    fn install_steps(&self, packages: &[String]) -> Vec<StructuredCommand> {
        match self {
            Self::Apt | Self::Dnf => {
                let mut args = vec!["install".to_string(), "-y".to_string()];
                args.extend(packages.iter().cloned());
                vec![StructuredCommand::new(self.program(), args)]
            }
            // keg-only formulae such as node@22 must be linked explicitly
            Self::Brew => packages
                .iter()
                .flat_map(|pkg| {
                    [
                        StructuredCommand::new("brew", ["install", pkg.as_str()]),
                        StructuredCommand::new(
                            "brew",
                            ["link", "--overwrite", "--force", pkg.as_str()],
                        ),
                    ]
                })
                .collect(),
        }
    }
}

/// Binaries to expose from a user-local install in the system bin directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSet {
    /// Directory the installer put the binaries in.
    pub source_dir: PathBuf,
    /// Binary names to link.
    pub binaries: Vec<String>,
}

/// One way of installing a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Install OS packages, optionally after running a vendor repository setup script.
    OsPackage {
        /// Package manager to drive.
        manager: PackageManager,
        /// Packages to install.
        packages: Vec<String>,
        /// Repository setup script URL, run before the install.
        repo_setup: Option<String>,
    },

    /// Download a vendor install script over HTTPS and pipe it to a shell.
    VendorScript {
        /// Script URL.
        url: String,
        /// Environment passed to the script.
        env_vars: Vec<(String, String)>,
        /// Whether the script writes to a system location.
        privileged: bool,
        /// Binaries to link system-wide after a user-local install.
        links: Option<LinkSet>,
    },

    /// Global install through a language package manager.
    PackageGlobal {
        /// Package manager program (e.g., "npm").
        runner: String,
        /// Package specifier.
        package: String,
    },

    /// Global install through a language package manager into a user prefix.
    PackageUserPrefix {
        /// Package manager program (e.g., "npm").
        runner: String,
        /// Package specifier.
        package: String,
        /// Install prefix inside the user's home.
        prefix: PathBuf,
        /// Binary names to link system-wide afterwards.
        binaries: Vec<String>,
    },
}

/// Curl flags that refuse anything but HTTPS with TLS 1.2+.
const SECURE_CURL: &str = "curl --proto '=https' --tlsv1.2 -fsSL";

impl InstallStrategy {
    /// The commands this strategy runs, in order, before privilege elevation.
    pub fn steps(&self) -> Vec<StructuredCommand> {
        match self {
            Self::OsPackage {
                manager,
                packages,
                repo_setup,
            } => {
                let mut steps = Vec::new();
                if let Some(url) = repo_setup {
                    steps.push(StructuredCommand::shell(
                        "bash",
                        format!("{SECURE_CURL} {url} | bash -"),
                    ));
                }
                steps.extend(manager.install_steps(packages));
                steps
            }
            Self::VendorScript { url, env_vars, .. } => {
                let mut cmd = StructuredCommand::shell("sh", format!("{SECURE_CURL} {url} | sh"));
                cmd.env_vars = env_vars.clone();
                vec![cmd]
            }
            Self::PackageGlobal { runner, package } => {
                vec![StructuredCommand::new(
                    runner,
                    ["install", "-g", package.as_str()],
                )]
            }
            Self::PackageUserPrefix {
                runner,
                package,
                prefix,
                ..
            } => vec![StructuredCommand::new(
                runner,
                [
                    "install".to_string(),
                    "-g".to_string(),
                    "--prefix".to_string(),
                    prefix.display().to_string(),
                    package.clone(),
                ],
            )],
        }
    }

    /// Programs that must resolve before this strategy can run.
    pub fn drivers(&self) -> Vec<&str> {
        match self {
            Self::OsPackage {
                manager,
                repo_setup,
                ..
            } => {
                let mut drivers = vec![manager.program()];
                if repo_setup.is_some() {
                    drivers.push("curl");
                }
                drivers
            }
            Self::VendorScript { .. } => vec!["curl"],
            Self::PackageGlobal { runner, .. } | Self::PackageUserPrefix { runner, .. } => {
                vec![runner.as_str()]
            }
        }
    }

    /// Whether the steps must run with elevated privileges.
    pub fn requires_privilege(&self) -> bool {
        match self {
            Self::OsPackage { manager, .. } => manager.requires_privilege(),
            Self::VendorScript { privileged, .. } => *privileged,
            Self::PackageGlobal { .. } => true,
            Self::PackageUserPrefix { .. } => false,
        }
    }

    /// Where this strategy installs to.
    pub fn location(&self) -> InstallLocation {
        match self {
            Self::OsPackage { .. } | Self::PackageGlobal { .. } => InstallLocation::System,
            Self::VendorScript { privileged, .. } => {
                if *privileged {
                    InstallLocation::System
                } else {
                    InstallLocation::UserLocal
                }
            }
            Self::PackageUserPrefix { .. } => InstallLocation::UserLocal,
        }
    }

    /// Binaries to link system-wide after a successful install.
    pub fn links(&self) -> Option<LinkSet> {
        match self {
            Self::VendorScript { links, .. } => links.clone(),
            Self::PackageUserPrefix {
                prefix, binaries, ..
            } => Some(LinkSet {
                source_dir: prefix.join("bin"),
                binaries: binaries.clone(),
            }),
            _ => None,
        }
    }

    /// Human-readable description (e.g., "npm global install of @openai/codex").
    pub fn description(&self) -> String {
        match self {
            Self::OsPackage {
                manager, packages, ..
            } => format!("{} install of {}", manager.program(), packages.join(" ")),
            Self::VendorScript { url, privileged, .. } => {
                let scope = if *privileged { "system" } else { "user-local" };
                format!("{scope} vendor script {url}")
            }
            Self::PackageGlobal { runner, package } => {
                format!("{runner} global install of {package}")
            }
            Self::PackageUserPrefix {
                runner,
                package,
                prefix,
                ..
            } => format!(
                "{runner} install of {package} into {}",
                prefix.display()
            ),
        }
    }
}

/// How a tool reports its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionQuery {
    /// Run the tool with this argument and parse a version from the output.
    Flag(&'static str),
    /// Only presence is checked.
    PresenceOnly,
}

/// Everything needed to probe and install one tool.
///
/// A tool with no strategies is probe-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// The tool described.
    pub kind: ToolKind,
    /// Executable probed for presence.
    pub command: String,
    /// Executables that must resolve alongside `command`.
    pub companions: Vec<String>,
    /// Minimum acceptable major version.
    pub min_major: Option<u64>,
    /// How to extract the installed version.
    pub version_query: VersionQuery,
    /// Install strategies in preference order.
    pub strategies: Vec<InstallStrategy>,
}

impl ToolSpec {
    /// Whether this tool can only be probed, never installed.
    pub fn is_probe_only(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategies that install to a system-global location.
    pub fn system_strategies(&self) -> impl Iterator<Item = &InstallStrategy> {
        self.strategies
            .iter()
            .filter(|s| s.location() == InstallLocation::System)
    }
}
