//! Privilege resolution for system-global installs.
//!
//! This module decides how a privileged install step is executed: directly
//! when already root, through `sudo` when it is available, or not at all.

use super::{InstallError, StructuredCommand};
use crate::{Probe, RunContext};
use std::path::PathBuf;

/// Escalation tool looked up on the search path.
const ESCALATION_TOOL: &str = "sudo";

/// How privileged commands can be run in this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Privilege {
    /// The process already runs as root.
    Root,
    /// Privileged commands are prefixed with this escalation tool.
    Escalate(PathBuf),
    /// Neither root nor an escalation tool is available.
    Unavailable,
}

impl Privilege {
    /// Determine the available privilege from the run context.
    pub fn detect(ctx: &RunContext, probe: &dyn Probe) -> Self {
        if ctx.is_root {
            Self::Root
        } else if let Some(path) = probe.locate(ESCALATION_TOOL) {
            Self::Escalate(path)
        } else {
            Self::Unavailable
        }
    }

    /// Rewrite `command` so it runs with elevated privileges.
    ///
    /// Environment variables are passed through `env` because escalation
    /// tools reset the environment.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::PrivilegeUnavailable`] when there is no way to
    /// elevate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use agent_bootstrap::{Privilege, StructuredCommand};
    /// use std::path::PathBuf;
    ///
    /// let sudo = Privilege::Escalate(PathBuf::from("/usr/bin/sudo"));
    /// let cmd = StructuredCommand::new("apt-get", ["install", "-y", "nodejs"]);
    /// let elevated = sudo.elevate(cmd, "apt-get install of nodejs").unwrap();
    /// assert_eq!(elevated.to_string(), "/usr/bin/sudo apt-get install -y nodejs");
    /// ```
    pub fn elevate(
        &self,
        command: StructuredCommand,
        strategy: &str,
    ) -> Result<StructuredCommand, InstallError> {
        match self {
            Self::Root => Ok(command),
            Self::Escalate(tool) => {
                let mut args = Vec::with_capacity(command.args.len() + command.env_vars.len() + 2);
                if !command.env_vars.is_empty() {
                    args.push("env".to_string());
                    args.extend(command.env_vars.iter().map(|(k, v)| format!("{k}={v}")));
                }
                args.push(command.program);
                args.extend(command.args);
                Ok(StructuredCommand {
                    program: tool.display().to_string(),
                    args,
                    env_vars: vec![],
                })
            }
            Self::Unavailable => Err(InstallError::PrivilegeUnavailable {
                strategy: strategy.to_string(),
                fix: format!("Run as root or install {ESCALATION_TOOL}"),
            }),
        }
    }

    /// Whether privileged commands can run at all.
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_runs_unchanged() {
        let cmd = StructuredCommand::new("apt-get", ["install", "-y", "nodejs"]);
        let elevated = Privilege::Root.elevate(cmd.clone(), "apt").unwrap();
        assert_eq!(elevated, cmd);
    }

    #[test]
    fn test_escalation_carries_env() {
        let cmd = StructuredCommand::shell("sh", "curl -fsSL https://astral.sh/uv/install.sh | sh".to_string())
            .env("UV_INSTALL_DIR", "/usr/local/bin");
        let sudo = Privilege::Escalate(PathBuf::from("/usr/bin/sudo"));
        let elevated = sudo.elevate(cmd, "uv").unwrap();
        assert_eq!(elevated.program, "/usr/bin/sudo");
        assert_eq!(
            elevated.args[..4],
            [
                "env".to_string(),
                "UV_INSTALL_DIR=/usr/local/bin".to_string(),
                "sh".to_string(),
                "-c".to_string()
            ]
        );
        assert!(elevated.env_vars.is_empty());
    }

    #[test]
    fn test_unavailable_fails() {
        let cmd = StructuredCommand::new("npm", ["install", "-g", "@openai/codex"]);
        let err = Privilege::Unavailable
            .elevate(cmd, "npm global install of @openai/codex")
            .unwrap_err();
        assert!(matches!(err, InstallError::PrivilegeUnavailable { ref strategy, .. }
            if strategy == "npm global install of @openai/codex"));
        assert!(!Privilege::Unavailable.is_available());
    }
}
