//! Process execution capability.
//!
//! Installers and link creation go through [`CommandRunner`] so tests can
//! substitute an in-memory implementation for real process spawning.

use super::StructuredCommand;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited with status 0.
    pub fn ok() -> Self {
        Self {
            exit_code: Some(0),
            ..Default::default()
        }
    }

    /// Output of a command that exited with `code` and wrote `stderr`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external commands to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` and wait for it to exit.
    ///
    /// An `Err` means the process could not be spawned at all; a process
    /// that ran and failed is reported through [`CommandOutput::exit_code`].
    async fn run(&self, command: &StructuredCommand) -> std::io::Result<CommandOutput>;
}

/// [`CommandRunner`] that spawns real processes.
///
/// Standard input is inherited so an escalation tool can prompt for a
/// password; output is captured for error reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &StructuredCommand) -> std::io::Result<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .envs(command.env_vars.iter().cloned())
            .kill_on_drop(true)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
