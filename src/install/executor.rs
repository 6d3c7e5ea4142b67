//! Installation execution.
//!
//! This module provides the [`Installer`] that walks a tool's ordered
//! strategies until one succeeds, elevating privileged steps and linking
//! user-local binaries into the system bin directory afterwards.

use super::link::link_binaries;
use super::{
    CommandRunner, InstallError, InstallLocation, InstallStrategy, Privilege, StructuredCommand,
    ToolSpec,
};
use crate::{BestEffort, ExecutionMode, Probe, RunContext};
use std::path::PathBuf;

/// Which strategies an install may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallScope {
    /// Every strategy, in preference order.
    Any,
    /// Only strategies that install system-wide.
    SystemOnly,
}

/// What a successful [`Installer::install`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Description of the strategy that succeeded (or would run).
    pub strategy: String,
    /// Where that strategy installs to.
    pub location: InstallLocation,
    /// System-wide links for a user-local install, if any were attempted.
    pub links: Option<BestEffort<Vec<PathBuf>>>,
    /// The install was only planned because the run is a dry run.
    pub planned: bool,
}

/// Installs tools by trying their strategies in order.
///
/// # Consent Model
///
/// Calling [`Installer::install`] IS consent to install. The orchestrator
/// never constructs an installer when installs are disallowed.
pub struct Installer<'a> {
    ctx: &'a RunContext,
    mode: ExecutionMode,
    probe: &'a dyn Probe,
    runner: &'a dyn CommandRunner,
}

impl<'a> Installer<'a> {
    /// Create an installer.
    pub fn new(
        ctx: &'a RunContext,
        mode: ExecutionMode,
        probe: &'a dyn Probe,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            ctx,
            mode,
            probe,
            runner,
        }
    }

    /// Install a tool.
    ///
    /// This function:
    /// 1. Selects the strategies allowed by `scope`
    /// 2. In dry-run mode, logs the plan and returns without side effects
    /// 3. Tries each strategy: driver programs, privilege, then its steps
    /// 4. Links user-local binaries system-wide, best-effort
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::NoViableStrategy`] listing every attempt when
    /// no strategy succeeds.
    pub async fn install(
        &self,
        spec: &ToolSpec,
        scope: InstallScope,
    ) -> Result<InstallOutcome, InstallError> {
        let candidates: Vec<&InstallStrategy> = match scope {
            InstallScope::Any => spec.strategies.iter().collect(),
            InstallScope::SystemOnly => spec.system_strategies().collect(),
        };

        let Some(first) = candidates.first() else {
            return Err(no_viable(spec, Vec::new()));
        };

        if self.mode.dry_run {
            for step in first.steps() {
                tracing::info!("[dry-run] would run: {step}");
            }
            for fallback in &candidates[1..] {
                tracing::info!("[dry-run] fallback: {}", fallback.description());
            }
            return Ok(InstallOutcome {
                strategy: first.description(),
                location: first.location(),
                links: None,
                planned: true,
            });
        }

        let privilege = Privilege::detect(self.ctx, self.probe);
        let mut attempts = Vec::new();

        for strategy in candidates {
            let description = strategy.description();
            tracing::info!("installing {} via {description}", spec.kind);

            match self.attempt(strategy, &privilege).await {
                Ok(()) => {
                    let links = match strategy.links() {
                        Some(set) => {
                            let linked = link_binaries(
                                self.runner,
                                &privilege,
                                &set,
                                &self.ctx.system_bin_dir,
                            )
                            .await;
                            linked.warn_on_failure("linking into the system bin directory");
                            Some(linked)
                        }
                        None => None,
                    };
                    return Ok(InstallOutcome {
                        strategy: description,
                        location: strategy.location(),
                        links,
                        planned: false,
                    });
                }
                Err(e) => {
                    tracing::warn!("{description} failed: {e}");
                    tracing::debug!("fix: {}", e.fix_suggestion());
                    attempts.push(format!("{description}: {e}"));
                }
            }
        }

        Err(no_viable(spec, attempts))
    }

    async fn attempt(
        &self,
        strategy: &InstallStrategy,
        privilege: &Privilege,
    ) -> Result<(), InstallError> {
        // Pre-flight: every driver program must resolve
        for driver in strategy.drivers() {
            if self.probe.locate(driver).is_none() {
                return Err(InstallError::PrerequisiteMissing {
                    program: driver.to_string(),
                    fix: format!("Install {driver} or use another install method"),
                });
            }
        }

        let description = strategy.description();
        for step in strategy.steps() {
            let command = if strategy.requires_privilege() {
                privilege.elevate(step, &description)?
            } else {
                step
            };
            run_step(self.runner, &command).await?;
        }
        Ok(())
    }
}

fn no_viable(spec: &ToolSpec, attempts: Vec<String>) -> InstallError {
    InstallError::NoViableStrategy {
        tool: spec.kind,
        attempts,
        fix: format!(
            "Install {} manually so that `{}` is on PATH, then re-run",
            spec.kind, spec.command
        ),
    }
}

/// Run one install step and classify its failure.
async fn run_step(runner: &dyn CommandRunner, command: &StructuredCommand) -> Result<(), InstallError> {
    tracing::debug!("running: {command}");

    let output = match runner.run(command).await {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(InstallError::PermissionDenied {
                message: format!("{}: {e}", command.program),
                fix: "Try running with appropriate permissions".to_string(),
            });
        }
        Err(e) => {
            return Err(InstallError::InstallerFailed {
                message: format!("could not start {}: {e}", command.program),
                exit_code: None,
                stderr: None,
                fix: "Check the command and try again".to_string(),
            });
        }
    };

    if output.success() {
        return Ok(());
    }

    let stderr = output.stderr;
    let lower = stderr.to_lowercase();

    // Detect network errors from stderr
    let is_network = lower.contains("could not resolve")
        || lower.contains("network")
        || lower.contains("connection")
        || stderr.contains("ETIMEDOUT")
        || stderr.contains("ENOTFOUND");

    if is_network {
        return Err(InstallError::Network {
            message: format!("`{command}` failed to reach the network"),
            stderr: Some(stderr),
            fix: "Check your internet connection and try again".to_string(),
        });
    }

    Err(InstallError::InstallerFailed {
        message: format!("`{command}` exited with code {:?}", output.exit_code),
        exit_code: output.exit_code,
        stderr: Some(stderr),
        fix: "See installer output above for details".to_string(),
    })
}
