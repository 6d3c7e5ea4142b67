//! End-to-end bootstrap run.
//!
//! The [`Orchestrator`] brings every tool to a satisfied state, one at a time
//! and in order, then materializes the config targets and re-checks the
//! tools. Any fatal error aborts the whole run.

use crate::config::remote_urls;
use crate::report::{ConfigEntry, Report, ToolAction, ToolEntry};
use crate::{
    BootstrapError, CommandRunner, ConfigTarget, ExecutionMode, InstallOutcome, InstallScope,
    Installer, Materializer, Probe, RunContext, TemplateFetcher, TemplateStage, ToolSpec,
    ToolStatus,
};

/// Drives a bootstrap run against a set of capabilities.
///
/// # Example
///
/// ```rust,no_run
/// use agent_bootstrap::{
///     default_tool_specs, resolve_config_targets, ExecutionMode, HttpFetcher, Orchestrator,
///     RunContext, Settings, SystemProbe, SystemRunner,
/// };
///
/// # async fn run() -> Result<(), agent_bootstrap::BootstrapError> {
/// let ctx = RunContext::from_process().ok_or(agent_bootstrap::BootstrapError::NoHome)?;
/// let settings = Settings::from_context(&ctx)?;
/// let tools = default_tool_specs(&settings, &ctx);
/// let targets = resolve_config_targets(&settings, &ctx)?;
///
/// let probe = SystemProbe::new(ctx.clone());
/// let runner = SystemRunner;
/// let fetcher = HttpFetcher::new();
/// let report = Orchestrator::new(&ctx, ExecutionMode::default(), &probe, &runner, &fetcher)
///     .run(&tools, &targets)
///     .await?;
/// print!("{report}");
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<'a> {
    ctx: &'a RunContext,
    mode: ExecutionMode,
    probe: &'a dyn Probe,
    runner: &'a dyn CommandRunner,
    fetcher: &'a dyn TemplateFetcher,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator.
    pub fn new(
        ctx: &'a RunContext,
        mode: ExecutionMode,
        probe: &'a dyn Probe,
        runner: &'a dyn CommandRunner,
        fetcher: &'a dyn TemplateFetcher,
    ) -> Self {
        Self {
            ctx,
            mode,
            probe,
            runner,
            fetcher,
        }
    }

    /// Run the bootstrap.
    ///
    /// 1. For each tool, in order: probe, and install or accept it
    /// 2. Unless `--no-config`, materialize each config target
    /// 3. Unless dry-run, re-probe every tool once more
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`BootstrapError`]; nothing after it runs.
    pub async fn run(
        &self,
        tools: &[ToolSpec],
        targets: &[ConfigTarget],
    ) -> Result<Report, BootstrapError> {
        let mut report = Report::default();

        for spec in tools {
            let entry = self.ensure_tool(spec).await?;
            report.tools.push(entry);
        }

        if self.mode.write_config_allowed {
            report.configs = self.materialize_all(targets).await?;
        } else {
            tracing::info!("skipping config files (--no-config)");
        }

        if !self.mode.dry_run {
            self.verify_postcondition(tools).await?;
        }

        Ok(report)
    }

    async fn ensure_tool(&self, spec: &ToolSpec) -> Result<ToolEntry, BootstrapError> {
        let status = self.probe.probe(spec).await?;
        for companion in &status.missing_companions {
            tracing::warn!("{} found but {companion} is missing", spec.kind);
        }

        if status.is_satisfied(spec.min_major) {
            tracing::info!("{} is satisfied{}", spec.kind, describe(&status));
            return Ok(entry(spec, ToolAction::Satisfied, &status));
        }

        if status.meets_minimum(spec.min_major) {
            // Present but only via a version manager's private tree.
            if !self.mode.install_allowed {
                tracing::warn!(
                    "{} resolves through a version manager{}; it may be missing in a fresh shell",
                    spec.kind,
                    describe(&status)
                );
                return Ok(entry(spec, ToolAction::AcceptedShadowed, &status));
            }
            tracing::info!(
                "{} resolves through a version manager{}; installing it system-wide",
                spec.kind,
                describe(&status)
            );
            let outcome = self.installer().install(spec, InstallScope::SystemOnly).await?;
            return self.verify_install(spec, outcome, &status, ToolAction::MadeDurable).await;
        }

        if !self.mode.install_allowed {
            return Err(BootstrapError::PreconditionUnmet { tool: spec.kind });
        }

        match &status.version {
            Some(v) if status.present => tracing::info!(
                "{} {v} is older than {}.x, installing",
                spec.kind,
                spec.min_major.unwrap_or_default()
            ),
            _ if status.present => tracing::info!("{} version unknown, installing", spec.kind),
            _ => tracing::info!("{} not found, installing", spec.kind),
        }
        let outcome = self.installer().install(spec, InstallScope::Any).await?;
        self.verify_install(spec, outcome, &status, ToolAction::Installed)
            .await
    }

    /// Re-probe once after an install.
    ///
    /// When the tool was shadowed before, the current search path still
    /// resolves the version manager copy, so the new install is checked
    /// with [`Probe::probe_durable`] and must be fully satisfied there.
    async fn verify_install(
        &self,
        spec: &ToolSpec,
        outcome: InstallOutcome,
        before: &ToolStatus,
        action: fn(String) -> ToolAction,
    ) -> Result<ToolEntry, BootstrapError> {
        if outcome.planned {
            return Ok(entry(spec, ToolAction::Planned(outcome.strategy), before));
        }

        let (after, verified) = if before.shadowed {
            let after = self.probe.probe_durable(spec).await?;
            let verified = after.is_satisfied(spec.min_major);
            (after, verified)
        } else {
            let after = self.probe.probe(spec).await?;
            let verified = after.meets_minimum(spec.min_major);
            (after, verified)
        };
        if !verified {
            return Err(BootstrapError::InstallVerificationFailed {
                tool: spec.kind,
                strategy: outcome.strategy,
            });
        }
        if before.shadowed {
            tracing::info!(
                "{} still resolves through a version manager in this shell; new shells use the system copy",
                spec.kind
            );
        }
        tracing::info!("{} ready{}", spec.kind, describe(&after));
        Ok(entry(spec, action(outcome.strategy), &after))
    }

    async fn materialize_all(
        &self,
        targets: &[ConfigTarget],
    ) -> Result<Vec<ConfigEntry>, BootstrapError> {
        // Dropped on every exit path, removing the staging directory.
        let stage = self.stage_templates(targets).await?;
        let materializer = Materializer::new(self.mode);

        let mut entries = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = materializer.materialize(target, stage.as_ref())?;
            entries.push(ConfigEntry {
                name: target.name.clone(),
                destination: target.destination.clone(),
                outcome,
            });
        }
        Ok(entries)
    }

    async fn stage_templates(
        &self,
        targets: &[ConfigTarget],
    ) -> Result<Option<TemplateStage>, BootstrapError> {
        let urls = remote_urls(targets);
        let needed = targets
            .iter()
            .any(|t| t.destination.symlink_metadata().is_err());
        if urls.is_empty() || !needed {
            return Ok(None);
        }
        if self.mode.dry_run {
            for url in &urls {
                tracing::info!("[dry-run] would fetch template {url}");
            }
            return Ok(None);
        }
        Ok(Some(TemplateStage::fetch_all(self.fetcher, &urls).await?))
    }

    async fn verify_postcondition(&self, tools: &[ToolSpec]) -> Result<(), BootstrapError> {
        let mut unmet = Vec::new();
        for spec in tools {
            let status = self.probe.probe(spec).await?;
            if status.meets_minimum(spec.min_major) {
                continue;
            }
            // An outdated version manager copy may hide a good system install.
            if status.shadowed
                && self
                    .probe
                    .probe_durable(spec)
                    .await?
                    .is_satisfied(spec.min_major)
            {
                continue;
            }
            unmet.push(spec.kind);
        }
        if unmet.is_empty() {
            Ok(())
        } else {
            Err(BootstrapError::PostconditionUnmet { tools: unmet })
        }
    }

    fn installer(&self) -> Installer<'_> {
        Installer::new(self.ctx, self.mode, self.probe, self.runner)
    }
}

fn entry(spec: &ToolSpec, action: ToolAction, status: &ToolStatus) -> ToolEntry {
    ToolEntry {
        kind: spec.kind,
        action,
        path: status.path.clone(),
        version: status.version.clone(),
    }
}

fn describe(status: &ToolStatus) -> String {
    match (status.path(), &status.version) {
        (Some(path), Some(v)) => format!(" ({v} at {})", path.display()),
        (Some(path), None) => format!(" (at {})", path.display()),
        _ => String::new(),
    }
}
