//! Tool probing.
//!
//! [`Probe`] is the capability seam between the orchestrator and the host:
//! production code uses [`SystemProbe`], tests substitute an in-memory fake.

use crate::detection::{find_executable, find_executable_excluding, parse_version, query_version};
use crate::settings::vars;
use crate::{ProbeError, RunContext, ToolSpec, ToolStatus, VersionQuery};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Detects executables and the tools they belong to.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Resolve a bare executable name, without running it.
    fn locate(&self, name: &str) -> Option<PathBuf>;

    /// Probe a tool: resolve it, query its version and check for shadowing.
    ///
    /// A missing tool is reported as [`ToolStatus::absent`], never as an error.
    async fn probe(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError>;

    /// Probe a tool as if no version manager tree were on the search path.
    ///
    /// This is what a new login shell without the version manager would
    /// resolve. The result is never shadowed.
    async fn probe_durable(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError>;
}

/// [`Probe`] backed by the real search path and process execution.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    ctx: RunContext,
}

impl SystemProbe {
    /// Probe against the given context.
    pub fn new(ctx: RunContext) -> Self {
        Self { ctx }
    }
}

impl SystemProbe {
    /// # Detection Process
    ///
    /// 1. Resolve the probe command with `locate`
    /// 2. Resolve every companion executable the same way
    /// 3. Run the tool's version query and parse a semantic version
    /// 4. Mark the result shadowed if it lives under a version manager tree
    async fn probe_with<F>(&self, spec: &ToolSpec, locate: F) -> Result<ToolStatus, ProbeError>
    where
        F: Fn(&str) -> Option<PathBuf> + Send + Sync,
    {
        // Step 1: Find executable
        let path = match locate(spec.command.as_str()) {
            Some(p) => p,
            None => return Ok(ToolStatus::absent()),
        };

        // Step 2: Companions
        let missing_companions: Vec<String> = spec
            .companions
            .iter()
            .filter(|c| locate(c.as_str()).is_none())
            .cloned()
            .collect();

        // Step 3: Version
        let version = match spec.version_query {
            VersionQuery::Flag(flag) => query_version(&path, flag)
                .await?
                .as_deref()
                .and_then(parse_version),
            VersionQuery::PresenceOnly => None,
        };

        // Step 4: Shadowing
        let shadowed = version_manager_root(&path, &self.ctx).is_some();

        tracing::debug!(
            tool = %spec.kind,
            path = %path.display(),
            version = ?version,
            shadowed,
            "probed"
        );

        Ok(ToolStatus {
            present: missing_companions.is_empty(),
            path: Some(path),
            version,
            shadowed,
            missing_companions,
        })
    }
}

#[async_trait]
impl Probe for SystemProbe {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        find_executable(name, &self.ctx)
    }

    async fn probe(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError> {
        self.probe_with(spec, |name| self.locate(name)).await
    }

    async fn probe_durable(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError> {
        let excluded = version_manager_roots(&self.ctx);
        self.probe_with(spec, |name| find_executable_excluding(name, &self.ctx, &excluded))
            .await
    }
}

/// Return the version manager tree `path` lives under, if any.
///
/// Checks `$NVM_DIR` when set and the conventional `~/.nvm`.
pub fn version_manager_root(path: &Path, ctx: &RunContext) -> Option<PathBuf> {
    version_manager_roots(ctx)
        .into_iter()
        .find(|root| path.starts_with(root))
}

fn version_manager_roots(ctx: &RunContext) -> Vec<PathBuf> {
    let mut roots = vec![ctx.home.join(".nvm")];
    if let Some(dir) = ctx.var(vars::NVM_DIR) {
        roots.insert(0, ctx.expand_home(dir));
    }
    roots
}
