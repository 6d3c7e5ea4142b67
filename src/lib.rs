//! # agent-bootstrap
//!
//! Bootstraps a workstation for agentic coding: makes sure Node.js, uv and
//! the Codex CLI are present at a usable version, installing them when
//! missing, then writes default Codex and MCP config files if absent.
//!
//! ## Features
//!
//! - `ToolKind` enum identifying the managed tools
//! - `Probe` trait and `SystemProbe` for presence, version and shadowing checks
//! - `Installer` walking ordered install strategies with privilege fallback
//! - `Materializer` for atomic, never-clobbering config writes
//! - `Orchestrator` tying the run together into a `Report`
//!
//! ## Example
//!
//! ```rust,no_run
//! use agent_bootstrap::{default_tool_specs, Probe, RunContext, Settings, SystemProbe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let ctx = RunContext::from_process().expect("home directory");
//!     let settings = Settings::from_context(&ctx).unwrap();
//!     let probe = SystemProbe::new(ctx.clone());
//!
//!     for spec in default_tool_specs(&settings, &ctx) {
//!         let status = probe.probe(&spec).await.unwrap();
//!         println!("{}: satisfied={}", spec.kind, status.is_satisfied(spec.min_major));
//!     }
//! }
//! ```

mod best_effort;
mod config;
mod context;
mod detection;
mod error;
mod install;
pub mod logging;
mod mode;
mod orchestrator;
mod probe;
mod report;
pub mod settings;
mod tool_kind;
mod tool_status;

pub use best_effort::BestEffort;
pub use config::{
    create_dir_restricted, remote_urls, resolve_config_targets, substitute, Commit, ConfigTarget,
    HttpFetcher, MaterializeError, MaterializeOutcome, Materializer, SkipReason, StagedWrite,
    TemplateFetcher, TemplateSource, TemplateStage, ALLOWED_DIR_TOKEN, CODEX_TEMPLATE,
    CONFIG_DIR_MODE, CONFIG_FILE_MODE, CONVENTIONAL_WORKSPACE, MCP_TEMPLATE, WORKSPACE_DIR_TOKEN,
};
pub use context::{RunContext, SYSTEM_BIN_DIR};
pub use error::BootstrapError;
pub use install::{
    default_tool_specs, tool_spec, CommandOutput, CommandRunner, InstallError, InstallLocation,
    InstallOutcome, InstallScope, InstallStrategy, Installer, LinkSet, PackageManager, Privilege,
    StructuredCommand, SystemRunner, ToolSpec, VersionQuery,
};
pub use mode::ExecutionMode;
pub use orchestrator::Orchestrator;
pub use probe::{version_manager_root, Probe, SystemProbe};
pub use report::{ConfigEntry, Report, ToolAction, ToolEntry};
pub use settings::Settings;
pub use tool_kind::ToolKind;
pub use tool_status::{ProbeError, ToolStatus};
