//! Config file materialization.
//!
//! Each [`ConfigTarget`] is rendered from a template and written at most
//! once: an existing destination is never modified. Writes are atomic, so a
//! reader never sees a partial file and a crash leaves no file behind.
//!
//! # Example
//!
//! ```rust,no_run
//! use agent_bootstrap::{resolve_config_targets, ExecutionMode, Materializer, RunContext, Settings};
//!
//! let ctx = RunContext::from_process().expect("home directory");
//! let settings = Settings::from_context(&ctx).unwrap();
//! let materializer = Materializer::new(ExecutionMode::default());
//! for target in resolve_config_targets(&settings, &ctx).unwrap() {
//!     println!("{}: {:?}", target.name, materializer.materialize(&target, None));
//! }
//! ```

mod atomic;
mod errors;
mod materializer;
mod target;
mod template;

pub use atomic::{create_dir_restricted, Commit, StagedWrite};
pub use errors::MaterializeError;
pub use materializer::{MaterializeOutcome, Materializer, SkipReason};
pub use target::{
    remote_urls, resolve_config_targets, ConfigTarget, TemplateSource, ALLOWED_DIR_TOKEN,
    CODEX_TEMPLATE, CONFIG_DIR_MODE, CONFIG_FILE_MODE, CONVENTIONAL_WORKSPACE, MCP_TEMPLATE,
    WORKSPACE_DIR_TOKEN,
};
pub use template::{substitute, HttpFetcher, TemplateFetcher, TemplateStage};
