//! Tool installation.
//!
//! This module describes how each managed tool is probed and installed
//! ([`ToolSpec`], [`InstallStrategy`]) and executes those strategies
//! ([`Installer`]).
//!
//! # Example
//!
//! ```rust
//! use agent_bootstrap::{tool_spec, RunContext, Settings, ToolKind};
//!
//! let ctx = RunContext::synthetic("/home/dev", "/work");
//! let settings = Settings::from_context(&ctx).unwrap();
//! let spec = tool_spec(ToolKind::Codex, &settings, &ctx);
//! for strategy in &spec.strategies {
//!     println!("{}", strategy.description());
//! }
//! ```

mod errors;
mod executor;
mod info;
mod link;
mod privilege;
mod runner;
mod types;

pub use errors::InstallError;
pub use executor::{InstallOutcome, InstallScope, Installer};
pub use info::{default_tool_specs, tool_spec};
pub use privilege::Privilege;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use types::{
    InstallLocation, InstallStrategy, LinkSet, PackageManager, StructuredCommand, ToolSpec,
    VersionQuery,
};

#[cfg(test)]
pub(crate) mod testing {
    use super::{CommandOutput, CommandRunner, StructuredCommand};
    use crate::{Probe, ProbeError, ToolSpec, ToolStatus};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Probe that resolves a fixed set of programs under `/usr/bin`.
    pub(crate) struct StaticProbe {
        programs: Vec<String>,
    }

    impl StaticProbe {
        pub(crate) fn with(programs: &[&str]) -> Self {
            Self {
                programs: programs.iter().map(|p| p.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl Probe for StaticProbe {
        fn locate(&self, name: &str) -> Option<PathBuf> {
            self.programs
                .iter()
                .any(|p| p == name)
                .then(|| PathBuf::from("/usr/bin").join(name))
        }

        async fn probe(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError> {
            Ok(match self.locate(&spec.command) {
                Some(path) => ToolStatus {
                    present: true,
                    path: Some(path),
                    ..Default::default()
                },
                None => ToolStatus::absent(),
            })
        }

        async fn probe_durable(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError> {
            self.probe(spec).await
        }
    }

    /// Runner that records commands and succeeds unless told otherwise.
    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        log: Mutex<Vec<String>>,
        responses: HashMap<String, CommandOutput>,
    }

    impl RecordingRunner {
        pub(crate) fn respond(mut self, command: &str, output: CommandOutput) -> Self {
            self.responses.insert(command.to_string(), output);
            self
        }

        pub(crate) fn commands(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &StructuredCommand) -> std::io::Result<CommandOutput> {
            let rendered = command.to_string();
            self.log.lock().unwrap().push(rendered.clone());
            Ok(self
                .responses
                .get(&rendered)
                .cloned()
                .unwrap_or_else(CommandOutput::ok))
        }
    }
}
