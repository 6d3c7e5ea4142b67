//! In-memory host used by the integration tests.
//!
//! `FakeSystem` plays all three capabilities: it resolves programs from a
//! table, records every command it is asked to run, applies the effect of
//! known installer commands to that table, and serves templates from memory.
//! Programs under `~/.nvm` live in a separate layer that wins over the
//! system table, the way a version manager's bin dir sits first on `PATH`.

#![allow(dead_code)]

use agent_bootstrap::{
    resolve_config_targets, settings::vars, CommandOutput, CommandRunner, ConfigTarget,
    MaterializeError, Probe, ProbeError, RunContext, Settings, StructuredCommand,
    TemplateFetcher, ToolSpec, ToolStatus,
};
use async_trait::async_trait;
use semver::Version;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub const CODEX_TEMPLATE: &str = "[sandbox]\nwritable_roots = [\"__ALLOWED_DIR__\"]\n";
pub const MCP_TEMPLATE: &str = "{\"root\": \"__WORKSPACE_DIR__\", \"again\": \"__WORKSPACE_DIR__\"}\n";

#[derive(Debug, Clone)]
struct Program {
    path: PathBuf,
    version: Option<Version>,
}

/// Programs an installer command makes available.
struct Effect {
    pattern: &'static str,
    programs: Vec<(&'static str, &'static str, Option<Version>)>,
}

pub struct FakeSystem {
    nvm_root: PathBuf,
    programs: Mutex<HashMap<String, Program>>,
    managed: Mutex<HashMap<String, Program>>,
    vanishing: Mutex<HashMap<String, usize>>,
    effects: Vec<Effect>,
    failing: Vec<&'static str>,
    commands: Mutex<Vec<String>>,
    templates: HashMap<String, Vec<u8>>,
    fetches: Mutex<Vec<String>>,
}

impl FakeSystem {
    /// A fresh machine with a package manager, `curl` and shells, but none of
    /// the managed tools.
    pub fn fresh(home: &Path) -> Self {
        let system = Self {
            nvm_root: home.join(".nvm"),
            programs: Mutex::new(HashMap::new()),
            managed: Mutex::new(HashMap::new()),
            vanishing: Mutex::new(HashMap::new()),
            effects: default_effects(),
            failing: Vec::new(),
            commands: Mutex::new(Vec::new()),
            templates: HashMap::new(),
            fetches: Mutex::new(Vec::new()),
        };
        for name in ["apt-get", "curl", "bash", "sh"] {
            system.add(name, &format!("/usr/bin/{name}"), None);
        }
        system
    }

    /// A machine where every managed tool is already satisfied.
    pub fn provisioned(home: &Path) -> Self {
        let system = Self::fresh(home);
        system.add("node", "/usr/bin/node", Some(Version::new(22, 3, 0)));
        system.add("npm", "/usr/bin/npm", Some(Version::new(10, 8, 1)));
        system.add("npx", "/usr/bin/npx", Some(Version::new(10, 8, 1)));
        system.add("uv", "/usr/local/bin/uv", Some(Version::new(0, 4, 18)));
        system.add("uvx", "/usr/local/bin/uvx", Some(Version::new(0, 4, 18)));
        system.add("codex", "/usr/local/bin/codex", Some(Version::new(0, 46, 0)));
        system
    }

    pub fn add(&self, name: &str, path: &str, version: Option<Version>) {
        let path = PathBuf::from(path);
        let layer = if path.starts_with(&self.nvm_root) {
            &self.managed
        } else {
            &self.programs
        };
        layer
            .lock()
            .unwrap()
            .insert(name.to_string(), Program { path, version });
    }

    pub fn programs_remove(&self, name: &str) {
        self.programs.lock().unwrap().remove(name);
        self.managed.lock().unwrap().remove(name);
    }

    /// `name` disappears after it has been checked `times` times.
    pub fn vanish_after(&self, name: &str, times: usize) {
        self.vanishing
            .lock()
            .unwrap()
            .insert(name.to_string(), times);
    }

    fn tick(&self, name: &str) {
        let mut vanishing = self.vanishing.lock().unwrap();
        if let Some(left) = vanishing.get_mut(name) {
            if *left == 0 {
                vanishing.remove(name);
                drop(vanishing);
                self.programs_remove(name);
            } else {
                *left -= 1;
            }
        }
    }

    /// Resolve `name`, looking past the version manager layer when `durable`.
    fn lookup(&self, name: &str, durable: bool) -> Option<Program> {
        if !durable {
            if let Some(program) = self.managed.lock().unwrap().get(name) {
                return Some(program.clone());
            }
        }
        self.programs.lock().unwrap().get(name).cloned()
    }

    fn status(&self, spec: &ToolSpec, durable: bool) -> ToolStatus {
        self.tick(&spec.command);
        let Some(program) = self.lookup(&spec.command, durable) else {
            return ToolStatus::absent();
        };
        let missing_companions: Vec<String> = spec
            .companions
            .iter()
            .filter(|c| self.lookup(c, durable).is_none())
            .cloned()
            .collect();
        ToolStatus {
            present: missing_companions.is_empty(),
            shadowed: program.path.starts_with(&self.nvm_root),
            path: Some(program.path),
            version: program.version,
            missing_companions,
        }
    }

    /// Commands containing `pattern` report success but change nothing.
    pub fn without_effect(mut self, pattern: &str) -> Self {
        self.effects.retain(|e| !e.pattern.contains(pattern));
        self
    }

    /// Commands containing `pattern` exit non-zero.
    pub fn failing(mut self, pattern: &'static str) -> Self {
        self.failing.push(pattern);
        self
    }

    pub fn serve_template(mut self, url: &str, body: &str) -> Self {
        self.templates.insert(url.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

fn default_effects() -> Vec<Effect> {
    vec![
        Effect {
            pattern: "apt-get install -y nodejs",
            programs: vec![
                ("node", "/usr/bin/node", Some(Version::new(22, 3, 0))),
                ("npm", "/usr/bin/npm", Some(Version::new(10, 8, 1))),
                ("npx", "/usr/bin/npx", Some(Version::new(10, 8, 1))),
            ],
        },
        Effect {
            pattern: "astral.sh/uv/install.sh",
            programs: vec![
                ("uv", "/usr/local/bin/uv", Some(Version::new(0, 4, 18))),
                ("uvx", "/usr/local/bin/uvx", Some(Version::new(0, 4, 18))),
            ],
        },
        Effect {
            pattern: "npm install -g @openai/codex",
            programs: vec![("codex", "/usr/local/bin/codex", Some(Version::new(0, 46, 0)))],
        },
    ]
}

#[async_trait]
impl Probe for FakeSystem {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.lookup(name, false).map(|p| p.path)
    }

    async fn probe(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError> {
        Ok(self.status(spec, false))
    }

    async fn probe_durable(&self, spec: &ToolSpec) -> Result<ToolStatus, ProbeError> {
        Ok(self.status(spec, true))
    }
}

#[async_trait]
impl CommandRunner for FakeSystem {
    async fn run(&self, command: &StructuredCommand) -> std::io::Result<CommandOutput> {
        let rendered = command.to_string();
        self.commands.lock().unwrap().push(rendered.clone());

        if self.failing.iter().any(|p| rendered.contains(p)) {
            return Ok(CommandOutput::failed(1, "E: simulated failure"));
        }
        for effect in self.effects.iter().filter(|e| rendered.contains(e.pattern)) {
            for (name, path, version) in &effect.programs {
                self.add(name, path, version.clone());
            }
        }
        Ok(CommandOutput::ok())
    }
}

#[async_trait]
impl TemplateFetcher for FakeSystem {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, MaterializeError> {
        self.fetches.lock().unwrap().push(url.to_string());
        self.templates
            .get(url)
            .cloned()
            .ok_or_else(|| MaterializeError::FetchFailed {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
            })
    }
}

/// Scratch home, working directory and template directory for one test.
pub struct Sandbox {
    pub root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        for dir in ["home", "work", "templates", "allowed"] {
            std::fs::create_dir(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    /// Sandbox with both templates present locally.
    pub fn with_templates() -> Self {
        let sandbox = Self::new();
        std::fs::write(sandbox.templates().join("codex-config.toml"), CODEX_TEMPLATE).unwrap();
        std::fs::write(sandbox.templates().join("mcp-servers.json"), MCP_TEMPLATE).unwrap();
        sandbox
    }

    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    pub fn templates(&self) -> PathBuf {
        self.root.path().join("templates")
    }

    pub fn allowed(&self) -> PathBuf {
        self.root.path().join("allowed")
    }

    pub fn codex_config(&self) -> PathBuf {
        self.home().join(".codex/config.toml")
    }

    pub fn mcp_config(&self) -> PathBuf {
        self.home().join(".config/mcp/servers.json")
    }

    /// A root context with the allowed directory pinned to the sandbox.
    pub fn context(&self) -> RunContext {
        let mut ctx = RunContext::synthetic(self.home(), self.root.path().join("work"))
            .with_var(vars::TEMPLATE_DIR, self.templates().display().to_string())
            .with_var(vars::ALLOWED_DIR, self.allowed().display().to_string());
        ctx.is_root = true;
        ctx.system_bin_dir = self.root.path().join("usr-local-bin");
        ctx
    }

    pub fn specs_and_targets(&self, ctx: &RunContext) -> (Vec<ToolSpec>, Vec<ConfigTarget>) {
        let settings = Settings::from_context(ctx).unwrap();
        let tools = agent_bootstrap::default_tool_specs(&settings, ctx);
        let targets = resolve_config_targets(&settings, ctx).unwrap();
        (tools, targets)
    }
}
