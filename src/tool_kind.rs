//! Tool kind enum identifying the CLI dependencies the bootstrapper manages.

use strum::IntoEnumIterator;

/// A CLI dependency of the agentic-coding environment.
///
/// Variants are declared in bootstrap order: the JavaScript runtime comes
/// first because later tools are installed through its package manager.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::ToolKind;
///
/// let order: Vec<_> = ToolKind::all().collect();
/// assert_eq!(order, vec![ToolKind::Node, ToolKind::Uv, ToolKind::Codex]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter)]
pub enum ToolKind {
    /// Node.js runtime with its `npm`/`npx` package runner.
    Node,
    /// Astral's `uv`, used through its `uvx` launcher.
    Uv,
    /// OpenAI's Codex CLI.
    Codex,
}

impl ToolKind {
    /// The executable probed to decide whether the tool is present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use agent_bootstrap::ToolKind;
    ///
    /// assert_eq!(ToolKind::Node.executable_name(), "node");
    /// assert_eq!(ToolKind::Uv.executable_name(), "uvx");
    /// ```
    pub fn executable_name(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Uv => "uvx",
            Self::Codex => "codex",
        }
    }

    /// Executables that must resolve alongside the primary one.
    pub fn companions(&self) -> &'static [&'static str] {
        match self {
            Self::Node => &["npm", "npx"],
            Self::Uv => &["uv"],
            Self::Codex => &[],
        }
    }

    /// Human-readable display name for the tool.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Node => "Node.js",
            Self::Uv => "uv",
            Self::Codex => "Codex CLI",
        }
    }

    /// Iterator over all tools, in bootstrap order.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
