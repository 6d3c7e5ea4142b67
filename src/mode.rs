//! Execution mode policy.
//!
//! This module provides the [`ExecutionMode`] struct that every side-effecting
//! operation consults before touching the filesystem or spawning an installer.

/// Process-wide execution policy, set once from CLI flags.
///
/// # Default Behavior
///
/// By default a run is real (not dry-run), may install missing tools and may
/// write config files.
///
/// # Example
///
/// ```rust
/// use agent_bootstrap::ExecutionMode;
///
/// let mode = ExecutionMode::default();
/// assert!(!mode.dry_run);
/// assert!(mode.install_allowed);
///
/// // `--dry-run --no-install`
/// let mode = ExecutionMode {
///     dry_run: true,
///     install_allowed: false,
///     ..Default::default()
/// };
/// assert!(mode.write_config_allowed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionMode {
    /// Log intended actions instead of performing them.
    pub dry_run: bool,

    /// Whether missing tools may be installed (`--no-install` clears this).
    pub install_allowed: bool,

    /// Whether config files may be materialized (`--no-config` clears this).
    pub write_config_allowed: bool,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        Self {
            dry_run: false,
            install_allowed: true,
            write_config_allowed: true,
        }
    }
}

impl ExecutionMode {
    /// Build a mode from the three CLI switches.
    pub fn from_flags(no_install: bool, no_config: bool, dry_run: bool) -> Self {
        Self {
            dry_run,
            install_allowed: !no_install,
            write_config_allowed: !no_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        let mode = ExecutionMode::default();
        assert!(!mode.dry_run);
        assert!(mode.install_allowed);
        assert!(mode.write_config_allowed);
    }

    #[test]
    fn test_from_flags() {
        let mode = ExecutionMode::from_flags(true, false, true);
        assert!(mode.dry_run);
        assert!(!mode.install_allowed);
        assert!(mode.write_config_allowed);

        let mode = ExecutionMode::from_flags(false, true, false);
        assert!(!mode.dry_run);
        assert!(mode.install_allowed);
        assert!(!mode.write_config_allowed);
    }

    #[test]
    fn test_copy() {
        let mode = ExecutionMode::from_flags(false, false, true);
        let copied = mode;
        assert_eq!(mode, copied);
    }
}
