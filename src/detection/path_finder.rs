//! Search-path executable lookup with fallback locations.

use crate::RunContext;
use std::path::{Path, PathBuf};

/// System fallback paths to check if executable not found on the search path.
const FALLBACK_PATHS: &[&str] = &["/usr/local/bin", "/usr/bin"];

/// Find an executable by name.
///
/// This function first resolves the executable against the context's search
/// path via the `which` crate. If not found, it checks common system
/// locations and the user-local bin directories, which is where user-prefix
/// installs land even when they are not yet on `PATH`.
///
/// # Returns
///
/// `Some(PathBuf)` if the executable is found, `None` otherwise.
pub(crate) fn find_executable(name: &str, ctx: &RunContext) -> Option<PathBuf> {
    // Primary: search path lookup via which crate
    if let Ok(path) = which::which_in(name, ctx.search_path.as_ref(), &ctx.cwd) {
        return Some(path);
    }

    fallback_candidates(name, ctx)
        .into_iter()
        .find(|path| path.is_file())
}

/// Find an executable by name, ignoring every match under `excluded`.
///
/// Walks all search-path matches in order, then the same fallback
/// locations as [`find_executable`]. Used to see past a version manager
/// copy that shadows a system install.
pub(crate) fn find_executable_excluding(
    name: &str,
    ctx: &RunContext,
    excluded: &[PathBuf],
) -> Option<PathBuf> {
    let outside = |path: &Path| !excluded.iter().any(|root| path.starts_with(root));

    if let Ok(mut matches) = which::which_in_all(name, ctx.search_path.as_ref(), &ctx.cwd) {
        if let Some(path) = matches.find(|path| outside(path)) {
            return Some(path);
        }
    }

    fallback_candidates(name, ctx)
        .into_iter()
        .find(|path| outside(path) && path.is_file())
}

/// System locations first, then home directory locations (user-local installs).
fn fallback_candidates(name: &str, ctx: &RunContext) -> Vec<PathBuf> {
    FALLBACK_PATHS
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .chain([ctx.user_bin_dir().join(name), ctx.home.join("bin").join(name)])
        .collect()
}
