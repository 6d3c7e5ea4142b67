//! Best-effort exposure of user-local binaries in the system bin directory.

use super::{CommandRunner, LinkSet, Privilege, StructuredCommand};
use crate::BestEffort;
use std::path::{Path, PathBuf};

/// Symlink each binary of `links` into `system_bin_dir`.
///
/// Tries an unprivileged `ln -sf` first and retries with elevation when that
/// fails. Any failure is returned as [`BestEffort::Failed`]; the install
/// itself already succeeded and stays usable through the user-local path.
pub(crate) async fn link_binaries(
    runner: &dyn CommandRunner,
    privilege: &Privilege,
    links: &LinkSet,
    system_bin_dir: &Path,
) -> BestEffort<Vec<PathBuf>> {
    let mut created = Vec::new();
    for binary in &links.binaries {
        let source = links.source_dir.join(binary);
        let link = system_bin_dir.join(binary);
        if source == link {
            continue;
        }
        match link_one(runner, privilege, &source, &link).await {
            Ok(()) => {
                tracing::info!("linked {} -> {}", link.display(), source.display());
                created.push(link);
            }
            Err(reason) => {
                return BestEffort::Failed(format!("linking {}: {reason}", link.display()))
            }
        }
    }
    BestEffort::Done(created)
}

async fn link_one(
    runner: &dyn CommandRunner,
    privilege: &Privilege,
    source: &Path,
    link: &Path,
) -> Result<(), String> {
    let ln = StructuredCommand::new(
        "ln",
        [
            "-sf".to_string(),
            source.display().to_string(),
            link.display().to_string(),
        ],
    );

    let first = run(runner, &ln).await;
    if first.is_ok() || matches!(privilege, Privilege::Root | Privilege::Unavailable) {
        return first;
    }

    let elevated = privilege
        .elevate(ln, "symlink creation")
        .map_err(|e| e.to_string())?;
    run(runner, &elevated).await
}

async fn run(runner: &dyn CommandRunner, cmd: &StructuredCommand) -> Result<(), String> {
    match runner.run(cmd).await {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => Err(format!(
            "`{cmd}` exited with {:?}: {}",
            output.exit_code,
            output.stderr.trim()
        )),
        Err(e) => Err(format!("`{cmd}` could not be started: {e}")),
    }
}
