//! Version query execution.

use crate::ProbeError;
use std::path::Path;
use tokio::process::Command;

/// Run an executable's version query and capture its output.
///
/// There is no timeout: a tool that hangs on its version query hangs the
/// run, like every other external invocation.
///
/// # Returns
///
/// - `Ok(Some(output))` with stdout (stderr when stdout is empty)
/// - `Ok(None)` if the tool ran but exited non-zero
/// - `Err(ProbeError)` if the already-resolved executable could not be run
pub(crate) async fn query_version(path: &Path, flag: &str) -> Result<Option<String>, ProbeError> {
    let output = Command::new(path)
        .arg(flag)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ProbeError::PermissionDenied {
                    path: path.to_path_buf(),
                }
            } else {
                ProbeError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

    if !output.status.success() {
        tracing::debug!(
            path = %path.display(),
            code = ?output.status.code(),
            "version query exited unsuccessfully"
        );
        return Ok(None);
    }

    // Try stdout first, fall back to stderr (some tools write version to stderr)
    let out = if !output.stdout.is_empty() {
        output.stdout
    } else {
        output.stderr
    };

    Ok(Some(String::from_utf8_lossy(&out).into_owned()))
}
