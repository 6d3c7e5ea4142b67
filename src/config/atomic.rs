//! Atomic, no-clobber file writes.

use std::fs::{self, DirBuilder};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

/// Result of committing a [`StagedWrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The file is now at its destination.
    Written,
    /// Something already occupied the destination; it was left untouched.
    AlreadyExists,
}

/// Fully written contents waiting to be moved into place.
///
/// The temp file lives in the destination's directory so the final rename
/// never crosses a filesystem. Dropping an uncommitted write removes the
/// temp file and leaves the destination untouched.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl StagedWrite {
    /// Write `contents` next to `destination` with permission `mode`.
    ///
    /// The parent directory must already exist.
    pub fn stage(destination: &Path, contents: &[u8], mode: u32) -> io::Result<Self> {
        let parent = parent_of(destination);
        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(".tmp")
            .tempfile_in(parent)?;
        set_mode(temp.path(), mode)?;
        temp.write_all(contents)?;
        temp.as_file().sync_all()?;

        Ok(Self {
            temp,
            destination: destination.to_path_buf(),
        })
    }

    /// Path of the staged temp file.
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Move the staged file to its destination unless one already exists.
    pub fn commit(self) -> io::Result<Commit> {
        match self.temp.persist_noclobber(&self.destination) {
            Ok(_) => Ok(Commit::Written),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                // err.file drops here, removing the temp file.
                Ok(Commit::AlreadyExists)
            }
            Err(err) => Err(err.error),
        }
    }
}

/// Create `dir` and any missing ancestors with permission `mode`.
///
/// Directories that already exist keep their permissions.
pub fn create_dir_restricted(dir: &Path, mode: u32) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(dir)
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
