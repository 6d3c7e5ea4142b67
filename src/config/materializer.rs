//! One-shot config file materialization.

use super::atomic::{create_dir_restricted, Commit, StagedWrite};
use super::template::{substitute, TemplateStage};
use super::target::CONFIG_DIR_MODE;
use super::{ConfigTarget, MaterializeError, TemplateSource};
use crate::ExecutionMode;
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a target was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The destination already exists.
    AlreadyExists,
    /// The run is a dry run.
    DryRun,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => f.write_str("already exists"),
            Self::DryRun => f.write_str("dry run"),
        }
    }
}

/// Result of materializing one [`ConfigTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// The config was created at this path.
    Written(PathBuf),
    /// Nothing was written.
    Skipped(SkipReason),
}

/// Writes config files from templates, never overwriting existing ones.
///
/// # Write Sequence
///
/// 1. Skip if anything (file, directory, dangling link) is at the destination
/// 2. In dry-run mode, log the planned write and skip
/// 3. Load the template, locally or from the staged remote copy
/// 4. Substitute placeholders
/// 5. Create missing parent directories owner-only
/// 6. Stage a `0600` temp file beside the destination and rename it into place
#[derive(Debug, Clone, Copy)]
pub struct Materializer {
    mode: ExecutionMode,
}

impl Materializer {
    /// Create a materializer for the given mode.
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    /// Materialize `target`.
    ///
    /// `stage` must hold the target's template when its source is remote.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializeError`] when the template cannot be loaded or the
    /// file cannot be written.
    pub fn materialize(
        &self,
        target: &ConfigTarget,
        stage: Option<&TemplateStage>,
    ) -> Result<MaterializeOutcome, MaterializeError> {
        let dest = &target.destination;
        if occupied(dest) {
            tracing::info!("{} config exists at {}, leaving it alone", target.name, dest.display());
            return Ok(MaterializeOutcome::Skipped(SkipReason::AlreadyExists));
        }

        if self.mode.dry_run {
            let values: Vec<String> = target
                .substitutions
                .iter()
                .map(|(token, value)| format!("{token}={value}"))
                .collect();
            tracing::info!(
                "[dry-run] would write {} from {} with {}",
                dest.display(),
                target.template,
                values.join(", ")
            );
            return Ok(MaterializeOutcome::Skipped(SkipReason::DryRun));
        }

        let template = load_template(&target.template, stage)?;
        let rendered = substitute(&template, &target.substitutions);

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_restricted(parent, CONFIG_DIR_MODE)
                .map_err(|e| MaterializeError::io("creating", parent, e))?;
        }

        let staged = StagedWrite::stage(dest, rendered.as_bytes(), target.mode)
            .map_err(|e| MaterializeError::io("staging", dest, e))?;
        match staged
            .commit()
            .map_err(|e| MaterializeError::io("writing", dest, e))?
        {
            Commit::Written => {
                tracing::info!("wrote {} config to {}", target.name, dest.display());
                Ok(MaterializeOutcome::Written(dest.clone()))
            }
            Commit::AlreadyExists => {
                tracing::info!(
                    "{} config appeared at {} during the write, leaving it alone",
                    target.name,
                    dest.display()
                );
                Ok(MaterializeOutcome::Skipped(SkipReason::AlreadyExists))
            }
        }
    }
}

fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

fn load_template(
    source: &TemplateSource,
    stage: Option<&TemplateStage>,
) -> Result<String, MaterializeError> {
    let path = match source {
        TemplateSource::Embedded { body, .. } => return Ok((*body).to_string()),
        TemplateSource::Local(path) => path.as_path(),
        TemplateSource::Remote(url) => stage.and_then(|s| s.path_for(url)).ok_or_else(|| {
            MaterializeError::FetchFailed {
                url: url.clone(),
                message: "template was not staged".to_string(),
            }
        })?,
    };

    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MaterializeError::TemplateMissing {
            path: path.to_path_buf(),
        },
        _ => MaterializeError::io("reading", path, e),
    })
}
