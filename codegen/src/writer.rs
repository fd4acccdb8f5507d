//! Artifact writer.
//!
//! Persists the rendered artifacts. Every destination is written on its own:
//! a failed write is logged and recorded, the remaining writes still happen,
//! and nothing already written is rolled back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ArtifactNames;
use crate::RenderedArtifacts;

/// Outcome of one [`write_artifacts`] call.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Files written successfully.
    pub written: Vec<PathBuf>,
    /// Files that could not be written, with the cause.
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl WriteReport {
    /// `true` when every artifact was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes one file, creating its parent directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Writes the three artifacts and the forwarding file into `out_dir`.
///
/// Consumes the rendered text; the caller keeps nothing.
pub fn write_artifacts(
    rendered: RenderedArtifacts,
    out_dir: &Path,
    names: &ArtifactNames,
) -> WriteReport {
    let mut report = WriteReport::default();
    let jobs = [
        (&names.public, rendered.public),
        (&names.internal, rendered.internal),
        (&names.definitions, rendered.definitions),
        (&names.forwarding, rendered.forwarding),
    ];
    for (name, content) in jobs {
        let path = out_dir.join(name);
        match write_file(&path, &content) {
            Ok(()) => {
                log::info!("wrote {} ({} bytes)", path.display(), content.len());
                report.written.push(path);
            }
            Err(err) => {
                log::error!("{err:#}");
                report.failed.push((path, err));
            }
        }
    }
    report
}
