//! Removal of stale log files from earlier invocations

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RotationError {
    #[error("Failed to list log directory {path:?}: {source}")]
    List { path: PathBuf, source: io::Error },

    #[error("Failed to remove log file {path:?}: {source}")]
    Remove { path: PathBuf, source: io::Error },
}

/// Deletes every file next to `active` whose name starts with `prefix`,
/// except `active` itself
///
/// Returns the removed paths, sorted.
pub fn rotate(active: &Path, prefix: &str) -> Result<Vec<PathBuf>, RotationError> {
    let dir = match active.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let active_name = active.file_name();

    let list_error = |source: io::Error| RotationError::List {
        path: dir.to_path_buf(),
        source,
    };

    let mut stale = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let entry = entry.map_err(list_error)?;
        let name = entry.file_name();

        if Some(name.as_os_str()) == active_name {
            continue;
        }
        if !name.to_string_lossy().starts_with(prefix) {
            continue;
        }
        if !entry.file_type().map_err(list_error)?.is_file() {
            continue;
        }
        stale.push(entry.path());
    }
    stale.sort();

    for path in &stale {
        debug!("Removing existing log file: {}", path.display());
        fs::remove_file(path).map_err(|source| RotationError::Remove {
            path: path.clone(),
            source,
        })?;
    }

    Ok(stale)
}
