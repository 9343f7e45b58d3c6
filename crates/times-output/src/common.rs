//! Shared filesystem helpers for output writers.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{OutputError, Result};

/// Create the output directory if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_output_dir(parent)?;
    }
    Ok(())
}

/// Delete the files directly in `dir` whose name ends with `suffix`.
///
/// Returns the removed paths, sorted.
pub fn remove_files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| OutputError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut removed = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| OutputError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if matches && path.is_file() {
            fs::remove_file(&path).map_err(|e| OutputError::RemoveStale {
                path: path.clone(),
                source: e,
            })?;
            removed.push(path);
        }
    }
    removed.sort();
    if !removed.is_empty() {
        debug!(count = removed.len(), dir = %dir.display(), suffix, "removed stale outputs");
    }
    Ok(removed)
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| OutputError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
