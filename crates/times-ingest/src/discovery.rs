//! Input file discovery.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{IngestError, Result};

/// Resolve the command-line inputs into the workbooks to read.
///
/// A single input must be a directory, searched recursively for workbooks.
/// Several inputs are taken as an explicit file list.
pub fn resolve_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    match inputs {
        [] => Err(IngestError::NoInputs),
        [dir] => {
            if !dir.is_dir() {
                return Err(IngestError::NotADirectory { path: dir.clone() });
            }
            let files = list_workbook_files(dir)?;
            info!(
                files = files.len(),
                input_dir = %dir.display(),
                "loading workbooks from directory"
            );
            Ok(files)
        }
        files => Ok(files.to_vec()),
    }
}

/// Lists all `.xlsx` files below a directory.
///
/// Lock files (names starting with `~`) are skipped. Returns paths sorted.
pub fn list_workbook_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_workbooks(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_workbooks(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        if path.is_dir() {
            collect_workbooks(&path, files)?;
            continue;
        }

        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('~'));
        let is_xlsx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));

        if is_xlsx && !is_lock_file {
            files.push(path);
        }
    }
    Ok(())
}
