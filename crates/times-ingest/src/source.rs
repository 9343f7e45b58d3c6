//! Sources of raw tables: direct extraction and the snapshot cache.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use times_model::{RawTable, sort_raw_tables};

use crate::error::{IngestError, Result};
use crate::extract::TableExtractor;

/// Produces the raw tables for a list of input files.
pub trait RawTableSource {
    fn load(&self, files: &[PathBuf]) -> Result<Vec<RawTable>>;
}

/// Extracts every file in parallel and returns the tables sorted by location.
#[derive(Debug, Clone, Default)]
pub struct ExtractingSource<E> {
    extractor: E,
}

impl<E: TableExtractor> ExtractingSource<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }
}

impl<E: TableExtractor> RawTableSource for ExtractingSource<E> {
    fn load(&self, files: &[PathBuf]) -> Result<Vec<RawTable>> {
        let start = Instant::now();
        let per_file = files
            .par_iter()
            .map(|path| self.extractor.extract(path))
            .collect::<Result<Vec<_>>>()?;
        let mut tables: Vec<RawTable> = per_file.into_iter().flatten().collect();
        sort_raw_tables(&mut tables);
        info!(
            files = files.len(),
            tables = tables.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "extracted raw tables"
        );
        Ok(tables)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    fingerprint: String,
    tables: Vec<RawTable>,
}

/// Persists the raw tables of another source as JSON and optionally reuses them.
///
/// A persisted snapshot is reused only when `reuse` is set and its
/// fingerprint matches the current input list. Fresh extractions are always
/// written back.
#[derive(Debug, Clone)]
pub struct SnapshotSource<S> {
    inner: S,
    path: PathBuf,
    reuse: bool,
}

impl<S: RawTableSource> SnapshotSource<S> {
    pub fn new(inner: S, path: impl Into<PathBuf>, reuse: bool) -> Self {
        Self {
            inner,
            path: path.into(),
            reuse,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| IngestError::read(&self.path, e))?;
        let snapshot = serde_json::from_str(&contents).map_err(|e| IngestError::Snapshot {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot).map_err(|e| IngestError::Snapshot {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|e| IngestError::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl<S: RawTableSource> RawTableSource for SnapshotSource<S> {
    fn load(&self, files: &[PathBuf]) -> Result<Vec<RawTable>> {
        let fingerprint = input_fingerprint(files);
        if self.reuse {
            match self.read_snapshot()? {
                Some(snapshot) if snapshot.fingerprint == fingerprint => {
                    warn!(
                        snapshot = %self.path.display(),
                        tables = snapshot.tables.len(),
                        "using cached raw-table snapshot"
                    );
                    return Ok(snapshot.tables);
                }
                Some(_) => debug!(
                    snapshot = %self.path.display(),
                    "snapshot fingerprint does not match inputs; re-extracting"
                ),
                None => debug!(snapshot = %self.path.display(), "no snapshot found"),
            }
        }

        let tables = self.inner.load(files)?;
        let snapshot = Snapshot {
            fingerprint,
            tables,
        };
        self.write_snapshot(&snapshot)?;
        Ok(snapshot.tables)
    }
}

/// SHA-256 (hex) of the sorted input path list.
pub fn input_fingerprint(files: &[PathBuf]) -> String {
    let mut sorted: Vec<&PathBuf> = files.iter().collect();
    sorted.sort();
    let mut hasher = Sha256::new();
    for path in sorted {
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_ignores_input_order() {
        let a = vec![PathBuf::from("a.xlsx"), PathBuf::from("b.xlsx")];
        let b = vec![PathBuf::from("b.xlsx"), PathBuf::from("a.xlsx")];
        assert_eq!(input_fingerprint(&a), input_fingerprint(&b));
        assert_eq!(input_fingerprint(&a).len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_inputs() {
        let a = vec![PathBuf::from("a.xlsx")];
        let b = vec![PathBuf::from("a.xlsx"), PathBuf::from("c.xlsx")];
        assert_ne!(input_fingerprint(&a), input_fingerprint(&b));
    }
}
