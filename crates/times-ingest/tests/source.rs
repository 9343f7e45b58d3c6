//! Tests for the snapshot cache around a raw-table source.

use std::cell::Cell;
use std::path::PathBuf;

use tempfile::TempDir;
use times_ingest::{RawTableSource, Result, SnapshotSource};
use times_model::{RawTable, Table};

struct CountingSource {
    calls: Cell<usize>,
}

impl CountingSource {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
        }
    }
}

impl RawTableSource for &CountingSource {
    fn load(&self, files: &[PathBuf]) -> Result<Vec<RawTable>> {
        self.calls.set(self.calls.get() + 1);
        Ok(files
            .iter()
            .map(|path| {
                let table = Table::from_rows(vec!["a".to_string()], vec![vec!["1".to_string()]])
                    .expect("valid table");
                RawTable::new(path, "Sheet1", "A2:A3", "~FI_T", table)
            })
            .collect())
    }
}

#[test]
fn reuses_snapshot_for_same_inputs() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = dir.path().join("raw_tables.json");
    let files = vec![PathBuf::from("a.xlsx")];
    let inner = CountingSource::new();

    let source = SnapshotSource::new(&inner, &snapshot, true);
    let first = source.load(&files).expect("first load");
    assert!(snapshot.exists());
    let second = source.load(&files).expect("second load");

    assert_eq!(inner.calls.get(), 1);
    assert_eq!(first, second);
}

#[test]
fn re_extracts_when_inputs_change() {
    let dir = TempDir::new().expect("temp dir");
    let snapshot = dir.path().join("raw_tables.json");
    let inner = CountingSource::new();
    let source = SnapshotSource::new(&inner, &snapshot, true);

    source.load(&[PathBuf::from("a.xlsx")]).expect("first load");
    let tables = source
        .load(&[PathBuf::from("a.xlsx"), PathBuf::from("b.xlsx")])
        .expect("second load");

    assert_eq!(inner.calls.get(), 2);
    assert_eq!(tables.len(), 2);
}

#[test]
fn without_reuse_always_extracts() {
    let dir = TempDir::new().expect("temp dir");
    let inner = CountingSource::new();
    let source = SnapshotSource::new(&inner, dir.path().join("raw_tables.json"), false);
    let files = vec![PathBuf::from("a.xlsx")];

    source.load(&files).expect("first load");
    source.load(&files).expect("second load");
    assert_eq!(inner.calls.get(), 2);
}
