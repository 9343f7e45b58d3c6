//! Tests for input discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use times_ingest::{IngestError, list_workbook_files, resolve_input_files};

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir");
    }
    fs::write(&path, b"").expect("write file");
    path
}

#[test]
fn lists_workbooks_recursively_and_skips_lock_files() {
    let dir = TempDir::new().expect("temp dir");
    let base = touch(dir.path(), "VT_BASE.xlsx");
    let nested = touch(dir.path(), "SuppXLS/Scen_Upper.XLSX");
    let _ = touch(dir.path(), "~$VT_BASE.xlsx");
    let _ = touch(dir.path(), "notes.csv");

    let files = list_workbook_files(dir.path()).expect("list workbooks");
    let mut expected = vec![nested, base];
    expected.sort();
    assert_eq!(files, expected);
}

#[test]
fn single_input_must_be_a_directory() {
    let dir = TempDir::new().expect("temp dir");
    let file = touch(dir.path(), "VT_BASE.xlsx");
    let err = resolve_input_files(&[file]).unwrap_err();
    assert!(matches!(err, IngestError::NotADirectory { .. }));
}

#[test]
fn no_inputs_is_an_error() {
    assert!(matches!(
        resolve_input_files(&[]).unwrap_err(),
        IngestError::NoInputs
    ));
}

#[test]
fn several_inputs_are_taken_verbatim() {
    let inputs = vec![PathBuf::from("b.xlsx"), PathBuf::from("a.xlsx")];
    assert_eq!(resolve_input_files(&inputs).expect("file list"), inputs);
}
