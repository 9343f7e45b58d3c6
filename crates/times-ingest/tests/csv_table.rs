//! Tests for CSV table loading.

use std::fs;

use tempfile::TempDir;
use times_ingest::{read_csv_table, read_csv_tables};

#[test]
fn reads_header_with_bom_and_pads_short_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("PRC.csv");
    fs::write(&path, "\u{feff}REG,PRC,TEXT\nEU,T1,Coal plant\nUS,T2\n").expect("write csv");

    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.columns(), ["REG", "PRC", "TEXT"]);
    assert_eq!(table.rows()[1], vec!["US", "T2", ""]);
}

#[test]
fn keys_tables_by_name_before_first_dot() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("ACT_BND.csv"), "REG,VALUE\nEU,1\n").expect("write csv");
    fs::write(dir.path().join("PRC.v2.csv"), "PRC\nT1\n").expect("write csv");
    fs::write(dir.path().join("readme.txt"), "ignored").expect("write txt");

    let store = read_csv_tables(dir.path()).expect("read tables");
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["ACT_BND", "PRC"]);
    assert_eq!(store.row_count(), 2);
}

#[test]
fn repeated_headers_are_disambiguated() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("X.csv");
    fs::write(&path, "REG,REG,VALUE\nEU,EU,1\n").expect("write csv");
    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.columns(), ["REG", "REG.1", "VALUE"]);
}
