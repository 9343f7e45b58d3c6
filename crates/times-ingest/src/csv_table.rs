//! Reading CSV files into tables.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use times_model::{Table, TableStore, dedupe_column_names};

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file with a header row into a table.
///
/// Cell values are kept verbatim. Short rows are padded with empty cells and
/// repeated headers get `.N` suffixes.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, &e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::csv(path, &e))?
        .iter()
        .map(normalize_header)
        .collect();
    let headers = dedupe_column_names(headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, &e))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    Ok(Table::from_rows(headers, rows)?)
}

/// Load every `.csv` file of a directory, keyed by file name up to the first `.`.
pub fn read_csv_tables(dir: &Path) -> Result<TableStore> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort();

    let mut store = TableStore::new();
    for path in paths {
        let Some(name) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
        else {
            continue;
        };
        let name = name.to_string();
        let table = read_csv_table(&path)?;
        debug!(table = %name, rows = table.height(), "loaded csv table");
        store.insert(name, table);
    }
    Ok(store)
}
