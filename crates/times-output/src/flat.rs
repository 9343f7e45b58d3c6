//! Flat output: one CSV file per table.

use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use times_model::{Table, TableStore};

use crate::common::{ensure_output_dir, remove_files_with_suffix};
use crate::error::{OutputError, Result};

/// File name suffix of flat output tables.
pub const CSV_OUTPUT_SUFFIX: &str = "_output.csv";

/// Write one `<name>_output.csv` per table, replacing any previous run's files.
pub fn write_csv_tables(tables: &TableStore, output_dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_output_dir(output_dir)?;
    remove_files_with_suffix(output_dir, CSV_OUTPUT_SUFFIX)?;

    let mut written = Vec::with_capacity(tables.len());
    for (name, table) in tables {
        let path = output_dir.join(format!("{name}{CSV_OUTPUT_SUFFIX}"));
        write_csv_table(&path, table)?;
        written.push(path);
    }
    info!(
        tables = written.len(),
        output_dir = %output_dir.display(),
        "wrote CSV tables"
    );
    Ok(written)
}

/// Write a table with its header row.
pub fn write_csv_table(path: &Path, table: &Table) -> Result<()> {
    let csv_err = |e: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(table.columns()).map_err(csv_err)?;
    for row in table.rows() {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| OutputError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
