//! Diagnostic dumps of pipeline tables.
//!
//! Every table gets a small header block followed by its CSV body:
//!
//! ```text
//! sheetname: Sheet1
//! range: B3:E10
//! filename: VT_BASE.xlsx
//! tag: ~FI_T
//! types: region (str), value (str)
//! region,value
//! EU,5
//!
//!
//! ```

use std::path::Path;

use polars::prelude::{CsvWriter, SerWriter};
use tracing::debug;

use times_model::{PipelineTables, RawTable, Table, table_to_frame};

use crate::common::{ensure_parent_dir, write_file};
use crate::error::{OutputError, Result};

/// Write a dump of `tables` to `path`, creating parent directories.
pub fn dump_tables(tables: &PipelineTables, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    write_file(path, &render_dump(tables)?)?;
    debug!(
        tables = tables.table_count(),
        path = %path.display(),
        "dumped tables"
    );
    Ok(())
}

/// Render the dump text. Raw tables are listed by location, named tables by name.
pub fn render_dump(tables: &PipelineTables) -> Result<String> {
    let mut out = String::new();
    match tables {
        PipelineTables::Raw(raw) => {
            let mut sorted: Vec<&RawTable> = raw.iter().collect();
            sorted.sort_by(|a, b| a.location_cmp(b));
            for table in sorted {
                out.push_str(&format!("sheetname: {}\n", table.sheetname));
                out.push_str(&format!("range: {}\n", table.range));
                out.push_str(&format!("filename: {}\n", table.filename.display()));
                if !table.uc_sets.is_empty() {
                    let labels: Vec<&str> = table.uc_sets.iter().map(String::as_str).collect();
                    out.push_str(&format!("uc_sets: {}\n", labels.join(", ")));
                }
                out.push_str(&format!("tag: {}\n", table.tag));
                push_table_body(&mut out, &table.tag, &table.table)?;
            }
        }
        PipelineTables::Store(store) => {
            for (name, table) in store {
                out.push_str(&format!("tag: {name}\n"));
                push_table_body(&mut out, name, table)?;
            }
        }
    }
    Ok(out)
}

fn push_table_body(out: &mut String, name: &str, table: &Table) -> Result<()> {
    let frame_err = |message: String| OutputError::Frame {
        table: name.to_string(),
        message,
    };
    let mut df = table_to_frame(table).map_err(|e| frame_err(e.to_string()))?;

    let types: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| format!("{} ({})", column.name(), column.dtype()))
        .collect();
    out.push_str(&format!("types: {}\n", types.join(", ")));

    let mut buf: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| frame_err(e.to_string()))?;
    let body = String::from_utf8(buf).map_err(|e| frame_err(e.to_string()))?;
    out.push_str(&body);
    out.push_str("\n\n");
    Ok(())
}
