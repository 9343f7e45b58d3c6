//! DD output: `SET` and `PARAMETER` blocks for the solver.
//!
//! A set block looks like
//!
//! ```text
//! SET PRC
//! /
//! 'REG1.COAL01' 'Coal plant'
//!
//! /;
//! ```
//!
//! and a parameter block like
//!
//! ```text
//! PARAMETER
//! ACT_BND ' '/
//! 'REG1.2020.COAL01' 10
//!
//! /;
//! ```

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use times_model::{DESCRIPTION_COLUMN, Table, TableStore, TimesConfig, VALUE_COLUMN};

use crate::common::{ensure_output_dir, remove_files_with_suffix, write_file};
use crate::error::{OutputError, Result};

/// File name suffix of DD files.
pub const DD_SUFFIX: &str = ".dd";

/// Tables routed to `ts.dd`; everything else in the DD order goes to `output.dd`.
pub const TIMESLICE_TABLES: [&str; 1] = ["ALL_TS"];

pub const TIMESLICE_DD_FILE: &str = "ts.dd";
pub const OUTPUT_DD_FILE: &str = "output.dd";

/// The DD files to write and the tables each one holds, in output order.
pub fn dd_file_routing(config: &TimesConfig) -> Vec<(&'static str, Vec<String>)> {
    let timeslices = TIMESLICE_TABLES.iter().map(|t| (*t).to_string()).collect();
    let others = config
        .dd_table_order
        .iter()
        .filter(|name| !TIMESLICE_TABLES.contains(&name.as_str()))
        .cloned()
        .collect();
    vec![(TIMESLICE_DD_FILE, timeslices), (OUTPUT_DD_FILE, others)]
}

/// Write `ts.dd` and `output.dd`, replacing any previous run's DD files.
pub fn write_dd_files(
    config: &TimesConfig,
    tables: &TableStore,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    ensure_output_dir(output_dir)?;
    remove_files_with_suffix(output_dir, DD_SUFFIX)?;

    let routing = dd_file_routing(config);
    let unrouted: Vec<&str> = tables
        .names()
        .filter(|name| !routing.iter().any(|(_, names)| names.iter().any(|n| n.as_str() == *name)))
        .collect();
    if !unrouted.is_empty() {
        warn!(
            tables = %unrouted.join(", "),
            "tables missing from the DD table order; not written"
        );
    }

    let mut written = Vec::with_capacity(routing.len());
    for (file_name, names) in &routing {
        let path = output_dir.join(file_name);
        write_file(&path, &render_dd_file(config, tables, names)?)?;
        written.push(path);
    }
    info!(
        files = written.len(),
        output_dir = %output_dir.display(),
        "wrote DD files"
    );
    Ok(written)
}

/// Render the listed tables, in order, as one DD file. Absent tables are skipped.
pub fn render_dd_file(config: &TimesConfig, tables: &TableStore, names: &[String]) -> Result<String> {
    let mut out = String::new();
    for name in names {
        let Some(table) = tables.get(name) else {
            continue;
        };
        let mut lines = if config.is_set_table(name) {
            out.push_str(&format!("SET {name}\n/\n"));
            set_lines(table)
        } else {
            out.push_str(&format!("PARAMETER\n{name} ' '/\n"));
            parameter_lines(name, table)?
        };
        lines.sort();
        for line in lines {
            out.push_str(&line);
        }
        out.push_str("\n/;\n");
    }
    Ok(out)
}

/// Indices of all columns except `exclude`, and the index of `exclude`.
fn split_columns(table: &Table, exclude: &str) -> (Vec<usize>, Option<usize>) {
    let excluded = table.column_index(exclude);
    let keys = (0..table.width()).filter(|idx| Some(*idx) != excluded).collect();
    (keys, excluded)
}

fn join_key(row: &[String], keys: &[usize]) -> String {
    keys.iter()
        .map(|&idx| row[idx].as_str())
        .collect::<Vec<_>>()
        .join(".")
}

fn set_lines(table: &Table) -> Vec<String> {
    let (keys, text) = split_columns(table, DESCRIPTION_COLUMN);
    table
        .rows()
        .iter()
        .map(|row| {
            let key = join_key(row, &keys);
            match text {
                Some(idx) => format!("'{key}' '{}'\n", row[idx]),
                None => format!("'{key}'\n"),
            }
        })
        .collect()
}

fn parameter_lines(name: &str, table: &Table) -> Result<Vec<String>> {
    let (keys, value) = split_columns(table, VALUE_COLUMN);
    let value = value.ok_or_else(|| OutputError::MissingValueColumn {
        table: name.to_string(),
    })?;
    Ok(table
        .rows()
        .iter()
        .map(|row| {
            let key = join_key(row, &keys);
            if key.is_empty() {
                format!("{}\n", row[value])
            } else {
                format!("'{key}' {}\n", row[value])
            }
        })
        .collect())
}
