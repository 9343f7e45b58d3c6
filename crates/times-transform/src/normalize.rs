//! Generic normalization stages applied before the mapping rules.

use tracing::debug;

use times_model::{PipelineTables, RawTable, Table, TableStore, TimesConfig};

use crate::error::Result;
use crate::stage::{FnStage, Stage, expect_raw, raw_table_stage};

const FILL_TABLE_TAG: &str = "~TFM_FILL";

/// Trim and uppercase tags; trim and lowercase column names.
pub fn normalize_tags_columns() -> impl Stage {
    raw_table_stage("normalize_tags_columns", |mut raw: RawTable| {
        raw.tag = raw.tag.trim().to_uppercase();
        raw.table.rename_columns(|name| name.trim().to_lowercase());
        Some(raw)
    })
}

/// Drop `~TFM_FILL` tables; they only describe spreadsheet fill-in requests.
pub fn remove_fill_tables() -> impl Stage {
    raw_table_stage("remove_fill_tables", |raw: RawTable| {
        (!raw.tag.to_uppercase().starts_with(FILL_TABLE_TAG)).then_some(raw)
    })
}

/// Drop rows whose first cell starts with `*`, and rows with no content.
pub fn remove_comment_rows() -> impl Stage {
    raw_table_stage("remove_comment_rows", |mut raw: RawTable| {
        raw.table.retain_rows(|row| {
            let commented = row.first().is_some_and(|cell| cell.trim_start().starts_with('*'));
            let blank = row.iter().all(|cell| cell.trim().is_empty());
            !commented && !blank
        });
        Some(raw)
    })
}

/// Drop columns with an empty name or a name starting with `*`.
pub fn remove_comment_cols() -> impl Stage {
    raw_table_stage("remove_comment_cols", |mut raw: RawTable| {
        raw.table
            .retain_columns(|name| !name.trim().is_empty() && !name.trim_start().starts_with('*'));
        Some(raw)
    })
}

/// Merge raw tables sharing a tag into one table per tag.
pub fn merge_tables() -> impl Stage {
    FnStage::new(
        "merge_tables",
        |_config: &TimesConfig, tables: PipelineTables| -> Result<PipelineTables> {
            let raw = expect_raw("merge_tables", tables)?;
            Ok(PipelineTables::Store(merge_raw_tables(raw)?))
        },
    )
}

/// Concatenate tables by tag.
///
/// The merged header is the union of the input headers in first-seen order;
/// cells for columns a table lacks are empty.
pub fn merge_raw_tables(raw: Vec<RawTable>) -> Result<TableStore> {
    let mut groups: Vec<(String, Vec<Table>)> = Vec::new();
    for table in raw {
        match groups.iter_mut().find(|(tag, _)| *tag == table.tag) {
            Some((_, tables)) => tables.push(table.table),
            None => groups.push((table.tag, vec![table.table])),
        }
    }

    let mut store = TableStore::new();
    for (tag, tables) in groups {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in table.columns() {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        if tables.iter().any(|table| table.width() != columns.len()) {
            debug!(tag = %tag, columns = columns.len(), "merging tables with differing columns");
        }

        let mut merged = Table::new(columns.clone())?;
        for table in tables {
            let indices: Vec<Option<usize>> = columns
                .iter()
                .map(|column| table.column_index(column))
                .collect();
            for row in table.into_rows() {
                let merged_row = indices
                    .iter()
                    .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                    .collect();
                merged.push_row(merged_row)?;
            }
        }
        store.insert(tag, merged);
    }
    Ok(store)
}
