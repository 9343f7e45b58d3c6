//! Projection of merged source tables into the output schema.
//!
//! Each mapping rule runs as a polars lazy query over its source table:
//! filter rows, project and rename columns, drop invalid rows. Problems with
//! a single rule never abort the run: they are reported as
//! [`MappingWarning`]s and the rule is skipped.

use std::collections::BTreeSet;

use polars::prelude::{Expr, IntoLazy, col, lit};
use thiserror::Error;
use tracing::warn;

use times_model::{
    ModelError, PipelineTables, TECHGROUP_COLUMN, TECHNAME_COLUMN, Table, TableStore,
    TimesConfig, TimesXlMap, frame_to_table, table_to_frame,
};

use crate::error::Result;
use crate::stage::{Stage, expect_store};

/// Cell text treated as missing, next to the empty string.
const NULL_SENTINEL: &str = "None";

/// A recoverable problem met while applying the mapping rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingWarning {
    #[error("cannot produce table {times_name}: source table {xl_name} not found")]
    MissingSourceTable { times_name: String, xl_name: String },

    #[error("filter column {column} not found in {xl_name} for {times_name}; filter ignored")]
    MissingFilterColumn {
        times_name: String,
        xl_name: String,
        column: String,
    },

    #[error(
        "cannot produce table {times_name}: {xl_name} is missing columns {}",
        .columns.join(", ")
    )]
    MissingColumns {
        times_name: String,
        xl_name: String,
        columns: Vec<String>,
    },

    #[error("cannot produce table {times_name}: {message}")]
    InvalidRule { times_name: String, message: String },

    #[error("unused source tables: {}", .names.join(", "))]
    UnusedTables { names: Vec<String> },
}

/// Output of [`produce_times_tables`].
#[derive(Debug, Clone, Default)]
pub struct Canonicalized {
    pub tables: TableStore,
    pub warnings: Vec<MappingWarning>,
}

impl Canonicalized {
    fn warn(&mut self, warning: MappingWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Apply every mapping rule, in configuration order, to the merged tables.
///
/// A later rule producing the same output name replaces the earlier result.
pub fn produce_times_tables(config: &TimesConfig, input: &TableStore) -> Canonicalized {
    let mut out = Canonicalized::default();
    let mut used: BTreeSet<&str> = BTreeSet::new();

    for mapping in &config.times_xl_maps {
        let Some(source) = input.get(&mapping.xl_name) else {
            out.warn(MappingWarning::MissingSourceTable {
                times_name: mapping.times_name.clone(),
                xl_name: mapping.xl_name.clone(),
            });
            continue;
        };
        used.insert(mapping.xl_name.as_str());

        match apply_rule(mapping, source, &mut out) {
            Ok(Some(table)) => {
                out.tables.insert(mapping.times_name.clone(), table);
            }
            Ok(None) => {}
            Err(err) => out.warn(invalid_rule(mapping, &err)),
        }
    }

    let unused: Vec<String> = input
        .names()
        .filter(|name| !used.contains(name))
        .map(str::to_string)
        .collect();
    if !unused.is_empty() {
        out.warn(MappingWarning::UnusedTables { names: unused });
    }
    out
}

fn invalid_rule(mapping: &TimesXlMap, err: &impl ToString) -> MappingWarning {
    MappingWarning::InvalidRule {
        times_name: mapping.times_name.clone(),
        message: err.to_string(),
    }
}

/// Run one rule over its source table as a lazy frame query.
///
/// Returns `None` when the rule is skipped or leaves no valid row.
fn apply_rule(
    mapping: &TimesXlMap,
    source: &Table,
    out: &mut Canonicalized,
) -> std::result::Result<Option<Table>, ModelError> {
    let mut columns: BTreeSet<&str> = source.columns().iter().map(String::as_str).collect();
    let mut frame = table_to_frame(source)?.lazy();

    for (column, value) in &mapping.filter_rows {
        if !columns.contains(column.as_str()) {
            out.warn(MappingWarning::MissingFilterColumn {
                times_name: mapping.times_name.clone(),
                xl_name: mapping.xl_name.clone(),
                column: column.clone(),
            });
            continue;
        }
        frame = frame.filter(
            col(column.as_str())
                .str()
                .to_lowercase()
                .eq(lit(value.to_lowercase())),
        );
    }

    let needs_techgroup = mapping.xl_cols.iter().any(|c| c == TECHGROUP_COLUMN);
    if needs_techgroup && !columns.contains(TECHGROUP_COLUMN) && columns.contains(TECHNAME_COLUMN) {
        frame = frame.with_column(col(TECHNAME_COLUMN).alias(TECHGROUP_COLUMN));
        columns.insert(TECHGROUP_COLUMN);
    }

    let missing: BTreeSet<&str> = mapping
        .xl_cols
        .iter()
        .map(String::as_str)
        .filter(|column| !columns.contains(column))
        .collect();
    if !missing.is_empty() {
        out.warn(MappingWarning::MissingColumns {
            times_name: mapping.times_name.clone(),
            xl_name: mapping.xl_name.clone(),
            columns: missing.into_iter().map(str::to_string).collect(),
        });
        return Ok(None);
    }

    // Several output columns may read the same source column.
    let projection: Vec<Expr> = mapping
        .times_cols
        .iter()
        .map(|times_col| {
            let source = mapping.source_for(times_col).unwrap_or(times_col.as_str());
            col(source).alias(times_col.as_str())
        })
        .collect();
    let Some(valid) = valid_row(&mapping.times_cols) else {
        return Ok(None);
    };

    let df = frame.select(projection).filter(valid).collect()?;
    let mut table = frame_to_table(&df)?;
    table.dedup_rows();
    Ok((!table.is_empty()).then_some(table))
}

/// Predicate keeping rows where every cell, the value cell included, holds data.
fn valid_row(columns: &[String]) -> Option<Expr> {
    columns
        .iter()
        .map(|column| {
            col(column.as_str())
                .neq(lit(""))
                .and(col(column.as_str()).neq(lit(NULL_SENTINEL)))
        })
        .reduce(|all, cell| all.and(cell))
}

/// Pipeline stage wrapping [`produce_times_tables`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProduceTimesTables;

impl Stage for ProduceTimesTables {
    fn name(&self) -> &str {
        "produce_times_tables"
    }

    fn apply(&self, config: &TimesConfig, tables: PipelineTables) -> Result<PipelineTables> {
        let store = expect_store(self.name(), tables)?;
        let canonical = produce_times_tables(config, &store);
        Ok(PipelineTables::Store(canonical.tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn rows_with_sentinel_or_empty_cells_are_invalid() {
        let columns = strings(&["REG", "PRC", "VALUE"]);
        let table = Table::from_rows(
            columns.clone(),
            vec![
                strings(&["EU", "T1", "5"]),
                strings(&["EU", "T1", ""]),
                strings(&["EU", "None", "5"]),
                strings(&["", "T1", "5"]),
            ],
        )
        .unwrap();
        let valid = valid_row(&columns).unwrap();
        let df = table_to_frame(&table).unwrap().lazy().filter(valid).collect().unwrap();
        assert_eq!(frame_to_table(&df).unwrap().rows(), [strings(&["EU", "T1", "5"])]);
    }

    #[test]
    fn no_columns_means_no_valid_rows() {
        assert!(valid_row(&[]).is_none());
    }
}
