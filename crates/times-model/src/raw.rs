use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A table found inside a spreadsheet, with the location it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Workbook the table was extracted from.
    pub filename: PathBuf,
    pub sheetname: String,
    /// Cell range in A1 notation (e.g. `B3:E10`).
    pub range: String,
    /// Tag identifying the table type (e.g. `~FI_T`).
    pub tag: String,
    /// User-constraint set labels in effect for this table.
    #[serde(default)]
    pub uc_sets: BTreeSet<String>,
    pub table: Table,
}

impl RawTable {
    pub fn new(
        filename: impl Into<PathBuf>,
        sheetname: impl Into<String>,
        range: impl Into<String>,
        tag: impl Into<String>,
        table: Table,
    ) -> Self {
        Self {
            filename: filename.into(),
            sheetname: sheetname.into(),
            range: range.into(),
            tag: tag.into(),
            uc_sets: BTreeSet::new(),
            table,
        }
    }

    pub fn with_uc_sets(mut self, uc_sets: BTreeSet<String>) -> Self {
        self.uc_sets = uc_sets;
        self
    }

    /// Same table with different contents; location metadata is kept.
    pub fn with_table(self, table: Table) -> Self {
        Self { table, ..self }
    }

    /// Deterministic ordering key: file, sheet, range.
    pub fn location_cmp(&self, other: &Self) -> Ordering {
        self.filename
            .cmp(&other.filename)
            .then_with(|| self.sheetname.cmp(&other.sheetname))
            .then_with(|| self.range.cmp(&other.range))
    }

    /// Rewrite `filename` relative to `prefix` when it lies below it.
    pub fn strip_filename_prefix(mut self, prefix: &Path) -> Self {
        if let Ok(relative) = self.filename.strip_prefix(prefix) {
            self.filename = relative.to_path_buf();
        }
        self
    }
}

/// Sort raw tables by file, sheet and range.
pub fn sort_raw_tables(tables: &mut [RawTable]) {
    tables.sort_by(RawTable::location_cmp);
}

/// Longest directory that contains every table's source file.
///
/// Returns `None` for an empty slice.
pub fn common_input_dir(tables: &[RawTable]) -> Option<PathBuf> {
    let mut dirs = tables
        .iter()
        .map(|table| table.filename.parent().unwrap_or_else(|| Path::new("")));
    let first = dirs.next()?;
    let mut common: Vec<_> = first.components().collect();
    for dir in dirs {
        let shared = common
            .iter()
            .zip(dir.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        common.truncate(shared);
    }
    Some(common.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(filename: &str, sheet: &str, range: &str) -> RawTable {
        RawTable::new(filename, sheet, range, "~FI_T", Table::default())
    }

    #[test]
    fn common_dir_uses_parent_directories() {
        let tables = vec![
            raw("/data/model/base/a.xlsx", "S", "A1:B2"),
            raw("/data/model/suppl/b.xlsx", "S", "A1:B2"),
        ];
        assert_eq!(common_input_dir(&tables), Some(PathBuf::from("/data/model")));
    }

    #[test]
    fn single_file_keeps_its_name_after_stripping() {
        let tables = vec![raw("/data/model/a.xlsx", "S", "A1:B2")];
        let dir = common_input_dir(&tables).unwrap();
        let stripped = tables[0].clone().strip_filename_prefix(&dir);
        assert_eq!(stripped.filename, PathBuf::from("a.xlsx"));
    }

    #[test]
    fn sorts_by_location() {
        let mut tables = vec![
            raw("b.xlsx", "S", "A1:B2"),
            raw("a.xlsx", "T", "A1:B2"),
            raw("a.xlsx", "S", "C1:D2"),
            raw("a.xlsx", "S", "A1:B2"),
        ];
        sort_raw_tables(&mut tables);
        let keys: Vec<_> = tables
            .iter()
            .map(|t| (t.filename.display().to_string(), t.sheetname.clone(), t.range.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a.xlsx".to_string(), "S".to_string(), "A1:B2".to_string()),
                ("a.xlsx".to_string(), "S".to_string(), "C1:D2".to_string()),
                ("a.xlsx".to_string(), "T".to_string(), "A1:B2".to_string()),
                ("b.xlsx".to_string(), "S".to_string(), "A1:B2".to_string()),
            ]
        );
    }
}
