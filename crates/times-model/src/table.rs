#![deny(unsafe_code)]

//! String-celled relational table shared by every pipeline stage.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A relational table whose cells are all strings.
///
/// Column names are unique and every row holds exactly one cell per column.
/// The empty string stands for a missing cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        Self::from_rows(columns, Vec::new())
    }

    /// Create a table from a header and rows, validating shape.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ModelError::RowWidth {
                    row: idx,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All values of a column, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Append a row, checking its width.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Replace the values of `name`, or append it as a new last column.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(ModelError::ColumnLength {
                column: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Copy column `source` into column `target` (created if absent).
    pub fn copy_column(&mut self, source: &str, target: &str) -> Result<()> {
        let idx = self
            .column_index(source)
            .ok_or_else(|| ModelError::ColumnNotFound {
                column: source.to_string(),
            })?;
        let values = self.rows.iter().map(|row| row[idx].clone()).collect();
        self.set_column(target, values)
    }

    /// Keep only rows for which `keep` returns true.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Keep only the named columns, preserving the current column order.
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        let kept: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| keep(name.as_str()))
            .map(|(idx, _)| idx)
            .collect();
        if kept.len() == self.columns.len() {
            return;
        }
        self.columns = kept.iter().map(|&idx| self.columns[idx].clone()).collect();
        for row in &mut self.rows {
            *row = kept.iter().map(|&idx| std::mem::take(&mut row[idx])).collect();
        }
    }

    /// Project the table onto `columns`, in that order.
    pub fn select(&self, columns: &[String]) -> Result<Table> {
        let mut indices = Vec::with_capacity(columns.len());
        for column in columns {
            let idx = self
                .column_index(column)
                .ok_or_else(|| ModelError::ColumnNotFound {
                    column: column.clone(),
                })?;
            indices.push(idx);
        }
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Table::from_rows(columns.to_vec(), rows)
    }

    /// Drop repeated rows, keeping the first occurrence of each.
    pub fn dedup_rows(&mut self) {
        let mut seen = HashSet::with_capacity(self.rows.len());
        self.rows.retain(|row| seen.insert(row.clone()));
    }

    /// Rename columns through `rename`, re-disambiguating any collisions.
    pub fn rename_columns<F>(&mut self, rename: F)
    where
        F: FnMut(&str) -> String,
    {
        let renamed: Vec<String> = self.columns.iter().map(String::as_str).map(rename).collect();
        self.columns = dedupe_column_names(renamed);
    }

    /// Content equality that ignores column order.
    pub fn same_content(&self, other: &Table) -> bool {
        if self.width() != other.width() || self.height() != other.height() {
            return false;
        }
        match other.select(&self.columns) {
            Ok(projected) => projected.rows == self.rows,
            Err(_) => false,
        }
    }
}

/// Make column names unique by appending `.1`, `.2`, ... to repeats.
///
/// ```
/// use times_model::dedupe_column_names;
///
/// let names = vec!["a".to_string(), "b".to_string(), "a".to_string()];
/// assert_eq!(dedupe_column_names(names), vec!["a", "b", "a.1"]);
/// ```
pub fn dedupe_column_names(names: Vec<String>) -> Vec<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut out = Vec::with_capacity(names.len());
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    for name in names {
        if used.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let counter = counts.entry(name.clone()).or_insert(0);
        let candidate = loop {
            *counter += 1;
            let candidate = format!("{name}.{counter}");
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(candidate.clone());
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
