//! Regression comparison of produced tables against ground truth.
//!
//! Tables are compared as unordered sets of rows, while row totals count
//! every ground-truth row, repeats included. Ground-truth column names may
//! carry a `.N` disambiguation suffix, which is ignored.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use times_model::{Table, TableStore};
use times_output::{remove_files_with_suffix, write_csv_table};

pub const ADDITIONAL_SUFFIX: &str = "_additional.csv";
pub const MISSING_SUFFIX: &str = "_missing.csv";

/// A table present on one side only, with its row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub name: String,
    pub rows: usize,
}

/// A table whose columns differ from the ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMismatch {
    pub name: String,
    /// Ground-truth columns with suffixes stripped, sorted, repeats kept.
    pub expected: Vec<String>,
    /// Produced columns, sorted.
    pub actual: Vec<String>,
}

/// Row-level comparison of one table present on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDiff {
    pub name: String,
    /// Produced column order, used for the side-files.
    pub columns: Vec<String>,
    pub gt_rows: usize,
    pub correct_rows: usize,
    /// Produced rows absent from the ground truth, sorted.
    pub additional: Vec<Vec<String>>,
    /// Ground-truth rows not produced, sorted.
    pub missing: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub missing_tables: Vec<TableCount>,
    pub additional_tables: Vec<TableCount>,
    pub header_mismatches: Vec<HeaderMismatch>,
    /// Tables compared row by row, largest ground truth first.
    pub tables: Vec<TableDiff>,
    pub gt_rows: usize,
    pub correct_rows: usize,
    pub additional_rows: usize,
}

impl VerificationReport {
    /// Share of ground-truth rows reproduced; 1.0 when there is no ground truth.
    pub fn correct_ratio(&self) -> f64 {
        if self.gt_rows == 0 {
            1.0
        } else {
            self.correct_rows as f64 / self.gt_rows as f64
        }
    }
}

/// Ground-truth column name without its disambiguation suffix.
pub fn strip_column_suffix(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Compare produced tables against ground truth without touching the filesystem.
pub fn diff_stores(data: &TableStore, ground_truth: &TableStore) -> VerificationReport {
    let mut report = VerificationReport::default();

    for (name, table) in data {
        if !ground_truth.contains(name) {
            let rows = table.height();
            report.additional_rows += rows;
            report.additional_tables.push(TableCount {
                name: name.clone(),
                rows,
            });
        }
    }

    let mut gt_tables: Vec<(&String, &Table, usize)> = ground_truth
        .iter()
        .map(|(name, table)| (name, table, table.height()))
        .collect();
    gt_tables.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));

    for (name, gt_table, gt_rows) in gt_tables {
        report.gt_rows += gt_rows;
        let Some(table) = data.get(name) else {
            report.missing_tables.push(TableCount {
                name: name.clone(),
                rows: gt_rows,
            });
            continue;
        };

        let stripped: Vec<&str> = gt_table
            .columns()
            .iter()
            .map(|column| strip_column_suffix(column))
            .collect();
        // Compared as multisets: `REG` and `REG.1` are two columns.
        let mut expected: Vec<&str> = stripped.clone();
        expected.sort_unstable();
        let mut actual: Vec<&str> = table.columns().iter().map(String::as_str).collect();
        actual.sort_unstable();
        if expected != actual {
            report.header_mismatches.push(HeaderMismatch {
                name: name.clone(),
                expected: expected.iter().map(|c| (*c).to_string()).collect(),
                actual: actual.iter().map(|c| (*c).to_string()).collect(),
            });
            continue;
        }

        let indices: Vec<usize> = table
            .columns()
            .iter()
            .filter_map(|column| stripped.iter().position(|gt| *gt == column.as_str()))
            .collect();
        let gt_set: BTreeSet<Vec<String>> = gt_table
            .rows()
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        let out_set: BTreeSet<Vec<String>> = table.rows().iter().cloned().collect();

        let correct_rows = gt_set.intersection(&out_set).count();
        let additional: Vec<Vec<String>> = out_set.difference(&gt_set).cloned().collect();
        let missing: Vec<Vec<String>> = gt_set.difference(&out_set).cloned().collect();

        report.correct_rows += correct_rows;
        report.additional_rows += additional.len();
        report.tables.push(TableDiff {
            name: name.clone(),
            columns: table.columns().to_vec(),
            gt_rows,
            correct_rows,
            additional,
            missing,
        });
    }
    report
}

/// Compare, log the findings and write `<table>_additional.csv` and
/// `<table>_missing.csv` side-files to `output_dir`.
///
/// Side-files from earlier runs are removed first.
pub fn compare(
    data: &TableStore,
    ground_truth: &TableStore,
    output_dir: &Path,
) -> Result<VerificationReport> {
    let report = diff_stores(data, ground_truth);

    for table in &report.missing_tables {
        warn!(table = %table.name, rows = table.rows, "table missing from output");
    }
    for table in &report.additional_tables {
        warn!(table = %table.name, rows = table.rows, "table not in ground truth");
    }
    for mismatch in &report.header_mismatches {
        warn!(
            table = %mismatch.name,
            expected = %mismatch.expected.join(","),
            actual = %mismatch.actual.join(","),
            "header mismatch"
        );
    }

    write_side_files(&report, output_dir)?;

    info!(
        correct_rows = report.correct_rows,
        gt_rows = report.gt_rows,
        additional_rows = report.additional_rows,
        "{:.1}% of ground truth rows present in output",
        report.correct_ratio() * 100.0
    );
    Ok(report)
}

fn write_side_files(report: &VerificationReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    for suffix in [ADDITIONAL_SUFFIX, MISSING_SUFFIX] {
        remove_files_with_suffix(output_dir, suffix)
            .with_context(|| format!("clear old {suffix} files"))?;
    }

    let mut written = Vec::new();
    for diff in &report.tables {
        let sides = [
            (ADDITIONAL_SUFFIX, &diff.additional),
            (MISSING_SUFFIX, &diff.missing),
        ];
        for (suffix, rows) in sides {
            if rows.is_empty() {
                continue;
            }
            let path = output_dir.join(format!("{}{suffix}", diff.name));
            let table = Table::from_rows(diff.columns.clone(), rows.clone())
                .with_context(|| format!("build {}", path.display()))?;
            write_csv_table(&path, &table).with_context(|| format!("write {}", path.display()))?;
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_suffix_from_first_dot() {
        assert_eq!(strip_column_suffix("REG.1"), "REG");
        assert_eq!(strip_column_suffix("REG"), "REG");
        assert_eq!(strip_column_suffix("A.B.2"), "A");
    }

    #[test]
    fn empty_ground_truth_is_fully_correct() {
        assert_eq!(VerificationReport::default().correct_ratio(), 1.0);
    }
}
