//! Extraction of tagged tables from workbooks.
//!
//! A table starts at a cell whose text begins with `~` (the tag). The header
//! row sits directly below the tag; columns extend right until the first
//! empty header and rows extend down until the first fully empty row.
//! `~UC_Sets: <label>` cells do not start a table: they record a
//! user-constraint label that applies to the `~UC_T` tables that follow on
//! the same sheet.

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::{debug, warn};

use times_model::{RawTable, Table, dedupe_column_names};

use crate::error::{IngestError, Result};

const UC_SETS_TAG: &str = "~UC_SETS";
const UC_TABLE_TAG: &str = "~UC_T";

/// Turns one input file into the raw tables it contains.
pub trait TableExtractor: Sync {
    fn extract(&self, path: &Path) -> Result<Vec<RawTable>>;
}

/// Extractor for Excel workbooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExtractor;

impl TableExtractor for XlsxExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<RawTable>> {
        let workbook_err = |message: String| IngestError::Workbook {
            path: path.to_path_buf(),
            message,
        };
        let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
        let sheet_names = workbook.sheet_names().to_owned();

        let mut tables = Vec::new();
        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| workbook_err(format!("sheet {sheet_name}: {e}")))?;
            let grid = SheetGrid::from_range(&range);
            tables.extend(extract_sheet_tables(path, &sheet_name, &grid)?);
        }
        debug!(
            source_file = %path.display(),
            tables = tables.len(),
            "workbook extracted"
        );
        Ok(tables)
    }
}

/// Cell text of one sheet, addressed by absolute (0-based) row and column.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    row_offset: usize,
    col_offset: usize,
    cells: Vec<Vec<String>>,
}

impl SheetGrid {
    /// Build a grid whose top-left cell is at `(row_offset, col_offset)`.
    pub fn new(row_offset: usize, col_offset: usize, cells: Vec<Vec<String>>) -> Self {
        Self {
            row_offset,
            col_offset,
            cells,
        }
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let cells = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        Self::new(row_offset as usize, col_offset as usize, cells)
    }

    fn height(&self) -> usize {
        self.row_offset + self.cells.len()
    }

    fn width(&self) -> usize {
        self.col_offset + self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn get(&self, row: usize, col: usize) -> &str {
        if row < self.row_offset || col < self.col_offset {
            return "";
        }
        self.cells
            .get(row - self.row_offset)
            .and_then(|cells| cells.get(col - self.col_offset))
            .map(|cell| cell.trim())
            .unwrap_or("")
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format!("{f}"),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

/// Find every tagged table on a sheet.
pub fn extract_sheet_tables(path: &Path, sheet_name: &str, grid: &SheetGrid) -> Result<Vec<RawTable>> {
    let mut uc_sets = BTreeSet::new();
    let mut tables = Vec::new();
    for row in grid.row_offset..grid.height() {
        for col in grid.col_offset..grid.width() {
            let cell = grid.get(row, col);
            if !cell.starts_with('~') {
                continue;
            }
            if let Some(label) = uc_sets_label(cell) {
                uc_sets.insert(label.to_string());
                continue;
            }
            let Some(raw) = read_table(path, sheet_name, grid, row, col)? else {
                warn!(
                    source_file = %path.display(),
                    sheet = sheet_name,
                    tag = cell,
                    "tag has no header row; skipped"
                );
                continue;
            };
            let raw = if raw.tag.to_uppercase().starts_with(UC_TABLE_TAG) {
                raw.with_uc_sets(uc_sets.clone())
            } else {
                raw
            };
            tables.push(raw);
        }
    }
    Ok(tables)
}

fn uc_sets_label(tag: &str) -> Option<&str> {
    let prefix = tag.get(..UC_SETS_TAG.len())?;
    if !prefix.eq_ignore_ascii_case(UC_SETS_TAG) {
        return None;
    }
    let rest = &tag[UC_SETS_TAG.len()..];
    Some(rest.trim_start_matches(':').trim())
}

fn read_table(
    path: &Path,
    sheet_name: &str,
    grid: &SheetGrid,
    tag_row: usize,
    tag_col: usize,
) -> Result<Option<RawTable>> {
    let header_row = tag_row + 1;
    let mut end_col = tag_col;
    while end_col < grid.width() && !grid.get(header_row, end_col).is_empty() {
        end_col += 1;
    }
    if end_col == tag_col {
        return Ok(None);
    }

    let headers: Vec<String> = (tag_col..end_col)
        .map(|col| grid.get(header_row, col).to_string())
        .collect();
    let mut rows = Vec::new();
    let mut row = header_row + 1;
    while row < grid.height() {
        let values: Vec<String> = (tag_col..end_col)
            .map(|col| grid.get(row, col).to_string())
            .collect();
        if values.iter().all(String::is_empty) {
            break;
        }
        rows.push(values);
        row += 1;
    }

    let range = format!(
        "{}:{}",
        cell_reference(header_row, tag_col),
        cell_reference(row - 1, end_col - 1)
    );
    let table = Table::from_rows(dedupe_column_names(headers), rows)?;
    let tag = grid.get(tag_row, tag_col).to_string();
    Ok(Some(RawTable::new(path, sheet_name, range, tag, table)))
}

/// A1-style reference for a 0-based cell position.
///
/// ```
/// use times_ingest::extract::cell_reference;
///
/// assert_eq!(cell_reference(0, 0), "A1");
/// assert_eq!(cell_reference(9, 27), "AB10");
/// ```
pub fn cell_reference(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut col = col;
    loop {
        letters.push(char::from(b'A' + (col % 26) as u8));
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}
