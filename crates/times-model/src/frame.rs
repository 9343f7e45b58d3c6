//! Conversion between [`Table`] and polars [`DataFrame`].
//!
//! Every column becomes a string column. Null cells read back as empty
//! strings.

use polars::prelude::{Column, DataFrame};

use crate::error::Result;
use crate::table::Table;

/// Build a string-typed frame with the table's columns, in order.
pub fn table_to_frame(table: &Table) -> Result<DataFrame> {
    let columns = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<&str> = table.rows().iter().map(|row| row[idx].as_str()).collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Read a frame of string columns back into a table.
pub fn frame_to_table(df: &DataFrame) -> Result<Table> {
    let mut names = Vec::with_capacity(df.width());
    let mut values: Vec<Vec<String>> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        names.push(column.name().to_string());
        let cells = column
            .str()?
            .into_iter()
            .map(|cell| cell.unwrap_or_default().to_string())
            .collect();
        values.push(cells);
    }
    let rows = (0..df.height())
        .map(|row| values.iter().map(|cells| cells[row].clone()).collect())
        .collect();
    Table::from_rows(names, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn frame_keeps_column_order_and_cells() {
        let table = Table::from_rows(
            strings(&["region", "value"]),
            vec![strings(&["EU", "5"]), strings(&["US", ""])],
        )
        .unwrap();
        let df = table_to_frame(&table).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(frame_to_table(&df).unwrap(), table);
    }

    #[test]
    fn empty_table_has_typed_columns() {
        let table = Table::new(strings(&["a"])).unwrap();
        let df = table_to_frame(&table).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(frame_to_table(&df).unwrap().columns(), ["a"]);
    }
}
