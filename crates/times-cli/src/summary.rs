use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use times_cli::types::{ConversionSummary, RunResult};
use times_verify::VerificationReport;

pub fn print_summary(result: &RunResult) {
    println!("Output: {}", result.output_dir.display());
    println!("Raw tables: {}", result.raw_tables);
    let Some(conversion) = &result.conversion else {
        return;
    };
    print_stage_table(conversion);
    print_output_table(conversion);
    if let Some(report) = &conversion.verification {
        print_verification(report);
    }
}

fn print_stage_table(conversion: &ConversionSummary) {
    println!("{}", stage_table(conversion));
}

fn stage_table(conversion: &ConversionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Tables in"),
        header_cell("Tables out"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Time (ms)"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for stage in &conversion.report.stages {
        table.add_row(vec![
            Cell::new(&stage.name),
            Cell::new(stage.tables_before),
            Cell::new(stage.tables_after),
            Cell::new(stage.rows_before),
            Cell::new(stage.rows_after),
            Cell::new(stage.duration.as_millis()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(conversion.report.total_duration().as_millis()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn print_output_table(conversion: &ConversionSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut total_rows = 0usize;
    for (name, rows) in &conversion.tables {
        total_rows += rows;
        table.add_row(vec![
            Cell::new(name).fg(Color::Blue),
            Cell::new(rows),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("TOTAL ({} tables)", conversion.tables.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Files written: {}", conversion.written.len());
}

fn print_verification(report: &VerificationReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("GT rows"),
        header_cell("Correct"),
        header_cell("Additional"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for diff in &report.tables {
        table.add_row(vec![
            Cell::new(&diff.name),
            Cell::new(diff.gt_rows),
            Cell::new(diff.correct_rows),
            count_cell(diff.additional.len(), Color::Yellow),
            count_cell(diff.missing.len(), Color::Red),
        ]);
    }
    for missing in &report.missing_tables {
        table.add_row(vec![
            Cell::new(&missing.name).fg(Color::Red),
            Cell::new(missing.rows),
            dim_cell(0),
            dim_cell("-"),
            count_cell(missing.rows, Color::Red),
        ]);
    }
    println!("{table}");
    if !report.additional_tables.is_empty() {
        let names: Vec<&str> = report
            .additional_tables
            .iter()
            .map(|table| table.name.as_str())
            .collect();
        println!("Tables not in ground truth: {}", names.join(", "));
    }
    for mismatch in &report.header_mismatches {
        println!(
            "Header mismatch in {}: expected [{}], got [{}]",
            mismatch.name,
            mismatch.expected.join(", "),
            mismatch.actual.join(", ")
        );
    }
    println!(
        "{:.1}% of ground truth rows present in output ({}/{}), {} additional rows",
        report.correct_ratio() * 100.0,
        report.correct_rows,
        report.gt_rows,
        report.additional_rows
    );
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
