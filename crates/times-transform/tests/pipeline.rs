//! Tests for stage execution and the generic normalization stages.

use times_model::{PipelineTables, RawTable, Table, TimesConfig};
use times_transform::{
    FnStage, Pipeline, Stage, TransformError, build_default_pipeline, merge_raw_tables,
    normalize_tags_columns, remove_comment_cols, remove_comment_rows, remove_fill_tables,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn raw(tag: &str, columns: &[&str], rows: &[&[&str]]) -> RawTable {
    let table = Table::from_rows(strings(columns), rows.iter().map(|r| strings(r)).collect())
        .expect("valid table");
    RawTable::new("VT_BASE.xlsx", "Sheet1", "A2:B3", tag, table)
}

fn apply_raw(stage: &impl Stage, tables: Vec<RawTable>) -> Vec<RawTable> {
    match stage
        .apply(&TimesConfig::default(), PipelineTables::Raw(tables))
        .expect("stage succeeds")
    {
        PipelineTables::Raw(raw) => raw,
        other => panic!("expected raw tables, got {}", other.kind()),
    }
}

#[test]
fn normalizes_tags_and_column_names() {
    let out = apply_raw(
        &normalize_tags_columns(),
        vec![raw(" ~fi_t ", &[" Region", "REGION"], &[&["EU", "EU"]])],
    );
    assert_eq!(out[0].tag, "~FI_T");
    assert_eq!(out[0].table.columns(), ["region", "region.1"]);
}

#[test]
fn removes_fill_tables() {
    let out = apply_raw(
        &remove_fill_tables(),
        vec![raw("~TFM_FILL", &["a"], &[]), raw("~FI_T", &["a"], &[])],
    );
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].tag, "~FI_T");
}

#[test]
fn removes_comment_rows_and_columns() {
    let tables = vec![raw(
        "~FI_T",
        &["region", "*note", ""],
        &[&["EU", "x", "y"], &["*US", "x", "y"], &["", " ", ""]],
    )];
    let out = apply_raw(&remove_comment_rows(), tables);
    let out = apply_raw(&remove_comment_cols(), out);
    assert_eq!(out[0].table.columns(), ["region"]);
    assert_eq!(out[0].table.rows(), [strings(&["EU"])]);
}

#[test]
fn merges_tables_by_tag_with_column_union() {
    let store = merge_raw_tables(vec![
        raw("~FI_T", &["region", "value"], &[&["EU", "1"]]),
        raw("~FI_T", &["value", "year"], &[&["2", "2020"]]),
        raw("~FI_COMM", &["commname"], &[&["ELC"]]),
    ])
    .expect("merge");

    assert_eq!(store.len(), 2);
    let fi_t = store.get("~FI_T").expect("merged table");
    assert_eq!(fi_t.columns(), ["region", "value", "year"]);
    assert_eq!(
        fi_t.rows(),
        [strings(&["EU", "1", ""]), strings(&["", "2", "2020"])]
    );
}

#[test]
fn runs_stages_in_order_and_reports_counts() {
    let pipeline = Pipeline::new()
        .add_stage(Box::new(remove_fill_tables()))
        .add_stage(Box::new(FnStage::new(
            "count_only",
            |_config: &TimesConfig, tables: PipelineTables| Ok(tables),
        )));
    let input = vec![raw("~TFM_FILL", &["a"], &[&["1"]]), raw("~FI_T", &["a"], &[&["1"]])];

    let (tables, report) = pipeline
        .run(&TimesConfig::default(), input.into())
        .expect("pipeline runs");

    assert_eq!(tables.table_count(), 1);
    assert_eq!(pipeline.stage_names(), vec!["remove_fill_tables", "count_only"]);
    let first = &report.stages[0];
    assert_eq!((first.tables_before, first.tables_after), (2, 1));
    assert_eq!((first.rows_before, first.rows_after), (2, 1));
}

#[test]
fn wrong_input_variant_fails_with_stage_name() {
    let pipeline = Pipeline::new().add_stage(Box::new(remove_fill_tables()));
    let err = pipeline
        .run(
            &TimesConfig::default(),
            PipelineTables::Store(Default::default()),
        )
        .unwrap_err();
    match err {
        TransformError::UnexpectedInput { stage, .. } => assert_eq!(stage, "remove_fill_tables"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn default_pipeline_order() {
    let pipeline = build_default_pipeline(None);
    assert_eq!(
        pipeline.stage_names(),
        vec![
            "normalize_tags_columns",
            "remove_fill_tables",
            "remove_comment_rows",
            "remove_comment_cols",
            "merge_tables",
            "produce_times_tables",
        ]
    );
}
