//! Tests for mapping-rule application.

use times_model::{Table, TableStore, TimesConfig, TimesXlMap};
use times_transform::{MappingWarning, produce_times_tables};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_rows(strings(columns), rows.iter().map(|r| strings(r)).collect())
        .expect("valid table")
}

fn mapping(
    times_name: &str,
    xl_name: &str,
    col_map: &[(&str, &str)],
    filter_rows: &[(&str, &str)],
) -> TimesXlMap {
    TimesXlMap {
        times_name: times_name.to_string(),
        times_cols: col_map.iter().map(|(t, _)| (*t).to_string()).collect(),
        xl_name: xl_name.to_string(),
        xl_cols: col_map.iter().map(|(_, x)| (*x).to_string()).collect(),
        col_map: col_map
            .iter()
            .map(|(t, x)| ((*t).to_string(), (*x).to_string()))
            .collect(),
        filter_rows: filter_rows
            .iter()
            .map(|(c, v)| ((*c).to_string(), (*v).to_string()))
            .collect(),
    }
}

fn store(tables: Vec<(&str, Table)>) -> TableStore {
    tables
        .into_iter()
        .map(|(name, table)| (name.to_string(), table))
        .collect()
}

#[test]
fn filters_projects_and_drops_null_rows() {
    let input = store(vec![(
        "techs",
        table(
            &["region", "techname", "value"],
            &[&["EU", "T1", "5"], &["US", "T2", "3"], &["EU", "T3", "None"]],
        ),
    )]);
    let config = TimesConfig::new(
        vec![mapping(
            "TECH_VAL",
            "techs",
            &[("REGION", "region"), ("TECH", "techname"), ("VALUE", "value")],
            &[("region", "eu")],
        )],
        Vec::new(),
    );

    let out = produce_times_tables(&config, &input);
    let produced = out.tables.get("TECH_VAL").expect("table produced");
    assert_eq!(produced.columns(), ["REGION", "TECH", "VALUE"]);
    assert_eq!(produced.rows(), [strings(&["EU", "T1", "5"])]);
    assert!(out.warnings.is_empty());
}

#[test]
fn source_column_can_back_several_outputs_and_rows_are_deduplicated() {
    let input = store(vec![(
        "PRC",
        table(&["techname", "region"], &[&["T1", "EU"], &["T1", "EU"], &["T2", "EU"]]),
    )]);
    let config = TimesConfig::new(
        vec![mapping(
            "PRC_MAP",
            "PRC",
            &[("REG", "region"), ("PRC", "techname"), ("PRC_ALIAS", "techname")],
            &[],
        )],
        Vec::new(),
    );

    let out = produce_times_tables(&config, &input);
    let produced = out.tables.get("PRC_MAP").expect("table produced");
    assert_eq!(produced.columns(), ["REG", "PRC", "PRC_ALIAS"]);
    assert_eq!(
        produced.rows(),
        [strings(&["EU", "T1", "T1"]), strings(&["EU", "T2", "T2"])]
    );
}

#[test]
fn missing_filter_column_is_ignored_with_warning() {
    let input = store(vec![("PRC", table(&["techname"], &[&["T1"], &["T2"]]))]);
    let config = TimesConfig::new(
        vec![mapping("PRC", "PRC", &[("PRC", "techname")], &[("sets", "ELE")])],
        Vec::new(),
    );

    let out = produce_times_tables(&config, &input);
    assert_eq!(out.tables.get("PRC").map(Table::height), Some(2));
    assert_eq!(
        out.warnings,
        vec![MappingWarning::MissingFilterColumn {
            times_name: "PRC".to_string(),
            xl_name: "PRC".to_string(),
            column: "sets".to_string(),
        }]
    );
}

#[test]
fn techgroup_is_synthesized_from_techname() {
    let input = store(vec![("PRC", table(&["techname"], &[&["T1"]]))]);
    let config = TimesConfig::new(
        vec![mapping("PRC_GRP", "PRC", &[("PRC", "techname"), ("GRP", "techgroup")], &[])],
        Vec::new(),
    );

    let out = produce_times_tables(&config, &input);
    let produced = out.tables.get("PRC_GRP").expect("table produced");
    assert_eq!(produced.rows(), [strings(&["T1", "T1"])]);
}

#[test]
fn missing_columns_skip_the_rule_but_mark_source_used() {
    let input = store(vec![("PRC", table(&["techname"], &[&["T1"]]))]);
    let config = TimesConfig::new(
        vec![mapping(
            "PRC_DESC",
            "PRC",
            &[("PRC", "techname"), ("TEXT", "techdesc"), ("REG", "region")],
            &[],
        )],
        Vec::new(),
    );

    let out = produce_times_tables(&config, &input);
    assert!(out.tables.is_empty());
    assert_eq!(out.warnings.len(), 1);
    insta::assert_snapshot!(
        out.warnings[0].to_string(),
        @"cannot produce table PRC_DESC: PRC is missing columns region, techdesc"
    );
}

#[test]
fn missing_source_table_is_reported() {
    let config = TimesConfig::new(
        vec![mapping("PRC", "PRC", &[("PRC", "techname")], &[])],
        Vec::new(),
    );
    let out = produce_times_tables(&config, &TableStore::new());
    assert!(matches!(
        out.warnings.as_slice(),
        [MappingWarning::MissingSourceTable { .. }]
    ));
}

#[test]
fn unused_tables_produce_one_warning() {
    let input = store(vec![
        ("PRC", table(&["techname"], &[&["T1"]])),
        ("~FI_COMM", table(&["commname"], &[&["ELC"]])),
        ("~BOOKREGIONS_MAP", table(&["region"], &[&["EU"]])),
    ]);
    let config = TimesConfig::new(
        vec![mapping("PRC", "PRC", &[("PRC", "techname")], &[])],
        Vec::new(),
    );

    let out = produce_times_tables(&config, &input);
    assert_eq!(out.tables.names().collect::<Vec<_>>(), vec!["PRC"]);
    assert_eq!(
        out.warnings,
        vec![MappingWarning::UnusedTables {
            names: vec!["~BOOKREGIONS_MAP".to_string(), "~FI_COMM".to_string()],
        }]
    );
}

#[test]
fn empty_result_is_not_emitted() {
    let input = store(vec![("PRC", table(&["techname"], &[&["None"], &[""]]))]);
    let config = TimesConfig::new(
        vec![mapping("PRC", "PRC", &[("PRC", "techname")], &[])],
        Vec::new(),
    );
    let out = produce_times_tables(&config, &input);
    assert!(out.tables.is_empty());
}
