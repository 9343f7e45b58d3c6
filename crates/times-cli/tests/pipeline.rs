//! Integration tests for run orchestration.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use times_cli::pipeline::{MERGED_DUMP_FILE, OutputConfig, RAW_DUMP_FILE, convert, read_only};
use times_cli::types::OutputFormat;
use times_ingest::parse_mappings;
use times_model::{PipelineTables, RawTable, Table, TimesConfig};

const MAPPINGS: &str = "\
PRC[PRC] = ~FI_PROCESS(TechName)
PRC_DESC[PRC,TEXT] = ~FI_PROCESS(TechName,TechDesc)
ACT_BND[REG,PRC,VALUE] = ~FI_T(Region,TechName,VALUE,Attribute:ACT_BND)
";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn raw(file: &str, tag: &str, columns: &[&str], rows: &[&[&str]]) -> RawTable {
    let table = Table::from_rows(strings(columns), rows.iter().map(|r| strings(r)).collect())
        .expect("valid table");
    RawTable::new(file, "Sheet1", "B2:E5", tag, table)
}

fn config() -> TimesConfig {
    let mappings = parse_mappings(MAPPINGS).expect("valid mappings");
    TimesConfig::new(mappings, strings(&["PRC", "PRC_DESC", "ACT_BND"]))
}

fn raw_tables() -> Vec<RawTable> {
    vec![
        raw(
            "/models/demo/VT_BASE.xlsx",
            " ~fi_t",
            &["Region", "TechName", "Attribute", "VALUE", "*Notes"],
            &[
                &["REG1", "COAL01", "ACT_BND", "10", "check"],
                &["REG1", "GAS01", "NCAP_COST", "700", ""],
                &["*REG2", "COAL01", "ACT_BND", "5", ""],
            ],
        ),
        raw(
            "/models/demo/VT_BASE.xlsx",
            "~FI_Process",
            &["TechName", "TechDesc"],
            &[&["COAL01", "Coal plant"], &["GAS01", "Gas turbine"]],
        ),
        raw(
            "/models/demo/SuppXLS/Scen_Fill.xlsx",
            "~TFM_FILL",
            &["Attribute"],
            &[&["ACT_BND"]],
        ),
    ]
}

fn output_config(dir: &TempDir, format: OutputFormat) -> OutputConfig {
    OutputConfig {
        output_dir: dir.path().to_path_buf(),
        format,
        ground_truth_dir: None,
    }
}

#[test]
fn converts_to_csv_tables_with_dumps() {
    let dir = TempDir::new().expect("temp dir");
    let summary = convert(&config(), raw_tables(), &output_config(&dir, OutputFormat::Csv))
        .expect("convert");

    assert_eq!(
        summary.tables,
        vec![
            ("ACT_BND".to_string(), 1),
            ("PRC".to_string(), 2),
            ("PRC_DESC".to_string(), 2),
        ]
    );
    let act_bnd = fs::read_to_string(dir.path().join("ACT_BND_output.csv")).expect("read csv");
    assert_eq!(act_bnd, "REG,PRC,VALUE\nREG1,COAL01,10\n");
    assert!(dir.path().join(RAW_DUMP_FILE).exists());
    let merged = fs::read_to_string(dir.path().join(MERGED_DUMP_FILE)).expect("read dump");
    assert!(merged.contains("tag: ~FI_PROCESS\n"));
    assert!(!merged.contains("~TFM_FILL"));
    assert!(summary.verification.is_none());
}

#[test]
fn converts_to_dd_files() {
    let dir = TempDir::new().expect("temp dir");
    convert(&config(), raw_tables(), &output_config(&dir, OutputFormat::Dd)).expect("convert");

    let output = fs::read_to_string(dir.path().join("output.dd")).expect("read output.dd");
    insta::assert_snapshot!(output, @r"
    SET PRC
    /
    'COAL01'
    'GAS01'

    /;
    SET PRC_DESC
    /
    'COAL01' 'Coal plant'
    'GAS01' 'Gas turbine'

    /;
    PARAMETER
    ACT_BND ' '/
    'REG1.COAL01' 10

    /;
    ");
    let ts = fs::read_to_string(dir.path().join("ts.dd")).expect("read ts.dd");
    assert!(ts.is_empty());
}

#[test]
fn verifies_against_ground_truth() {
    let dir = TempDir::new().expect("temp dir");
    let gt_dir = dir.path().join("ground_truth");
    fs::create_dir_all(&gt_dir).expect("create gt dir");
    fs::write(gt_dir.join("PRC.csv"), "PRC\nCOAL01\nGAS01\n").expect("write gt");
    fs::write(gt_dir.join("ACT_BND.csv"), "REG,PRC,VALUE\nREG1,COAL01,10\nREG2,COAL01,5\n")
        .expect("write gt");

    let output = OutputConfig {
        ground_truth_dir: Some(gt_dir),
        ..output_config(&dir, OutputFormat::Csv)
    };
    let summary = convert(&config(), raw_tables(), &output).expect("convert");
    let report = summary.verification.expect("verification ran");

    assert_eq!(report.gt_rows, 4);
    assert_eq!(report.correct_rows, 3);
    assert_eq!(report.additional_tables[0].name, "PRC_DESC");
    let missing = fs::read_to_string(dir.path().join("ACT_BND_missing.csv")).expect("read");
    assert_eq!(missing, "REG,PRC,VALUE\nREG2,COAL01,5\n");
}

#[test]
fn read_only_strips_common_input_directory() {
    let dir = TempDir::new().expect("temp dir");
    let tables = read_only(raw_tables(), dir.path()).expect("read only");

    let PipelineTables::Raw(raw) = tables else {
        panic!("expected raw tables");
    };
    let files: Vec<PathBuf> = raw.iter().map(|t| t.filename.clone()).collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("SuppXLS/Scen_Fill.xlsx"),
            PathBuf::from("VT_BASE.xlsx"),
            PathBuf::from("VT_BASE.xlsx"),
        ]
    );
    let dump = fs::read_to_string(dir.path().join(RAW_DUMP_FILE)).expect("read dump");
    assert!(dump.contains("filename: SuppXLS/Scen_Fill.xlsx\n"));
    assert!(!dir.path().join(MERGED_DUMP_FILE).exists());
}
