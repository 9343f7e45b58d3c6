use std::path::PathBuf;

use times_transform::PipelineReport;
use times_verify::VerificationReport;

/// Serializer used for the produced tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `<table>_output.csv` per table.
    #[default]
    Csv,
    /// `ts.dd` and `output.dd`.
    Dd,
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub raw_tables: usize,
    /// Absent in read-only mode.
    pub conversion: Option<ConversionSummary>,
}

#[derive(Debug)]
pub struct ConversionSummary {
    pub report: PipelineReport,
    /// Produced table names with their row counts, by name.
    pub tables: Vec<(String, usize)>,
    pub written: Vec<PathBuf>,
    pub verification: Option<VerificationReport>,
}
