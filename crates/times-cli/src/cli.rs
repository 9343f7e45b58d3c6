//! CLI argument definitions for the TIMES reader.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "times-reader",
    version,
    about = "Convert TIMES model workbooks into solver input tables",
    long_about = "Extract tagged tables from TIMES model workbooks, normalize and merge them,\n\
                  apply the mapping rules and write the resulting tables.\n\n\
                  Writes one CSV per table by default, or DD files with --dd. Optionally\n\
                  compares the result against previously validated ground-truth CSVs."
)]
pub struct Cli {
    /// A directory searched recursively for workbooks, or several workbook files.
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output directory for generated files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Directory of ground-truth CSV tables to compare the output against.
    #[arg(long = "ground-truth-dir", value_name = "DIR")]
    pub ground_truth_dir: Option<PathBuf>,

    /// Write DD files instead of CSV tables.
    #[arg(long = "dd")]
    pub dd: bool,

    /// Only extract and dump the raw tables.
    #[arg(long = "only-read")]
    pub only_read: bool,

    /// Reuse the raw-table snapshot when it matches the inputs.
    ///
    /// Speeds up repeated runs over unchanged workbooks. The snapshot is
    /// keyed by the list of input paths only, so edits inside a workbook are
    /// not detected.
    #[arg(long = "use-snapshot")]
    pub use_snapshot: bool,

    /// Location of the raw-table snapshot.
    #[arg(long = "snapshot", value_name = "PATH", default_value = "raw_tables.json")]
    pub snapshot: PathBuf,

    /// Directory holding times_mapping.txt and times-info.json.
    #[arg(long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
