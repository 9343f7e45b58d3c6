//! Error types for TIMES reader ingestion.

use std::path::PathBuf;

use thiserror::Error;
use times_model::ModelError;

/// Errors that can occur while loading configuration, inputs or tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Input Errors ===
    /// No input file or directory was given.
    #[error("expected at least 1 input, got none")]
    NoInputs,

    /// A single input was given but it is not a readable directory.
    #[error("input is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse a CSV file.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to open or read a workbook.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    // === Configuration Errors ===
    /// A line of the mapping file could not be parsed.
    #[error("invalid mapping in {path} line {line}: {reason}")]
    MappingSyntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The table info file could not be parsed.
    #[error("invalid table info file {path}: {message}")]
    TableInfo { path: PathBuf, message: String },

    // === Snapshot Errors ===
    /// The raw-table snapshot could not be read or written.
    #[error("raw-table snapshot {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    // === Model Errors ===
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, err: &csv::Error) -> Self {
        Self::CsvParse {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
