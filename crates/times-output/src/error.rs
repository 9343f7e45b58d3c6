//! Error types for output generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing output files.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create the output directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to list the output directory.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete an output file left by a previous run.
    #[error("failed to remove stale output {path}: {source}")]
    RemoveStale {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write CSV content.
    #[error("failed to write CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// A parameter table has no `VALUE` column.
    #[error("parameter table {table} has no VALUE column")]
    MissingValueColumn { table: String },

    /// Failed to build or render a diagnostic frame.
    #[error("failed to render table {table}: {message}")]
    Frame { table: String, message: String },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
