//! Error types for dataset ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching, reading or writing datasets.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File uses an encoding the reader does not support.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV from {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },

    /// Failed to serialize CSV with Polars.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    /// CSV has no header row or no columns.
    #[error("CSV is empty: {source_name}")]
    EmptyCsv { source_name: String },

    // === Schema Errors ===
    /// Two columns share a name after renaming.
    #[error("duplicate column name '{column}'")]
    DuplicateColumn { column: String },

    /// Declared custom header does not match the fetched width.
    #[error("dataset {dataset} declares {declared} header labels but the sheet returned {fetched} columns")]
    HeaderMismatch {
        dataset: String,
        declared: usize,
        fetched: usize,
    },

    // === Network Errors ===
    /// Export URL could not be built.
    #[error("invalid export URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// HTTP request failed before a response arrived.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Export endpoint answered with a non-success status.
    #[error("export endpoint {url} returned HTTP {status}: {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
