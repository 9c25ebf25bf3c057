//! Dataset ingestion for the historionomy loader.
//!
//! This crate moves tabular data between the remote sheet export, local CSV
//! files and Polars DataFrames.
//!
//! # Features
//!
//! - **Sheet export**: fetch a column range of a sheet as CSV
//! - **CSV files**: write and read `<dataset>.csv` with a leading row-index column
//! - **Normalization**: canonical column names (`GDP Growth` -> `gdp_growth`, `1950` -> `step_1950`)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use histo_ingest::{load_normalized, write_dataset_csv};
//!
//! let rows = write_dataset_csv(&df, Path::new("gdp.csv"))?;
//! let normalized = load_normalized(Path::new("gdp.csv"))?;
//! ```

mod csv;
mod error;
mod fetch;
mod normalize;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Files ===
pub use csv::{
    dataset_csv_path, parse_csv_bytes, read_dataset_csv, validate_encoding, write_dataset_csv,
};

// === Sheet Export ===
pub use fetch::{EXPORT_PATH, SheetExportClient, apply_custom_header, export_url};

// === Normalization ===
pub use normalize::{load_normalized, normalize_column_name, normalize_columns};
