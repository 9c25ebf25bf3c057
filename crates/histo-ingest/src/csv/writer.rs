//! CSV file writing with a leading row-index column.

use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Writes a dataset as CSV with a leading, unnamed row-index column.
///
/// Returns the number of data rows written.
pub fn write_dataset_csv(df: &DataFrame, path: &Path) -> Result<usize> {
    let index_name = index_column_name(df);
    let mut indexed = df.with_row_index(index_name.into(), None)?;

    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut indexed)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "wrote dataset csv"
    );
    Ok(df.height())
}

/// The index header is left blank unless a data column already uses that name.
fn index_column_name(df: &DataFrame) -> String {
    let taken = |name: &str| df.get_column_names().iter().any(|c| c.as_str() == name);
    if !taken("") {
        return String::new();
    }
    let mut candidate = "index".to_string();
    let mut suffix = 1usize;
    while taken(&candidate) {
        candidate = format!("index_{suffix}");
        suffix += 1;
    }
    candidate
}
