//! Column name normalization.

use std::collections::BTreeSet;
use std::path::Path;

use histo_model::STEP_MARKER;
use polars::prelude::DataFrame;

use crate::csv::read_dataset_csv;
use crate::error::{IngestError, Result};

/// Canonical form of a column name.
///
/// Applied in order: whitespace becomes `_`, the name is lowercased, and a
/// name made only of digits gets the `step_` marker so it never reaches the
/// database as a bare number.
pub fn normalize_column_name(raw: &str) -> String {
    let underscored: String = raw
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect();
    let lowered = underscored.to_lowercase();
    if !lowered.is_empty() && lowered.chars().all(|ch| ch.is_ascii_digit()) {
        format!("{STEP_MARKER}{lowered}")
    } else {
        lowered
    }
}

/// Renames every column of `df` to its canonical form. Values are untouched.
pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_column_name(name.as_str()))
        .collect();
    ensure_unique(&names)?;
    df.set_column_names(names)?;
    Ok(df)
}

/// Reads `<dataset>.csv` and normalizes its column names.
pub fn load_normalized(path: &Path) -> Result<DataFrame> {
    normalize_columns(read_dataset_csv(path)?)
}

pub(crate) fn ensure_unique(names: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateColumn {
                column: name.clone(),
            });
        }
    }
    Ok(())
}
