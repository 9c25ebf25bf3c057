//! Initialize and upload operations over a [`TableStore`].

use std::time::Instant;

use histo_model::TableDefinition;
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::schema::table_definition;
use crate::store::TableStore;
use crate::values::{row_values, rows_per_batch};

/// Outcome of an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: u64,
    pub batches: usize,
}

/// Drop and recreate `table` from the normalized dataset's inferred schema.
pub fn create_table(
    store: &mut dyn TableStore,
    df: &DataFrame,
    table: &str,
) -> Result<TableDefinition> {
    let definition = table_definition(df, table)?;
    info!(
        table = %definition.name(),
        statement = %definition.create_statement(),
        "recreating table"
    );
    store.recreate_table(&definition)?;
    Ok(definition)
}

/// Append every row of the normalized dataset to an existing table.
///
/// Rows go out in multi-row batches; each batch is atomic on its own.
pub fn upload_rows(
    store: &mut dyn TableStore,
    df: &DataFrame,
    table: &str,
    batch_size: usize,
) -> Result<LoadSummary> {
    let definition = table_definition(df, table)?;
    if !store.table_exists(definition.name())? {
        return Err(StoreError::MissingTable {
            table: definition.name().to_string(),
        });
    }

    let per_batch = rows_per_batch(
        definition.columns().len(),
        batch_size,
        store.max_bind_params(),
    );
    let start = Instant::now();
    let mut summary = LoadSummary::default();
    let mut offset = 0usize;
    while offset < df.height() {
        let end = (offset + per_batch).min(df.height());
        let rows = (offset..end)
            .map(|row| row_values(df, &definition, row))
            .collect::<Result<Vec<_>>>()?;
        summary.rows += store.insert_rows(&definition, &rows)?;
        summary.batches += 1;
        debug!(
            table = %definition.name(),
            batch = summary.batches,
            rows = rows.len(),
            "inserted batch"
        );
        offset = end;
    }

    info!(
        table = %definition.name(),
        rows = summary.rows,
        batches = summary.batches,
        duration_ms = start.elapsed().as_millis(),
        "upload complete"
    );
    Ok(summary)
}
