//! Target-database side of the historionomy loader.
//!
//! - [`infer_column_type`] / [`table_definition`]: normalized dataset -> SQL table
//! - [`create_table`]: drop-and-recreate a table from a dataset (initialize)
//! - [`upload_rows`]: batched multi-row inserts into an existing table (upload)
//! - [`SqlTableStore`]: sqlx-backed [`TableStore`] for Postgres and SQLite

mod error;
mod loader;
mod schema;
mod sql;
mod store;
mod values;

pub use error::{Result, StoreError};
pub use loader::{LoadSummary, create_table, upload_rows};
pub use schema::{infer_column_type, table_definition};
pub use sql::{LoadDatabase, SqlTableStore, open_store, redact_url};
pub use store::TableStore;
pub use values::{SqlValue, rows_per_batch, row_values};
