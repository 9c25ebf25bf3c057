//! Error types for table definition and loading.

use histo_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported database URL scheme '{scheme}' (expected postgres or sqlite)")]
    UnsupportedUrl { scheme: String },

    #[error("failed to start database runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to recreate table {table}: {source}")]
    Ddl {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("table {table} does not exist; run initialize before upload")]
    MissingTable { table: String },

    #[error("failed to insert into {table}: {source}")]
    Insert {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to query {table}: {source}")]
    Query {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid table definition: {0}")]
    Definition(#[from] ModelError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for StoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
