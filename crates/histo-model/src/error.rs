use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("table name must not be empty")]
    EmptyTableName,
    #[error("table {table} has no columns")]
    NoColumns { table: String },
    #[error("table {table} has an empty column name at position {position}")]
    EmptyColumnName { table: String, position: usize },
    #[error("unknown mode '{0}' (expected download, initialize or upload)")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
