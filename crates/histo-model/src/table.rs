//! SQL table definitions derived from normalized datasets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Prefix given to digit-only column names. Columns carrying it are always text.
pub const STEP_MARKER: &str = "step_";

/// Target column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    /// SQL spelling used in `CREATE TABLE`.
    pub fn sql_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "FLOAT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Text => "TEXT",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A flat table: typed columns in dataset order, no keys, no constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    name: String,
    columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Builds a definition, rejecting empty table names, empty column lists and blank columns.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyTableName);
        }
        if columns.is_empty() {
            return Err(ModelError::NoColumns { table: name });
        }
        if let Some(position) = columns.iter().position(|c| c.name.trim().is_empty()) {
            return Err(ModelError::EmptyColumnName {
                table: name,
                position,
            });
        }
        Ok(Self { name, columns })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_identifier(&self.name))
    }

    pub fn create_statement(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.column_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {} ({columns})", quote_identifier(&self.name))
    }
}

/// Double-quotes an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
