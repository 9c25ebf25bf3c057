//! Typed cell values for parameter binding.

use histo_common::{any_to_bool, any_to_f64, any_to_i64, any_to_text};
use histo_model::{ColumnType, TableDefinition};
use polars::prelude::{AnyValue, DataFrame};

use crate::error::Result;

/// One cell, typed by its target column. `None` binds a typed NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(Option<i64>),
    Float(Option<f64>),
    Boolean(Option<bool>),
    Text(Option<String>),
}

impl SqlValue {
    pub fn from_any(value: AnyValue<'_>, column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Integer => SqlValue::Integer(any_to_i64(value)),
            ColumnType::Float => SqlValue::Float(any_to_f64(value)),
            ColumnType::Boolean => SqlValue::Boolean(any_to_bool(value)),
            ColumnType::Text => SqlValue::Text(any_to_text(value)),
        }
    }
}

/// Values of one row, in the table's column order.
pub fn row_values(df: &DataFrame, table: &TableDefinition, row: usize) -> Result<Vec<SqlValue>> {
    table
        .columns()
        .iter()
        .map(|column| {
            let value = df.column(&column.name)?.get(row)?;
            Ok(SqlValue::from_any(value, column.column_type))
        })
        .collect()
}

/// Rows per INSERT statement: at most `requested`, and never more bound
/// parameters than `max_params`. Always at least one row.
pub fn rows_per_batch(width: usize, requested: usize, max_params: usize) -> usize {
    let by_params = max_params / width.max(1);
    requested.min(by_params).max(1)
}
