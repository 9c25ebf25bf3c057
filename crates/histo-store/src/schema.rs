//! Column type inference.

use histo_model::{ColumnDefinition, ColumnType, STEP_MARKER, TableDefinition};
use polars::prelude::{DataFrame, DataType};

use crate::error::Result;

/// Target type for a normalized column.
///
/// Marker-prefixed columns are always text, whatever their values look like.
/// Otherwise 64-bit integers, 64-bit floats and booleans keep their SQL
/// counterpart and everything else is text.
pub fn infer_column_type(name: &str, dtype: &DataType) -> ColumnType {
    if name.contains(STEP_MARKER) {
        return ColumnType::Text;
    }
    match dtype {
        DataType::Int64 => ColumnType::Integer,
        DataType::Float64 => ColumnType::Float,
        DataType::Boolean => ColumnType::Boolean,
        _ => ColumnType::Text,
    }
}

/// Table definition for a normalized dataset, columns in dataset order.
pub fn table_definition(df: &DataFrame, table: &str) -> Result<TableDefinition> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let name = column.name().as_str();
            ColumnDefinition::new(name, infer_column_type(name, column.dtype()))
        })
        .collect();
    Ok(TableDefinition::new(table, columns)?)
}
