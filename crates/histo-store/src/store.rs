use histo_model::TableDefinition;

use crate::error::Result;
use crate::values::SqlValue;

/// Destination for dataset tables.
///
/// Implementations are driven by one caller at a time, one statement at a time.
pub trait TableStore {
    /// Drop the table if present and create it from `table`, committing both together.
    fn recreate_table(&mut self, table: &TableDefinition) -> Result<()>;

    /// Returns true if a table called `table` can be queried.
    fn table_exists(&mut self, table: &str) -> Result<bool>;

    /// Insert `rows` with one multi-row statement. Returns the rows written.
    fn insert_rows(&mut self, table: &TableDefinition, rows: &[Vec<SqlValue>]) -> Result<u64>;

    /// Largest number of bound parameters one statement may carry.
    fn max_bind_params(&self) -> usize;
}
