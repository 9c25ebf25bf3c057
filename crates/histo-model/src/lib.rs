pub mod definition;
pub mod error;
pub mod processing;
pub mod table;

pub use definition::{DatasetDefinition, DatasetSpec};
pub use error::{ModelError, Result};
pub use processing::{FailurePolicy, Mode};
pub use table::{ColumnDefinition, ColumnType, STEP_MARKER, TableDefinition, quote_identifier};
