//! CSV reading and writing utilities.

mod reader;
mod writer;

use std::path::{Path, PathBuf};

pub use reader::{parse_csv_bytes, read_dataset_csv, validate_encoding};
pub use writer::write_dataset_csv;

/// Path of the local CSV file for a dataset: `<data_dir>/<dataset>.csv`.
pub fn dataset_csv_path(data_dir: &Path, dataset: &str) -> PathBuf {
    data_dir.join(format!("{dataset}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_csv_path() {
        assert_eq!(
            dataset_csv_path(Path::new("data"), "gdp"),
            PathBuf::from("data/gdp.csv")
        );
    }
}
