//! CSV file reading with a leading row-index column.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 0 {
        return Err(IngestError::EmptyCsv {
            source_name: path.display().to_string(),
        });
    }

    if bytes_read >= 2 {
        // UTF-16 LE BOM
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        // UTF-16 BE BOM
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads a dataset CSV written by [`write_dataset_csv`](super::write_dataset_csv).
///
/// The first row is the header. The first column is a row index and is dropped.
/// Column types are inferred from every row.
pub fn read_dataset_csv(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;

    let source_name = path.display().to_string();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;

    let df = drop_index_column(df, &source_name)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read dataset csv"
    );
    Ok(df)
}

/// Parses an in-memory CSV document (header row, no index column).
pub fn parse_csv_bytes(bytes: Vec<u8>, source_name: &str) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyCsv {
            source_name: source_name.to_string(),
        });
    }

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
}

fn drop_index_column(df: DataFrame, source_name: &str) -> Result<DataFrame> {
    let Some(index) = df.get_column_names().first().map(|name| name.to_string()) else {
        return Err(IngestError::EmptyCsv {
            source_name: source_name.to_string(),
        });
    };
    Ok(df.drop(&index)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_dataset_csv_drops_index() {
        let file = create_temp_csv(",Country,1950\n0,Italy,12\n1,France,15\n");
        let df = read_dataset_csv(file.path()).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["Country", "1950"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_read_dataset_csv_missing_file() {
        let result = read_dataset_csv(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_dataset_csv_empty_file() {
        let file = create_temp_csv("");
        let result = read_dataset_csv(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'a', 0]).unwrap();
        let result = validate_encoding(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_csv_bytes_infers_types() {
        let df = parse_csv_bytes(b"Year,Rate,Capital\n1950,1.5,true\n1960,2,false\n".to_vec(), "mem")
            .unwrap();
        assert_eq!(df.width(), 3);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Year").unwrap().dtype(), &polars::prelude::DataType::Int64);
        assert_eq!(df.column("Rate").unwrap().dtype(), &polars::prelude::DataType::Float64);
        assert_eq!(df.column("Capital").unwrap().dtype(), &polars::prelude::DataType::Boolean);
    }

    #[test]
    fn test_parse_csv_bytes_empty_body() {
        let result = parse_csv_bytes(b"  \n".to_vec(), "mem");
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }
}
