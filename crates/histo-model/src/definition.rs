//! Dataset definitions read from the sheet -> dataset -> spec document.

use serde::{Deserialize, Serialize};

/// Per-dataset fields as written in the definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Column range inside the sheet (e.g. `A:F`). Entries without it are not processed.
    #[serde(default)]
    pub columns: Option<String>,
    /// Replace the fetched header with [`DatasetSpec::header`].
    #[serde(default)]
    pub custom_header: bool,
    /// Ordered column labels, used only when `custom_header` is set.
    #[serde(default)]
    pub header: Vec<String>,
}

/// One dataset entry, flattened out of its sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    pub sheet: String,
    pub name: String,
    pub spec: DatasetSpec,
}

impl DatasetDefinition {
    pub fn new(sheet: impl Into<String>, name: impl Into<String>, spec: DatasetSpec) -> Self {
        Self {
            sheet: sheet.into(),
            name: name.into(),
            spec,
        }
    }

    /// The column range, if the entry declares one.
    pub fn columns(&self) -> Option<&str> {
        self.spec.columns.as_deref()
    }

    /// Only entries with a column range take part in a run.
    pub fn is_processable(&self) -> bool {
        self.spec.columns.is_some()
    }

    /// The header that replaces fetched labels, when `custom_header` is enabled.
    pub fn custom_header(&self) -> Option<&[String]> {
        self.spec
            .custom_header
            .then_some(self.spec.header.as_slice())
    }

    /// Target table name. Always the dataset name.
    pub fn table_name(&self) -> &str {
        &self.name
    }

    /// Local CSV file name for this dataset.
    pub fn csv_file_name(&self) -> String {
        format!("{}.csv", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(columns: Option<&str>, custom_header: bool, header: &[&str]) -> DatasetSpec {
        DatasetSpec {
            columns: columns.map(str::to_string),
            custom_header,
            header: header.iter().map(|h| (*h).to_string()).collect(),
        }
    }

    #[test]
    fn entry_without_columns_is_not_processable() {
        let def = DatasetDefinition::new("Economy", "notes", spec(None, false, &[]));
        assert!(!def.is_processable());
        assert_eq!(def.columns(), None);
    }

    #[test]
    fn header_ignored_unless_enabled() {
        let def = DatasetDefinition::new("Economy", "gdp", spec(Some("A:C"), false, &["a", "b"]));
        assert_eq!(def.custom_header(), None);

        let def = DatasetDefinition::new("Economy", "gdp", spec(Some("A:C"), true, &["a", "b"]));
        assert_eq!(def.custom_header().map(<[String]>::len), Some(2));
    }

    #[test]
    fn table_and_file_names_follow_dataset_name() {
        let def = DatasetDefinition::new("Economy", "gdp_growth", spec(Some("A:C"), false, &[]));
        assert_eq!(def.table_name(), "gdp_growth");
        assert_eq!(def.csv_file_name(), "gdp_growth.csv");
    }
}
