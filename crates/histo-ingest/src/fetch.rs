//! Sheet export client.
//!
//! Fetches one column range of a sheet as CSV from the spreadsheet export
//! endpoint (`<base>/gviz/tq?tqx=out:csv&sheet=..&range=..`).

use std::time::Duration;

use histo_model::DatasetDefinition;
use polars::prelude::DataFrame;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, info};

use crate::csv::parse_csv_bytes;
use crate::error::{IngestError, Result};
use crate::normalize::ensure_unique;

/// Export path appended to the configured source URL.
pub const EXPORT_PATH: &str = "gviz/tq";

/// Builds the CSV export URL for a column range of a sheet.
pub fn export_url(base: &str, sheet: &str, range: &str) -> Result<Url> {
    let raw = format!("{}/{EXPORT_PATH}", base.trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|e| IngestError::InvalidUrl {
        url: raw.clone(),
        message: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("tqx", "out:csv")
        .append_pair("sheet", sheet)
        .append_pair("range", range);
    Ok(url)
}

/// Replaces the column labels of `df` with a declared header.
///
/// The declared list must have exactly one label per fetched column.
pub fn apply_custom_header(mut df: DataFrame, header: &[String], dataset: &str) -> Result<DataFrame> {
    if header.len() != df.width() {
        return Err(IngestError::HeaderMismatch {
            dataset: dataset.to_string(),
            declared: header.len(),
            fetched: df.width(),
        });
    }
    ensure_unique(header)?;
    df.set_column_names(header.to_vec())?;
    Ok(df)
}

/// Blocking client for the spreadsheet CSV export endpoint.
pub struct SheetExportClient {
    /// HTTP client.
    client: Client,
    /// Source URL of the spreadsheet document.
    base_url: String,
}

impl SheetExportClient {
    /// Create a client for a spreadsheet source. `timeout` of `None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.into();
        // Validate once so every dataset URL is known to parse.
        export_url(&base_url, "", "")?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| IngestError::Network {
            url: base_url.clone(),
            source: e,
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a dataset's column range and apply its custom header, if any.
    pub fn fetch(&self, definition: &DatasetDefinition) -> Result<DataFrame> {
        let range = definition.columns().unwrap_or_default();
        let url = export_url(&self.base_url, &definition.sheet, range)?;
        info!(
            dataset = %definition.name,
            sheet = %definition.sheet,
            range = %range,
            url = %url,
            "fetching dataset"
        );

        let df = self.fetch_csv(url)?;
        match definition.custom_header() {
            Some(header) => apply_custom_header(df, header, &definition.name),
            None => Ok(df),
        }
    }

    fn fetch_csv(&self, url: Url) -> Result<DataFrame> {
        let url_text = url.to_string();
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/csv")
            .send()
            .map_err(|e| IngestError::Network {
                url: url_text.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IngestError::HttpStatus {
                url: url_text,
                status,
                message,
            });
        }

        let body = response.bytes().map_err(|e| IngestError::Network {
            url: url_text.clone(),
            source: e,
        })?;
        debug!(url = %url_text, bytes = body.len(), "received export");
        parse_csv_bytes(body.to_vec(), &url_text)
    }
}
