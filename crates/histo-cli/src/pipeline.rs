//! Per-mode run loop.
//!
//! [`run`] visits the selected definitions in document order and applies one
//! mode to each processable entry:
//! 1. **download**: fetch the sheet range and write `<dataset>.csv`
//! 2. **initialize**: normalize the local CSV and recreate its table
//! 3. **upload**: normalize the local CSV and append its rows to the table
//!
//! The export client or database store is opened once, before the first
//! dataset, and released when the run returns.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use histo_ingest::{SheetExportClient, dataset_csv_path, load_normalized, write_dataset_csv};
use histo_model::{DatasetDefinition, FailurePolicy, Mode};
use histo_store::{TableStore, create_table, open_store, redact_url, upload_rows};
use tracing::{error, info, info_span};

use crate::config::{GOOGLE_SOURCE_KEY, Settings};
use crate::types::{DatasetOutcome, DatasetStatus, RunResult};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Knobs shared by every mode.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory holding `<dataset>.csv` files.
    pub data_dir: PathBuf,
    pub on_error: FailurePolicy,
    /// Upper bound on rows per insert statement.
    pub batch_size: usize,
    /// HTTP timeout for the sheet export. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            on_error: FailurePolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: None,
        }
    }
}

/// Keep only the named datasets, in document order. No names keeps everything.
pub fn select_datasets(
    definitions: Vec<DatasetDefinition>,
    names: &[String],
) -> Result<Vec<DatasetDefinition>> {
    if names.is_empty() {
        return Ok(definitions);
    }
    let unknown: Vec<&str> = names
        .iter()
        .filter(|name| !definitions.iter().any(|d| &d.name == *name))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!("unknown dataset(s): {}", unknown.join(", "));
    }
    Ok(definitions
        .into_iter()
        .filter(|definition| names.contains(&definition.name))
        .collect())
}

enum Target {
    Sheet(SheetExportClient),
    Store(Box<dyn TableStore>),
}

/// Apply `mode` to every processable definition.
///
/// Dataset failures are recorded in the result. With [`FailurePolicy::Abort`]
/// the first failure also ends the loop. Errors opening the export client or
/// the database are returned directly.
pub fn run(
    mode: Mode,
    settings: &Settings,
    definitions: &[DatasetDefinition],
    options: &RunOptions,
) -> Result<RunResult> {
    let mut target = open_target(mode, settings, options)?;
    let mut result = RunResult::new(mode);
    let run_start = Instant::now();

    for definition in definitions {
        let span = info_span!(
            "dataset",
            mode = %mode,
            sheet = %definition.sheet,
            dataset = %definition.name
        );
        let _guard = span.enter();

        if !definition.is_processable() {
            info!("no column range, skipping");
            result.outcomes.push(DatasetOutcome {
                sheet: definition.sheet.clone(),
                dataset: definition.name.clone(),
                status: DatasetStatus::Skipped,
                rows: None,
                columns: None,
                detail: "no column range".to_string(),
            });
            continue;
        }

        let dataset_start = Instant::now();
        match process_dataset(mode, definition, options, &mut target) {
            Ok(processed) => {
                info!(
                    rows = processed.rows,
                    columns = processed.columns,
                    duration_ms = dataset_start.elapsed().as_millis(),
                    "dataset complete"
                );
                result.outcomes.push(DatasetOutcome {
                    sheet: definition.sheet.clone(),
                    dataset: definition.name.clone(),
                    status: DatasetStatus::Done,
                    rows: Some(processed.rows),
                    columns: Some(processed.columns),
                    detail: processed.detail,
                });
            }
            Err(err) => {
                let detail = format!("{err:#}");
                error!(error = %detail, "dataset failed");
                result.outcomes.push(DatasetOutcome {
                    sheet: definition.sheet.clone(),
                    dataset: definition.name.clone(),
                    status: DatasetStatus::Failed,
                    rows: None,
                    columns: None,
                    detail,
                });
                if options.on_error == FailurePolicy::Abort {
                    result.aborted = true;
                    break;
                }
            }
        }
    }

    info!(
        mode = %mode,
        done = result.count(DatasetStatus::Done),
        skipped = result.count(DatasetStatus::Skipped),
        failed = result.count(DatasetStatus::Failed),
        aborted = result.aborted,
        duration_ms = run_start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

fn open_target(mode: Mode, settings: &Settings, options: &RunOptions) -> Result<Target> {
    match mode {
        Mode::Download => {
            let source = settings
                .google_source()
                .ok_or_else(|| anyhow!("{GOOGLE_SOURCE_KEY} is not configured"))?;
            let client = SheetExportClient::new(source, options.timeout)
                .context("create sheet export client")?;
            info!(source = %client.base_url(), "exporting from sheet");
            Ok(Target::Sheet(client))
        }
        Mode::Initialize | Mode::Upload => {
            let url = settings
                .database_url()
                .ok_or_else(|| anyhow!("no database connection configured"))?;
            if let Some(project) = settings.project_url() {
                info!(project = %project, "supabase project");
            }
            info!(database = %redact_url(url), "opening database");
            let store = open_store(url).context("open target database")?;
            Ok(Target::Store(store))
        }
    }
}

struct Processed {
    rows: u64,
    columns: usize,
    detail: String,
}

fn process_dataset(
    mode: Mode,
    definition: &DatasetDefinition,
    options: &RunOptions,
    target: &mut Target,
) -> Result<Processed> {
    let path = dataset_csv_path(&options.data_dir, &definition.name);
    match (mode, target) {
        (Mode::Download, Target::Sheet(client)) => {
            let df = client.fetch(definition)?;
            let rows = write_dataset_csv(&df, &path)?;
            Ok(Processed {
                rows: rows as u64,
                columns: df.width(),
                detail: format!("wrote {}", path.display()),
            })
        }
        (Mode::Initialize, Target::Store(store)) => {
            let df = load_normalized(&path)?;
            let table = create_table(store.as_mut(), &df, definition.table_name())?;
            Ok(Processed {
                rows: df.height() as u64,
                columns: table.columns().len(),
                detail: format!("created table {}", table.name()),
            })
        }
        (Mode::Upload, Target::Store(store)) => {
            let df = load_normalized(&path)?;
            let summary = upload_rows(
                store.as_mut(),
                &df,
                definition.table_name(),
                options.batch_size,
            )?;
            Ok(Processed {
                rows: summary.rows,
                columns: df.width(),
                detail: format!("{} batch(es) into {}", summary.batches, definition.table_name()),
            })
        }
        (mode, _) => bail!("no {mode} target is open"),
    }
}
