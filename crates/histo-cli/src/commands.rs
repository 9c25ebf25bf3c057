use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::Table;
use histo_cli::config::{Settings, load_definitions, load_env_file};
use histo_cli::pipeline::{RunOptions, run, select_datasets};
use histo_cli::types::RunResult;
use histo_model::{FailurePolicy, Mode};
use tracing::{debug, info_span};

use crate::cli::{DefinitionArgs, OnErrorArg, RunArgs};
use crate::summary::apply_table_style;

pub fn run_mode(mode: Mode, args: &RunArgs) -> Result<RunResult> {
    let run_span = info_span!("run", mode = %mode);
    let _run_guard = run_span.enter();

    let env = load_env_file(&args.env_file).context("load environment file")?;
    let settings = Settings::from_env(&env, mode, &args.env_file)?;
    debug!(settings = ?settings, "settings loaded");

    let definitions =
        load_definitions(&args.definition.definitions).context("load definition file")?;
    let definitions = select_datasets(definitions, &args.datasets)?;

    let options = RunOptions {
        data_dir: args.data_dir.clone(),
        on_error: match args.on_error {
            OnErrorArg::Abort => FailurePolicy::Abort,
            OnErrorArg::Skip => FailurePolicy::Skip,
        },
        batch_size: args.batch_size as usize,
        timeout: args.timeout_secs.map(Duration::from_secs),
    };
    run(mode, &settings, &definitions, &options)
}

pub fn run_datasets(args: &DefinitionArgs) -> Result<()> {
    let definitions = load_definitions(&args.definitions).context("load definition file")?;
    let mut table = Table::new();
    table.set_header(vec!["Sheet", "Dataset", "Columns", "Custom header", "Processed"]);
    apply_table_style(&mut table);
    for definition in &definitions {
        let header = match definition.custom_header() {
            Some(header) => header.join(", "),
            None => "-".to_string(),
        };
        table.add_row(vec![
            definition.sheet.clone(),
            definition.name.clone(),
            definition.columns().unwrap_or("-").to_string(),
            header,
            if definition.is_processable() { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
