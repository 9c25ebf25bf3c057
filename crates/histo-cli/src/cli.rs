//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "historionomy-load",
    version,
    about = "Load historionomy datasets from a spreadsheet into Postgres",
    long_about = "Load historionomy datasets from a spreadsheet into Postgres.\n\n\
                  Run `download` to fetch every dataset's sheet range into CSV files,\n\
                  `initialize` to (re)create one table per dataset, then `upload`\n\
                  to append the rows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch each dataset's sheet range and write <dataset>.csv.
    Download(RunArgs),

    /// Drop and recreate one table per dataset from its local CSV.
    Initialize(RunArgs),

    /// Append each dataset's local CSV rows to its table.
    Upload(RunArgs),

    /// List the entries of the definition file.
    Datasets(DefinitionArgs),
}

#[derive(Args)]
pub struct DefinitionArgs {
    /// YAML file mapping sheet -> dataset -> column spec.
    #[arg(long = "definitions", value_name = "PATH", default_value = "historionomy-data.yml")]
    pub definitions: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub definition: DefinitionArgs,

    /// Environment file with `export KEY=VALUE` lines.
    #[arg(long = "env-file", value_name = "PATH", default_value = ".env")]
    pub env_file: PathBuf,

    /// Directory holding <dataset>.csv files.
    #[arg(long = "data-dir", value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// What to do when a dataset fails.
    #[arg(long = "on-error", value_enum, default_value = "abort")]
    pub on_error: OnErrorArg,

    /// Maximum rows per insert statement.
    #[arg(
        long = "batch-size",
        value_name = "ROWS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub batch_size: u32,

    /// HTTP timeout for sheet downloads (no timeout by default).
    #[arg(long = "timeout-secs", value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Only process this dataset (repeatable).
    #[arg(long = "dataset", value_name = "NAME")]
    pub datasets: Vec<String>,
}

/// CLI failure policy choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum OnErrorArg {
    /// Stop at the first failing dataset.
    Abort,
    /// Record the failure and continue.
    Skip,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_args_have_defaults() {
        let cli = Cli::try_parse_from(["historionomy-load", "upload"]).unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert_eq!(
            args.definition.definitions,
            PathBuf::from("historionomy-data.yml")
        );
        assert_eq!(args.batch_size, 1000);
        assert!(matches!(args.on_error, OnErrorArg::Abort));
        assert!(args.datasets.is_empty());
    }

    #[test]
    fn dataset_filter_repeats() {
        let cli = Cli::try_parse_from([
            "historionomy-load",
            "download",
            "--dataset",
            "gdp",
            "--dataset",
            "literacy",
            "--on-error",
            "skip",
        ])
        .unwrap();
        let Command::Download(args) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.datasets, vec!["gdp", "literacy"]);
        assert!(matches!(args.on_error, OnErrorArg::Skip));
    }

    #[test]
    fn datasets_takes_definition_path() {
        let cli =
            Cli::try_parse_from(["historionomy-load", "datasets", "--definitions", "defs.yml"])
                .unwrap();
        let Command::Datasets(args) = cli.command else {
            panic!("expected datasets");
        };
        assert_eq!(args.definitions, PathBuf::from("defs.yml"));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(
            Cli::try_parse_from(["historionomy-load", "upload", "--batch-size", "0"]).is_err()
        );
    }
}
