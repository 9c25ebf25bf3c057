//! Download, initialize and upload runs end to end: a one-shot local HTTP
//! server stands in for the sheet export and SQLite for the target database.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use histo_cli::config::{DATABASE_URL_KEY, GOOGLE_SOURCE_KEY, Settings};
use histo_cli::pipeline::{RunOptions, run};
use histo_cli::types::{DatasetStatus, RunResult};
use histo_model::{DatasetDefinition, DatasetSpec, FailurePolicy, Mode};
use histo_store::SqlTableStore;
use sqlx::Sqlite;
use tempfile::TempDir;

const GDP_CSV: &str = ",country,GDP Growth,1950\n0,France,3,10\n1,Chad,5,20\n";

fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).expect("read") == 0 || line == "\r\n" {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write");
    });
    format!("http://{addr}/spreadsheets/d/doc")
}

fn dataset(name: &str, columns: Option<&str>) -> DatasetDefinition {
    DatasetDefinition::new(
        "Economy",
        name,
        DatasetSpec {
            columns: columns.map(str::to_string),
            ..DatasetSpec::default()
        },
    )
}

fn settings(key: &str, value: &str, mode: Mode) -> Settings {
    let env = BTreeMap::from([(key.to_string(), value.to_string())]);
    Settings::from_env(&env, mode, Path::new(".env")).expect("settings")
}

fn database_settings(dir: &TempDir, mode: Mode) -> Settings {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("load.db").display());
    settings(DATABASE_URL_KEY, &url, mode)
}

fn options(dir: &TempDir, on_error: FailurePolicy) -> RunOptions {
    RunOptions {
        data_dir: dir.path().to_path_buf(),
        on_error,
        ..RunOptions::default()
    }
}

fn describe(result: &RunResult) -> String {
    result
        .outcomes
        .iter()
        .map(|outcome| {
            format!(
                "{} {} rows={} columns={}",
                outcome.dataset,
                outcome.status.as_str(),
                outcome.rows.map_or("-".to_string(), |r| r.to_string()),
                outcome.columns.map_or("-".to_string(), |c| c.to_string()),
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[test]
fn download_initialize_upload() {
    let dir = TempDir::new().unwrap();
    let definitions = vec![dataset("gdp", Some("A:C")), dataset("notes", None)];

    let base = serve_once("country,GDP Growth,1950\nFrance,3,10\nChad,5,20\n");
    let downloaded = run(
        Mode::Download,
        &settings(GOOGLE_SOURCE_KEY, &base, Mode::Download),
        &definitions,
        &options(&dir, FailurePolicy::Abort),
    )
    .unwrap();
    assert!(!downloaded.has_errors());
    insta::assert_snapshot!(
        describe(&downloaded),
        @"gdp done rows=2 columns=3; notes skipped rows=- columns=-"
    );
    assert!(dir.path().join("gdp.csv").exists());
    assert!(!dir.path().join("notes.csv").exists());

    let initialized = run(
        Mode::Initialize,
        &database_settings(&dir, Mode::Initialize),
        &definitions,
        &options(&dir, FailurePolicy::Abort),
    )
    .unwrap();
    assert!(!initialized.has_errors());

    let uploaded = run(
        Mode::Upload,
        &database_settings(&dir, Mode::Upload),
        &definitions,
        &options(&dir, FailurePolicy::Abort),
    )
    .unwrap();
    assert!(!uploaded.has_errors());
    assert_eq!(uploaded.total_rows(), 2);

    let url = format!("sqlite://{}", dir.path().join("load.db").display());
    let store = SqlTableStore::<Sqlite>::connect(&url).unwrap();
    let columns: Vec<(String, String)> = store
        .block_on(
            sqlx::query_as("SELECT name, type FROM pragma_table_info('gdp') ORDER BY cid")
                .fetch_all(store.pool()),
        )
        .unwrap();
    assert_eq!(
        columns,
        vec![
            ("country".to_string(), "TEXT".to_string()),
            ("gdp_growth".to_string(), "INTEGER".to_string()),
            ("step_1950".to_string(), "TEXT".to_string()),
        ]
    );
    let steps: Vec<String> = store
        .block_on(
            sqlx::query_scalar("SELECT step_1950 FROM gdp ORDER BY rowid").fetch_all(store.pool()),
        )
        .unwrap();
    assert_eq!(steps, vec!["10", "20"]);
}

#[test]
fn header_mismatch_aborts_download() {
    let dir = TempDir::new().unwrap();
    let mut gdp = dataset("gdp", Some("A:C"));
    gdp.spec.custom_header = true;
    gdp.spec.header = vec!["country".to_string(), "growth".to_string()];
    let definitions = vec![gdp, dataset("trade", Some("D:E"))];

    let base = serve_once("a,b,c\n1,2,3\n");
    let result = run(
        Mode::Download,
        &settings(GOOGLE_SOURCE_KEY, &base, Mode::Download),
        &definitions,
        &options(&dir, FailurePolicy::Abort),
    )
    .unwrap();

    assert!(result.aborted);
    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(result.outcomes[0].status, DatasetStatus::Failed);
    assert!(
        result.outcomes[0]
            .detail
            .contains("declares 2 header labels but the sheet returned 3 columns")
    );
    assert!(!dir.path().join("gdp.csv").exists());
}

#[test]
fn upload_without_initialize_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gdp.csv"), GDP_CSV).unwrap();

    let result = run(
        Mode::Upload,
        &database_settings(&dir, Mode::Upload),
        &[dataset("gdp", Some("A:C"))],
        &options(&dir, FailurePolicy::Abort),
    )
    .unwrap();

    assert!(result.has_errors());
    assert_eq!(
        result.outcomes[0].detail,
        "table gdp does not exist; run initialize before upload"
    );
}

#[test]
fn skip_policy_continues_after_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gdp.csv"), GDP_CSV).unwrap();
    let definitions = vec![dataset("missing", Some("A:B")), dataset("gdp", Some("A:C"))];

    let skipped = run(
        Mode::Initialize,
        &database_settings(&dir, Mode::Initialize),
        &definitions,
        &options(&dir, FailurePolicy::Skip),
    )
    .unwrap();
    assert!(skipped.has_errors());
    assert!(!skipped.aborted);
    insta::assert_snapshot!(
        describe(&skipped),
        @"missing failed rows=- columns=-; gdp done rows=2 columns=3"
    );

    let aborted = run(
        Mode::Initialize,
        &database_settings(&dir, Mode::Initialize),
        &definitions,
        &options(&dir, FailurePolicy::Abort),
    )
    .unwrap();
    assert!(aborted.aborted);
    assert_eq!(aborted.outcomes.len(), 1);
}
