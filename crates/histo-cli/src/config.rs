//! Run configuration: the `export KEY=VALUE` environment file, the dataset
//! definition file and the typed [`Settings`] validated from them.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use histo_model::{DatasetDefinition, DatasetSpec, Mode};
use histo_store::redact_url;
use reqwest::Url;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

pub const GOOGLE_SOURCE_KEY: &str = "HISTORIONOMY_GOOGLE_SOURCE";
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";
pub const PROJECT_URL_KEY: &str = "SUPABASE_PROJECT_URL";
pub const PROJECT_API_KEY_KEY: &str = "SUPABASE_PROJECT_API_KEY";
pub const PROJECT_ID_KEY: &str = "SUPABASE_PROJECT_ID";
pub const PROJECT_PASSWORD_KEY: &str = "SUPABASE_PROJECT_PASSWORD";
pub const PUBLIC_HOST_KEY: &str = "SUPABASE_PUBLIC_HOST";

const EXPORT_PREFIX: &str = "export ";
const DATABASE_PORT: u16 = 5432;
const DATABASE_NAME: &str = "postgres";
const DATABASE_USER_PREFIX: &str = "postgres.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid definition file {path}: {source}")]
    DefinitionSyntax {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid definition file {path}: {message}")]
    DefinitionShape { path: PathBuf, message: String },

    #[error("missing keys for {mode} in {path}: {}", keys.join(", "))]
    MissingKeys {
        mode: Mode,
        path: PathBuf,
        keys: Vec<&'static str>,
    },

    #[error("invalid database settings: {message}")]
    DatabaseUrl { message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Read the environment file at `path`.
pub fn load_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = read_file(path)?;
    Ok(parse_env_file(&contents))
}

/// Collect the `export KEY=VALUE` lines of an environment file.
///
/// Lines are trimmed first. Anything that does not start with `export `, or
/// has no `=` after it, is ignored. The value is everything after the first
/// `=`, kept verbatim except for one matching pair of surrounding quotes.
pub fn parse_env_file(contents: &str) -> BTreeMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(EXPORT_PREFIX))
        .filter_map(|assignment| assignment.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Read the dataset definition file at `path`.
pub fn load_definitions(path: &Path) -> Result<Vec<DatasetDefinition>> {
    let contents = read_file(path)?;
    parse_definitions(&contents, path)
}

/// Flatten a `sheet -> dataset -> spec` document into definitions, keeping
/// document order.
pub fn parse_definitions(contents: &str, path: &Path) -> Result<Vec<DatasetDefinition>> {
    let document: Option<Mapping> =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::DefinitionSyntax {
            path: path.to_path_buf(),
            source,
        })?;
    let shape = |message: String| ConfigError::DefinitionShape {
        path: path.to_path_buf(),
        message,
    };

    let mut definitions = Vec::new();
    for (sheet_key, datasets) in document.unwrap_or_default() {
        let sheet = scalar_key(&sheet_key)
            .ok_or_else(|| shape("sheet names must be scalars".to_string()))?;
        let datasets = match datasets {
            Value::Mapping(datasets) => datasets,
            Value::Null => continue,
            _ => return Err(shape(format!("sheet {sheet} must map dataset names to specs"))),
        };
        for (dataset_key, spec) in datasets {
            let name = scalar_key(&dataset_key)
                .ok_or_else(|| shape(format!("dataset names in sheet {sheet} must be scalars")))?;
            let spec = match spec {
                Value::Null => DatasetSpec::default(),
                value @ Value::Mapping(_) => serde_yaml::from_value(value)
                    .map_err(|e| shape(format!("dataset {name} in sheet {sheet}: {e}")))?,
                _ => {
                    return Err(shape(format!(
                        "dataset {name} in sheet {sheet} must be a mapping"
                    )));
                }
            };
            definitions.push(DatasetDefinition::new(sheet.clone(), name, spec));
        }
    }
    Ok(definitions)
}

fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Values a run needs, validated for its mode.
#[derive(Clone, Default)]
pub struct Settings {
    google_source: Option<String>,
    database_url: Option<String>,
    project_url: Option<String>,
}

impl Settings {
    /// Validate `values` for `mode`. Every missing key is reported together.
    ///
    /// `DATABASE_URL`, when set, replaces the `SUPABASE_*` connection keys.
    pub fn from_env(values: &BTreeMap<String, String>, mode: Mode, path: &Path) -> Result<Self> {
        let get = |key: &str| {
            values
                .get(key)
                .filter(|value| !value.trim().is_empty())
                .cloned()
        };
        let mut missing = Vec::new();
        let mut require = |key: &'static str| {
            let value = get(key);
            if value.is_none() {
                missing.push(key);
            }
            value
        };

        let mut settings = Settings::default();
        if mode == Mode::Download {
            settings.google_source = require(GOOGLE_SOURCE_KEY);
        }

        let mut connection = None;
        if mode.needs_database() {
            match get(DATABASE_URL_KEY) {
                Some(url) => settings.database_url = Some(url),
                None => {
                    settings.project_url = require(PROJECT_URL_KEY);
                    // Required alongside the project URL, never used for the connection.
                    require(PROJECT_API_KEY_KEY);
                    connection = Some((
                        require(PROJECT_ID_KEY),
                        require(PROJECT_PASSWORD_KEY),
                        require(PUBLIC_HOST_KEY),
                    ));
                }
            }
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys {
                mode,
                path: path.to_path_buf(),
                keys: missing,
            });
        }
        if let Some((Some(project_id), Some(password), Some(host))) = connection {
            settings.database_url = Some(supabase_database_url(&project_id, &password, &host)?);
        }
        Ok(settings)
    }

    pub fn google_source(&self) -> Option<&str> {
        self.google_source.as_deref()
    }

    /// Connection string of the target database.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn project_url(&self) -> Option<&str> {
        self.project_url.as_deref()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("google_source", &self.google_source)
            .field(
                "database_url",
                &self.database_url.as_deref().map(redact_url),
            )
            .field("project_url", &self.project_url)
            .finish()
    }
}

/// `postgres://postgres.<project_id>:<password>@<host>:5432/postgres`, with
/// the credentials percent-encoded.
pub fn supabase_database_url(project_id: &str, password: &str, host: &str) -> Result<String> {
    let invalid = |message: String| ConfigError::DatabaseUrl { message };
    let mut url = Url::parse(&format!("postgres://{host}:{DATABASE_PORT}/{DATABASE_NAME}"))
        .map_err(|e| invalid(format!("host {host}: {e}")))?;
    url.set_username(&format!("{DATABASE_USER_PREFIX}{project_id}"))
        .map_err(|()| invalid(format!("project id {project_id}")))?;
    url.set_password(Some(password))
        .map_err(|()| invalid("password".to_string()))?;
    Ok(url.to_string())
}
