use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Operation applied to every processable dataset in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fetch the sheet range and write `<dataset>.csv`.
    Download,
    /// Drop and recreate the target table from the local CSV.
    Initialize,
    /// Append the local CSV rows to the existing target table.
    Upload,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Download => "download",
            Mode::Initialize => "initialize",
            Mode::Upload => "upload",
        }
    }

    /// Returns true when the mode talks to the target database.
    pub fn needs_database(&self) -> bool {
        matches!(self, Mode::Initialize | Mode::Upload)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "download" => Ok(Mode::Download),
            "initialize" => Ok(Mode::Initialize),
            "upload" => Ok(Mode::Upload),
            _ => Err(ModelError::UnknownMode(s.to_string())),
        }
    }
}

/// What a run does when one dataset fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failing dataset.
    #[default]
    Abort,
    /// Record the failure and continue with the next dataset.
    Skip,
}
