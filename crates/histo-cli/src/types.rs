use histo_model::Mode;

/// How one dataset entry ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetStatus {
    Done,
    /// Not processable (no column range); nothing was attempted.
    Skipped,
    Failed,
}

impl DatasetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetStatus::Done => "done",
            DatasetStatus::Skipped => "skipped",
            DatasetStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatasetOutcome {
    pub sheet: String,
    pub dataset: String,
    pub status: DatasetStatus,
    /// Rows fetched, read or inserted, depending on the mode.
    pub rows: Option<u64>,
    pub columns: Option<usize>,
    pub detail: String,
}

#[derive(Debug)]
pub struct RunResult {
    pub mode: Mode,
    pub outcomes: Vec<DatasetOutcome>,
    /// A failure stopped the run before every dataset was visited.
    pub aborted: bool,
}

impl RunResult {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            outcomes: Vec::new(),
            aborted: false,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.aborted
            || self
                .outcomes
                .iter()
                .any(|outcome| outcome.status == DatasetStatus::Failed)
    }

    pub fn count(&self, status: DatasetStatus) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == status)
            .count()
    }

    pub fn total_rows(&self) -> u64 {
        self.outcomes.iter().filter_map(|outcome| outcome.rows).sum()
    }
}
