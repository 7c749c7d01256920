use std::path::PathBuf;

use serde::Serialize;

use stumpage_transform::{ConversionStats, DatasetStats, MergeOutcome, YearSpan};

/// Longest source error message kept in a run summary.
pub const MAX_ERROR_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SourceStatus {
    Ok,
    /// Input missing or yielded no records.
    Empty,
    /// The adapter failed; the message is truncated.
    Error(String),
}

impl SourceStatus {
    pub fn error(message: &str) -> Self {
        SourceStatus::Error(message.chars().take(MAX_ERROR_CHARS).collect())
    }

    pub fn label(&self) -> &str {
        match self {
            SourceStatus::Ok => "ok",
            SourceStatus::Empty => "empty",
            SourceStatus::Error(message) => message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub code: String,
    pub name: String,
    pub kind: &'static str,
    #[serde(flatten)]
    pub status: SourceStatus,
    pub records: usize,
    /// Input rows the adapter could not use.
    pub skipped: usize,
    pub years: Option<YearSpan>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// RFC 3339 UTC timestamp of the run.
    pub generated_at: String,
    pub output: PathBuf,
    /// False on dry runs.
    pub written: bool,
    pub sources: Vec<SourceReport>,
    /// Rows read back from an existing unified file.
    pub existing_records: usize,
    pub conversion: ConversionStats,
    pub merges: Vec<MergeOutcome>,
    pub duplicates_dropped: usize,
    pub dataset: DatasetStats,
}

impl RunSummary {
    pub fn failed_sources(&self) -> usize {
        self.sources
            .iter()
            .filter(|source| matches!(source.status, SourceStatus::Error(_)))
            .count()
    }
}
