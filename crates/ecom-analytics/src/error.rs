//! Analytics error types.

use chrono::NaiveDate;
use ecom_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the input files. None of these are recoverable
/// at this layer.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Input file does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A row does not fit the expected schema
    #[error("Parse error in {} at line {}: {message}", path.display(), line.map_or_else(|| "?".to_string(), |l| l.to_string()))]
    Parse {
        path: PathBuf,
        line: Option<u64>,
        message: String,
    },

    /// Any other IO failure
    #[error("IO error: {0}")]
    Other(#[from] std::io::Error),
}

impl LoadError {
    /// Classify a CSV reader error for `path`.
    pub(crate) fn from_csv(path: &std::path::Path, err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Other(io),
            kind => Self::Parse {
                path: path.to_path_buf(),
                line,
                message: describe(&kind),
            },
        }
    }
}

fn describe(kind: &csv::ErrorKind) -> String {
    match kind {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8: {err}"),
        other => format!("{other:?}"),
    }
}

/// Analytics errors.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Loading the dataset failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Filter range with start after end
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Invalid domain value
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
