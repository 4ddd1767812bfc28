use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimelineError>;

/// Errors raised by scale configuration and task IO.
///
/// Layout itself never fails: empty or degenerate input produces empty output.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid scale '{key}': {reason}")]
    InvalidScale { key: String, reason: String },

    #[error("unknown scale '{0}'")]
    UnknownScale(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns. Found headers: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("no task rows found")]
    Empty,
}

impl TimelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
