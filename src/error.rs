//! Error types shared by the store, gateway, import and settings layers.

use std::path::PathBuf;

use uuid::Uuid;

/// Result type for timeline operations.
pub type Result<T> = std::result::Result<T, TimelineError>;

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found {found:?}); need at least a name column")]
    MissingColumns { found: Vec<String> },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Unknown item: {0}")]
    UnknownItem(Uuid),
}

impl TimelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TimelineError::Io {
            path: path.into(),
            source,
        }
    }
}
