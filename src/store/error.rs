use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while reading or changing the goal collection.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The goal was rejected before anything changed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No goal has the requested id.
    #[error("goal not found: {0}")]
    NotFound(Uuid),

    /// Reading or writing the backing file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The backing file does not hold a valid goal list.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
