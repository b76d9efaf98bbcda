//! Error types for freewrite

use thiserror::Error;

/// Main error type for the freewrite library
#[derive(Debug, Error)]
pub enum FreewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write '{key}' to storage: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl FreewriteError {
    /// Short message suitable for the status bar
    pub fn status_message(&self) -> String {
        match self {
            FreewriteError::Storage { key, .. } => {
                format!("Not saved: could not write '{}' (changes kept in memory)", key)
            }
            other => format!("Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FreewriteError>;
