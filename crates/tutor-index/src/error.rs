//! Error types for the vector store

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Vector store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be read back (corruption or layout change)
    #[error("Unreadable snapshot at '{path}': {message}")]
    Snapshot { path: PathBuf, message: String },

    /// Vector has the wrong number of dimensions
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl StoreError {
    /// Create a snapshot error
    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }
}
