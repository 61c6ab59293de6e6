//! Error types for the tutoring core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Tutoring core errors.
///
/// Generation-backend degradation is deliberately absent: a failed or
/// unconfigured backend produces labeled placeholder text, never an error
/// (see [`crate::generation::GenerationClient`]).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported file extension (user input error, reported verbatim)
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Extraction failed inside a format handler
    #[error("Failed to process document '{filename}': {message}")]
    DocumentProcessing { filename: String, message: String },

    /// The semantic index could not be opened, even after one recreation
    /// attempt. Fatal at startup.
    #[error("Semantic index unavailable: {0}")]
    IndexUnavailable(String),

    /// Runtime index fault (append or flush failed)
    #[error("Index error: {0}")]
    Index(String),

    /// Embedding generation failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// LLM output did not match the expected schema. Internal to quiz and
    /// grade parsing; always absorbed into a fallback, never surfaced.
    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a document processing error
    pub fn document_processing(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentProcessing {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a schema validation error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaValidation(message.into())
    }

    /// Create an index error
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index(message.into())
    }
}

impl From<tutor_index::StoreError> for Error {
    fn from(err: tutor_index::StoreError) -> Self {
        Error::Index(err.to_string())
    }
}
