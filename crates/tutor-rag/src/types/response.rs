//! Response types exposed to the surrounding service layer

use serde::{Deserialize, Serialize};

/// Receipt for a processed upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Human-readable status message
    pub message: String,
    /// Original file name
    pub filename: String,
    /// Length of the extracted text in characters
    pub content_length: usize,
}

/// Positional source reference for an answer.
///
/// One entry per retrieved chunk; this records how many chunks contributed
/// and in which order, not a verified citation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Fixed source tag
    pub source: String,
    /// Ordinal position of the chunk in the retrieved context
    pub chunk_id: usize,
}

/// Answer to a tutoring question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer text
    pub answer: String,
    /// Positional metadata about the retrieved context
    pub sources: Vec<SourceRef>,
    /// Context preview, truncated to 500 characters with a trailing
    /// ellipsis when cut (user-facing; not what the model saw)
    pub context_used: String,
}
