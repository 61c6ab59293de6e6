//! tutor-rag: document-grounded tutoring core
//!
//! Students upload study material; the core extracts text, chunks and
//! embeds it into a durable semantic index, and composes retrieval with an
//! LLM backend to answer questions, generate quizzes and summaries, and
//! grade answers. When the backend is unconfigured or unavailable every
//! flow degrades to clearly labeled placeholder output instead of failing.
//!
//! The surrounding HTTP layer is intentionally absent: construct an
//! [`AppState`] once at startup and call its operations directly.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod grading;
pub mod ingestion;
pub mod quiz;
pub mod retrieval;
pub mod state;
pub mod tutoring;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use state::AppState;
pub use types::{
    AskResponse, ExtractedDocument, FileType, GradeResult, McqAnswer, McqItem, McqSetGrade,
    SourceRef, UploadReceipt,
};

/// Re-export the vector store for convenience
pub use tutor_index;
