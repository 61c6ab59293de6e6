//! Core types for the tutoring system

pub mod document;
pub mod grade;
pub mod quiz;
pub mod response;

pub use document::{DocumentMetadata, ExtractedDocument, FileType};
pub use grade::{GradeResult, McqAnswer, McqSetGrade};
pub use quiz::McqItem;
pub use response::{AskResponse, SourceRef, UploadReceipt};
