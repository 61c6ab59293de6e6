//! Document types produced by the extraction adapter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Supported file types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx; .doc is parsed the same way)
    Docx,
    /// Plain text file (UTF-8)
    Txt,
    /// Image (text recovered via OCR)
    Image,
    /// Anything else, carrying the offending extension
    Unsupported(String),
}

impl FileType {
    /// Detect file type from a lower-cased extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" | "doc" => Self::Docx,
            "txt" => Self::Txt,
            "jpg" | "jpeg" | "png" => Self::Image,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Check if this file type has an extraction handler
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document",
            Self::Txt => "Text File",
            Self::Image => "Image",
            Self::Unsupported(_) => "Unsupported",
        }
    }
}

/// Metadata block attached to every extracted document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// File name
    pub file_name: String,
    /// Lower-cased extension without the dot
    pub file_extension: String,
    /// Size of the source file in bytes
    pub file_size: u64,
    /// Path the file was read from
    pub file_path: PathBuf,
}

/// A document with its extracted text.
///
/// Immutable once produced by the extractor; consumed once by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Unique document ID
    pub id: Uuid,
    /// Extracted plain text
    pub content: String,
    /// File name
    pub file_name: String,
    /// Lower-cased extension without the dot
    pub file_extension: String,
    /// Source path
    pub file_path: PathBuf,
    /// Detected file type
    pub file_type: FileType,
    /// Size of the source file in bytes
    pub file_size: u64,
    /// SHA-256 of the extracted content
    pub content_hash: String,
    /// Extraction timestamp
    pub ingested_at: DateTime<Utc>,
    /// Metadata block
    pub metadata: DocumentMetadata,
}
