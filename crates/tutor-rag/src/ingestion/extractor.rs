//! Multi-format document extraction
//!
//! Dispatches on the file extension and converts uploads into plain text
//! plus a metadata block. Handler failures never escape raw: they surface
//! as [`Error::DocumentProcessing`] carrying the original cause. Unknown
//! extensions are an [`Error::UnsupportedFormat`] naming the extension.

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{DocumentMetadata, ExtractedDocument, FileType};

/// Multi-format document extractor
pub struct DocumentExtractor;

impl DocumentExtractor {
    /// Extract text and metadata from a file on disk
    pub fn extract(path: &Path) -> Result<ExtractedDocument> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let file_type = FileType::from_extension(&extension);
        if let FileType::Unsupported(ext) = &file_type {
            return Err(Error::UnsupportedFormat(format!(".{}", ext)));
        }

        let data = std::fs::read(path)
            .map_err(|e| Error::document_processing(&file_name, e.to_string()))?;

        let content = match &file_type {
            FileType::Pdf => Self::extract_pdf(&file_name, &data)?,
            FileType::Docx => Self::extract_docx(&file_name, &data)?,
            FileType::Txt => Self::extract_txt(&file_name, &data)?,
            FileType::Image => Self::extract_image(&file_name, path)?,
            FileType::Unsupported(ext) => {
                return Err(Error::UnsupportedFormat(format!(".{}", ext)));
            }
        };

        let file_size = data.len() as u64;

        Ok(ExtractedDocument {
            id: Uuid::new_v4(),
            content_hash: hash_content(&content),
            content,
            file_name: file_name.clone(),
            file_extension: extension.clone(),
            file_path: path.to_path_buf(),
            file_type,
            file_size,
            ingested_at: Utc::now(),
            metadata: DocumentMetadata {
                file_name,
                file_extension: extension,
                file_size,
                file_path: path.to_path_buf(),
            },
        })
    }

    /// Extract text from a PDF.
    ///
    /// Two-step pipeline: the high-fidelity extractor first, then a plain
    /// page-text pass. Only when both fail does the caller see an error,
    /// and it names both causes.
    fn extract_pdf(file_name: &str, data: &[u8]) -> Result<String> {
        let primary = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => return Ok(text),
            Err(e) => e.to_string(),
        };

        tracing::warn!(
            "Primary PDF extractor failed for '{}' ({}), trying fallback",
            file_name,
            primary
        );

        match Self::extract_pdf_fallback(data) {
            Ok(text) => Ok(text),
            Err(secondary) => Err(Error::document_processing(
                file_name,
                format!("pdf-extract: {}; lopdf: {}", primary, secondary),
            )),
        }
    }

    fn extract_pdf_fallback(data: &[u8]) -> std::result::Result<String, String> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| e.to_string())?;
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        doc.extract_text(&pages).map_err(|e| e.to_string())
    }

    /// Extract text from a DOCX document
    fn extract_docx(file_name: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::document_processing(file_name, e.to_string()))?;

        let mut content = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                content.push_str(&t.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(content)
    }

    /// Read a plain text file as UTF-8
    fn extract_txt(file_name: &str, data: &[u8]) -> Result<String> {
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::document_processing(file_name, format!("not valid UTF-8: {}", e)))
    }

    /// Extract text from an image via tesseract OCR.
    ///
    /// OCR itself is an external capability; this only shells out and
    /// reports failures through the extraction error contract.
    fn extract_image(file_name: &str, path: &Path) -> Result<String> {
        if !Self::has_tesseract() {
            return Err(Error::document_processing(
                file_name,
                "image OCR requires tesseract (apt install tesseract-ocr)",
            ));
        }

        let output = Command::new("tesseract")
            .arg(path)
            .arg("stdout")
            .output()
            .map_err(|e| Error::document_processing(file_name, format!("tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::document_processing(
                file_name,
                format!("tesseract: {}", stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Check if tesseract OCR is available
    pub fn has_tesseract() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// SHA-256 of extracted content, hex encoded
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn txt_extraction_keeps_content_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "Photosynthesis converts light into energy.").unwrap();

        let doc = DocumentExtractor::extract(&path).unwrap();
        assert_eq!(doc.content, "Photosynthesis converts light into energy.");
        assert_eq!(doc.file_type, FileType::Txt);
        assert_eq!(doc.file_extension, "txt");
        assert_eq!(doc.metadata.file_name, "notes.txt");
        assert_eq!(doc.metadata.file_size, doc.content.len() as u64);
        assert_eq!(doc.metadata.file_path, path);
    }

    #[test]
    fn unsupported_extension_names_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.xlsx");
        std::fs::write(&path, b"irrelevant").unwrap();

        let err = DocumentExtractor::extract(&path).unwrap_err();
        match err {
            Error::UnsupportedFormat(ext) => assert_eq!(ext, ".xlsx"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_txt_is_a_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let err = DocumentExtractor::extract(&path).unwrap_err();
        assert!(matches!(err, Error::DocumentProcessing { .. }));
    }

    #[test]
    fn broken_pdf_reports_both_extractor_causes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let err = DocumentExtractor::extract(&path).unwrap_err();
        match err {
            Error::DocumentProcessing { filename, message } => {
                assert_eq!(filename, "broken.pdf");
                assert!(message.contains("pdf-extract:"));
                assert!(message.contains("lopdf:"));
            }
            other => panic!("expected DocumentProcessing, got {other:?}"),
        }
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }
}
