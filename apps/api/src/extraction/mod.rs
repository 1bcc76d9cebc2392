//! File Text Extractor: turns an uploaded resume (PDF, DOCX, TXT) into plain text.
//!
//! Parsing is delegated to `pdf-extract` and `docx-rs` and runs on the blocking pool.
//! Third-party parsers may panic on hostile input; a panic surfaces as
//! `ExtractError::ExtractionFailure` instead of taking the worker down.

use std::path::Path;

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const TXT_MIME: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    ExtractionFailure(String),
}

/// Declared format of an uploaded resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Resolves the format from the upload's filename, falling back to its content type
    /// when the filename carries no extension.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Result<Self, ExtractError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("docx") => Ok(DocumentFormat::Docx),
            Some("txt") => Ok(DocumentFormat::Txt),
            Some(other) => Err(ExtractError::UnsupportedFormat(format!(".{other}"))),
            None => Self::from_content_type(content_type),
        }
    }

    fn from_content_type(content_type: Option<&str>) -> Result<Self, ExtractError> {
        // Drop parameters such as "; charset=utf-8"
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some(PDF_MIME) => Ok(DocumentFormat::Pdf),
            Some(DOCX_MIME) => Ok(DocumentFormat::Docx),
            Some(TXT_MIME) => Ok(DocumentFormat::Txt),
            Some(other) => Err(ExtractError::UnsupportedFormat(other.to_string())),
            None => Err(ExtractError::UnsupportedFormat(
                "file has no extension or content type".to_string(),
            )),
        }
    }
}

/// An uploaded resume. Lives only for the duration of the request that received it.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

impl ResumeDocument {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<Self, ExtractError> {
        let filename = filename.into();
        let format = DocumentFormat::detect(&filename, content_type)?;
        Ok(Self {
            filename,
            format,
            bytes,
        })
    }
}

/// Extracts plain text from the document. Never returns blank text.
pub async fn extract_text(document: &ResumeDocument) -> Result<String, ExtractError> {
    if document.bytes.is_empty() {
        return Err(ExtractError::ExtractionFailure("document is empty".to_string()));
    }

    let format = document.format;
    let bytes = document.bytes.clone();
    let text = tokio::task::spawn_blocking(move || extract_sync(format, &bytes))
        .await
        .map_err(|e| {
            warn!("{format:?} extraction task aborted: {e}");
            ExtractError::ExtractionFailure(format!("the {format:?} parser crashed on this file"))
        })??;

    if text.trim().is_empty() {
        return Err(ExtractError::ExtractionFailure("no extractable text".to_string()));
    }

    debug!(
        "Extracted {} chars from {} ({:?})",
        text.chars().count(),
        document.filename,
        format
    );
    Ok(text)
}

fn extract_sync(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
    match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
        DocumentFormat::Txt => extract_txt(bytes),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::ExtractionFailure(format!("unreadable PDF: {e}")))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ExtractError::ExtractionFailure(format!("unreadable DOCX: {e}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        })
        .map(|paragraph| {
            let mut text = String::new();
            for child in &paragraph.children {
                if let ParagraphChild::Run(run) = child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn extract_txt(bytes: &[u8]) -> Result<String, ExtractError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ExtractError::ExtractionFailure(format!("text file is not valid UTF-8: {e}")))
}
