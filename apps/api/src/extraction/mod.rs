//! Resume text extraction.
//!
//! Thin wrapper over `pdf-extract`. Decoding is CPU-bound, so it runs on the
//! blocking pool. Empty output is an error: a resume with no extractable text
//! (scanned image, encrypted file) must never reach the model as an empty prompt.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("uploaded file is not a PDF")]
    NotPdf,

    #[error("failed to decode PDF: {0}")]
    Decode(String),

    #[error("no extractable text found (the PDF may be scanned or encrypted)")]
    Empty,

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Converts an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError>;
}

/// Default extractor backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        if !is_pdf(&document) {
            return Err(ExtractionError::NotPdf);
        }

        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&document)
                .map_err(|e| ExtractionError::Decode(e.to_string()))
        })
        .await??;

        let text = ensure_text(text)?;
        debug!("Extracted {} characters from PDF", text.len());
        Ok(text)
    }
}

/// True when the buffer starts with the PDF magic bytes.
pub fn is_pdf(head: &[u8]) -> bool {
    head.starts_with(PDF_MAGIC)
}

/// Rejects whitespace-only output; otherwise returns the text unchanged.
pub fn ensure_text(text: String) -> Result<String, ExtractionError> {
    if text.trim().is_empty() {
        Err(ExtractionError::Empty)
    } else {
        Ok(text)
    }
}
