use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::Serialize;
use tempfile::Builder;

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const PREVIEW_EXCERPT_CHARS: usize = 600;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("only PDF documents are accepted (received {0})")]
    UnsupportedFormat(String),
    #[error("the uploaded document is empty")]
    EmptyDocument,
    #[error("no text could be extracted from the document")]
    NoText,
    #[error("document could not be read: {0}")]
    Backend(String),
}

/// Converts uploaded documents into plain text.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
    fn extract_file(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// `pdf-extract` backed extractor.
///
/// `pdf-extract` panics on some malformed documents (missing font resources,
/// pages without a media box). Those panics are caught here and reported as
/// [`ExtractionError::Backend`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl DocumentExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        guarded(|| pdf_extract::extract_text_from_mem(bytes))
    }

    fn extract_file(&self, path: &Path) -> Result<String, ExtractionError> {
        guarded(|| pdf_extract::extract_text(path))
    }
}

fn guarded<F>(extract: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, pdf_extract::OutputError>,
{
    match panic::catch_unwind(AssertUnwindSafe(extract)) {
        Ok(result) => result.map_err(|err| ExtractionError::Backend(err.to_string())),
        Err(payload) => Err(ExtractionError::Backend(format!(
            "malformed document: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("extractor aborted")
}

/// Rejects anything that does not carry a PDF header.
pub fn ensure_pdf(file_name: &str, bytes: &[u8]) -> Result<(), ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }
    if bytes.starts_with(PDF_SIGNATURE) {
        return Ok(());
    }

    let described = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{} file", ext.to_ascii_lowercase()))
        .unwrap_or_else(|| "a file without a PDF header".to_string());
    Err(ExtractionError::UnsupportedFormat(described))
}

/// Validates and extracts in one step. Whitespace-only output counts as a
/// failure so a scanned image never reaches the scorer as "".
pub fn extract_resume_text(
    extractor: &dyn DocumentExtractor,
    file_name: &str,
    bytes: &[u8],
) -> Result<String, ExtractionError> {
    ensure_pdf(file_name, bytes)?;
    let text = extractor.extract(bytes)?;
    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text)
}

/// Short rendering of an uploaded document for display next to the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPreview {
    pub file_name: String,
    pub size_bytes: usize,
    pub excerpt: String,
    pub truncated: bool,
}

/// Writes the upload to a temporary `.pdf` file, reads it back through the
/// extractor and returns an excerpt. The temporary file is removed when this
/// function returns, on success and on every error path.
pub fn preview_document(
    extractor: &dyn DocumentExtractor,
    file_name: &str,
    bytes: &[u8],
) -> Result<DocumentPreview, ExtractionError> {
    ensure_pdf(file_name, bytes)?;

    let mut scratch = Builder::new()
        .prefix("resume-preview-")
        .suffix(".pdf")
        .tempfile()
        .map_err(|err| ExtractionError::Backend(err.to_string()))?;
    scratch
        .write_all(bytes)
        .and_then(|_| scratch.flush())
        .map_err(|err| ExtractionError::Backend(err.to_string()))?;

    let text = extractor.extract_file(scratch.path())?;
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated = normalized.chars().count() > PREVIEW_EXCERPT_CHARS;
    let excerpt = normalized.chars().take(PREVIEW_EXCERPT_CHARS).collect();

    Ok(DocumentPreview {
        file_name: file_name.to_string(),
        size_bytes: bytes.len(),
        excerpt,
        truncated,
    })
}
