//! Document text extraction.
//!
//! Turns template source bytes (PDF or DOCX) into plain text for the AI
//! field extractor. Pure transform: no I/O beyond the byte slice, no
//! side effects. Format support is gated at the [`FileType`] boundary;
//! an unsupported declared type never reaches a parser.

mod docx;
mod pdf;

pub use formgen_core::template::FileType;

/// Errors from the extraction stage.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The declared file type is outside pdf/docx.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The underlying parser failed (corrupt, encrypted, or empty file).
    #[error("Extraction failed: {0}")]
    Extraction(String),
}

impl From<ExtractError> for formgen_core::CoreError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(msg) => formgen_core::CoreError::UnsupportedFormat(msg),
            ExtractError::Extraction(msg) => formgen_core::CoreError::Extraction(msg),
        }
    }
}

/// Extract plain text from document bytes of a known [`FileType`].
///
/// Returns [`ExtractError::Extraction`] when the parser fails or the
/// document yields no text at all.
pub fn extract_text(bytes: &[u8], file_type: FileType) -> Result<String, ExtractError> {
    let text = match file_type {
        FileType::Pdf => pdf::extract(bytes)?,
        FileType::Docx => docx::extract(bytes)?,
    };
    if text.trim().is_empty() {
        return Err(ExtractError::Extraction(
            "Document contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// Extract plain text from bytes with a declared type string.
///
/// Convenience wrapper for callers holding the stored `file_type`
/// column; gates on [`FileType::parse`] before touching any parser.
pub fn extract_text_typed(bytes: &[u8], declared_type: &str) -> Result<String, ExtractError> {
    let file_type = FileType::parse(declared_type)
        .map_err(|e| ExtractError::UnsupportedFormat(e.to_string()))?;
    extract_text(bytes, file_type)
}
