//! PDF text extraction via `lopdf`.

use std::io::Cursor;

use lopdf::Document;

use crate::ExtractError;

/// Extract text from every page of a PDF, joined with newlines.
///
/// Pages that fail individually are skipped with a warning rather than
/// failing the whole document; a PDF where *no* page yields text is an
/// extraction error (commonly a scanned or encrypted file).
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_from(Cursor::new(bytes))
        .map_err(|e| ExtractError::Extraction(format!("Failed to load PDF: {e}")))?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => {
                tracing::warn!(page = page_num, error = %e, "Failed to extract text from PDF page");
            }
        }
    }

    Ok(text.trim().to_string())
}
