//! Template lifecycle constants and transition rules.
//!
//! A template moves monotonically through `uploaded -> parsing ->
//! {parsed, error}`. The only way back out of a terminal status is an
//! explicit re-parse request, which restarts at `parsing`.

use crate::error::CoreError;

/// Upload registered, bytes not yet parsed.
pub const STATUS_UPLOADED: &str = "uploaded";

/// Extraction pipeline has claimed the template.
pub const STATUS_PARSING: &str = "parsing";

/// Fields extracted and persisted.
pub const STATUS_PARSED: &str = "parsed";

/// Extraction failed; `error_message` holds the cause.
pub const STATUS_ERROR: &str = "error";

/// Default lifetime of an upload URL, in minutes.
pub const UPLOAD_TOKEN_TTL_MINUTES: i64 = 15;

/// Default lifetime of an editor lock, in minutes.
pub const EDITOR_LOCK_TTL_MINUTES: i64 = 10;

/// Whether the pipeline may move a template from `from` to `to`.
///
/// - `uploaded -> parsing`, `parsing -> parsed`, `parsing -> error` are
///   the normal forward path.
/// - `parsing -> parsing` is allowed so redelivered upload events are
///   harmless (the claim is re-entrant).
/// - `parsed -> parsing` and `error -> parsing` are allowed only for an
///   explicit re-parse, signalled by `explicit_reparse`.
pub fn can_transition(from: &str, to: &str, explicit_reparse: bool) -> bool {
    match (from, to) {
        (STATUS_UPLOADED, STATUS_PARSING) => true,
        (STATUS_PARSING, STATUS_PARSING) => true,
        (STATUS_PARSING, STATUS_PARSED) => true,
        (STATUS_PARSING, STATUS_ERROR) => true,
        (STATUS_PARSED, STATUS_PARSING) | (STATUS_ERROR, STATUS_PARSING) => explicit_reparse,
        _ => false,
    }
}

/// The supported template source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
}

impl FileType {
    /// Parse a declared file type. Case-insensitive; anything outside
    /// the two supported values is [`CoreError::UnsupportedFormat`].
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.to_ascii_lowercase().as_str() {
            "pdf" => Ok(FileType::Pdf),
            "docx" => Ok(FileType::Docx),
            other => Err(CoreError::UnsupportedFormat(format!(
                "'{other}' is not supported. Must be one of: pdf, docx"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
        }
    }

    /// MIME type for download responses.
    pub fn content_type(self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Derive the storage object path for a template's source bytes.
///
/// The upload-completed trigger resolves the owning template back out
/// of this shape, so both directions live here.
pub fn storage_path(template_public_id: &str, file_name: &str) -> String {
    format!("templates/{template_public_id}/{file_name}")
}

/// Resolve the template public id from a storage object path of the
/// form `templates/{public_id}/{file_name}`. Returns `None` for paths
/// outside the templates prefix.
pub fn template_id_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("templates/")?;
    let (id, file) = rest.split_once('/')?;
    if id.is_empty() || file.is_empty() {
        return None;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(can_transition(STATUS_UPLOADED, STATUS_PARSING, false));
        assert!(can_transition(STATUS_PARSING, STATUS_PARSED, false));
        assert!(can_transition(STATUS_PARSING, STATUS_ERROR, false));
    }

    #[test]
    fn test_parsing_claim_is_reentrant() {
        assert!(can_transition(STATUS_PARSING, STATUS_PARSING, false));
    }

    #[test]
    fn test_uploaded_cannot_skip_to_parsed() {
        assert!(!can_transition(STATUS_UPLOADED, STATUS_PARSED, false));
        assert!(!can_transition(STATUS_UPLOADED, STATUS_ERROR, false));
    }

    #[test]
    fn test_terminal_statuses_need_explicit_reparse() {
        assert!(!can_transition(STATUS_PARSED, STATUS_PARSING, false));
        assert!(!can_transition(STATUS_ERROR, STATUS_PARSING, false));
        assert!(can_transition(STATUS_PARSED, STATUS_PARSING, true));
        assert!(can_transition(STATUS_ERROR, STATUS_PARSING, true));
    }

    #[test]
    fn test_no_backwards_transitions() {
        assert!(!can_transition(STATUS_PARSED, STATUS_UPLOADED, true));
        assert!(!can_transition(STATUS_ERROR, STATUS_UPLOADED, true));
        assert!(!can_transition(STATUS_PARSING, STATUS_UPLOADED, false));
    }

    #[test]
    fn test_file_type_parse() {
        assert_eq!(FileType::parse("pdf").unwrap(), FileType::Pdf);
        assert_eq!(FileType::parse("DOCX").unwrap(), FileType::Docx);
        assert_matches!(FileType::parse("doc"), Err(CoreError::UnsupportedFormat(_)));
        assert_matches!(FileType::parse(""), Err(CoreError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_storage_path_roundtrip() {
        let path = storage_path("abc-123", "lease.docx");
        assert_eq!(path, "templates/abc-123/lease.docx");
        assert_eq!(template_id_from_path(&path), Some("abc-123"));
    }

    #[test]
    fn test_template_id_from_foreign_path() {
        assert_eq!(template_id_from_path("artifacts/abc/out.docx"), None);
        assert_eq!(template_id_from_path("templates/"), None);
        assert_eq!(template_id_from_path("templates/abc"), None);
    }
}
