//! The typed form-field model extracted from templates.
//!
//! A [`FieldDef`] is one named, typed slot identified in a template
//! document, to be filled with client data at generation time. Field
//! definitions enter the system in bulk through the AI extraction
//! boundary and are validated strictly there; nothing downstream ever
//! sees an untyped field map.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field kinds
// ---------------------------------------------------------------------------

/// The eight supported field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    Select,
    Textarea,
    Checkbox,
    Radio,
}

impl FieldKind {
    /// Kinds that carry an `options` list.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Checkbox | FieldKind::Radio)
    }

    /// Canonical lowercase name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Textarea => "textarea",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
        }
    }
}

// ---------------------------------------------------------------------------
// Field definition
// ---------------------------------------------------------------------------

/// Where a placeholder was found in the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldLocation {
    /// 1-based page number, where the source format has pages.
    pub page: Option<u32>,
    /// Section heading or named anchor, if any.
    pub section: Option<String>,
    /// Literal text surrounding the placeholder.
    pub anchor: Option<String>,
}

/// One extracted placeholder / form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Generated internal identifier (UUID v4 string).
    pub id: String,
    /// Stable substitution key, camelCase, unique within a template.
    pub name: String,
    /// Human-readable label shown on the intake form.
    pub label: String,
    /// Semantic kind, one of the eight supported values.
    pub kind: FieldKind,
    /// Whether the intake form requires a value.
    pub required: bool,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Choice options; present only for select/checkbox/radio kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Source locations where the placeholder appears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<FieldLocation>>,
    /// Extraction confidence in `[0, 1]`, when the extractor reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Synthesized example text, used in place of missing client values.
    pub placeholder: String,
}

/// Synthesize the per-kind example text used as a substitution fallback.
///
/// Never returns an empty string, so unmatched placeholders stay legible
/// in generated documents.
pub fn placeholder_text(kind: FieldKind, label: &str) -> String {
    match kind {
        FieldKind::Text | FieldKind::Textarea => format!("Enter {label}"),
        FieldKind::Email => "Enter email address".to_string(),
        FieldKind::Number => "Enter a number".to_string(),
        FieldKind::Date => "Select date".to_string(),
        FieldKind::Select => format!("Select {label}"),
        FieldKind::Checkbox | FieldKind::Radio => label.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a batch of freshly extracted fields.
///
/// - Field names must be non-empty and unique within the batch.
/// - `options` may only be present on choice kinds, and choice kinds
///   must carry at least one option.
/// - Labels must be non-empty.
pub fn validate_fields(fields: &[FieldDef]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Field name must not be empty".to_string(),
            ));
        }
        if field.label.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Field '{}' has an empty label",
                field.name
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate field name '{}'",
                field.name
            )));
        }
        match (&field.options, field.kind.is_choice()) {
            (Some(opts), true) if opts.is_empty() => {
                return Err(CoreError::Validation(format!(
                    "Choice field '{}' has an empty options list",
                    field.name
                )));
            }
            (None, true) => {
                return Err(CoreError::Validation(format!(
                    "Choice field '{}' is missing its options list",
                    field.name
                )));
            }
            (Some(_), false) => {
                return Err(CoreError::Validation(format!(
                    "Field '{}' of kind '{}' must not carry options",
                    field.name,
                    field.kind.as_str()
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, kind: FieldKind, options: Option<Vec<String>>) -> FieldDef {
        FieldDef {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            label: name.to_string(),
            kind,
            required: false,
            description: None,
            options,
            locations: None,
            confidence: None,
            placeholder: placeholder_text(kind, name),
        }
    }

    #[test]
    fn test_placeholder_text_per_kind() {
        assert_eq!(placeholder_text(FieldKind::Text, "Full Name"), "Enter Full Name");
        assert_eq!(placeholder_text(FieldKind::Textarea, "Notes"), "Enter Notes");
        assert_eq!(placeholder_text(FieldKind::Email, "Email"), "Enter email address");
        assert_eq!(placeholder_text(FieldKind::Number, "Age"), "Enter a number");
        assert_eq!(placeholder_text(FieldKind::Date, "Closing"), "Select date");
        assert_eq!(placeholder_text(FieldKind::Select, "State"), "Select State");
        assert_eq!(placeholder_text(FieldKind::Checkbox, "Agree"), "Agree");
        assert_eq!(placeholder_text(FieldKind::Radio, "Gender"), "Gender");
    }

    #[test]
    fn test_placeholder_text_never_empty() {
        for kind in [
            FieldKind::Text,
            FieldKind::Email,
            FieldKind::Number,
            FieldKind::Date,
            FieldKind::Select,
            FieldKind::Textarea,
            FieldKind::Checkbox,
            FieldKind::Radio,
        ] {
            assert!(!placeholder_text(kind, "x").is_empty());
        }
    }

    #[test]
    fn test_valid_batch_passes() {
        let fields = vec![
            field("fullName", FieldKind::Text, None),
            field("state", FieldKind::Select, Some(vec!["CA".into(), "NY".into()])),
        ];
        assert!(validate_fields(&fields).is_ok());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let fields = vec![
            field("fullName", FieldKind::Text, None),
            field("fullName", FieldKind::Email, None),
        ];
        let err = validate_fields(&fields).unwrap_err();
        assert!(err.to_string().contains("Duplicate field name"));
    }

    #[test]
    fn test_options_on_text_field_rejected() {
        let fields = vec![field("city", FieldKind::Text, Some(vec!["a".into()]))];
        assert!(validate_fields(&fields).is_err());
    }

    #[test]
    fn test_choice_field_without_options_rejected() {
        let fields = vec![field("state", FieldKind::Radio, None)];
        assert!(validate_fields(&fields).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let fields = vec![field("  ", FieldKind::Text, None)];
        assert!(validate_fields(&fields).is_err());
    }

    #[test]
    fn test_kind_serde_roundtrip() {
        let json = serde_json::to_string(&FieldKind::Textarea).unwrap();
        assert_eq!(json, "\"textarea\"");
        let kind: FieldKind = serde_json::from_str("\"radio\"").unwrap();
        assert_eq!(kind, FieldKind::Radio);
        assert!(serde_json::from_str::<FieldKind>("\"dropdown\"").is_err());
    }
}
