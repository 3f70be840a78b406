//! Customer override kinds, review statuses, and payload parsing.
//!
//! Customers may request deviations from a template's extracted field
//! set or its output text. Every request starts `pending` and only an
//! explicit administrative decision moves it to `approved` or
//! `rejected`; generation consumes approved overrides only. That review
//! gate is the safety property this module exists to enforce.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::{FieldDef, FieldKind};

// ---------------------------------------------------------------------------
// Review statuses
// ---------------------------------------------------------------------------

/// Awaiting administrative review. The only status a customer can create.
pub const STATUS_PENDING: &str = "pending";

/// Approved; visible to the next generation run.
pub const STATUS_APPROVED: &str = "approved";

/// Rejected; permanently excluded from generation.
pub const STATUS_REJECTED: &str = "rejected";

// ---------------------------------------------------------------------------
// Override kinds and payloads
// ---------------------------------------------------------------------------

/// Where an approved custom clause lands in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClausePosition {
    Start,
    End,
}

/// A parsed, typed override action.
///
/// The JSON payload stored on a `customer_overrides` row is parsed into
/// this enum at the consumption boundary; malformed payloads are
/// rejected there rather than propagated as untyped maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum OverrideAction {
    /// Extend the effective field set with a new field.
    AddField { field: FieldDef },
    /// Exclude a placeholder from substitution entirely.
    RemoveField { name: String },
    /// Change label/kind presentation of an existing field. Identity
    /// (the `name`) never changes.
    ModifyField {
        name: String,
        label: Option<String>,
        kind: Option<FieldKind>,
    },
    /// Append free text at a position, independent of substitution.
    CustomClause {
        text: String,
        position: ClausePosition,
    },
}

impl OverrideAction {
    /// The stored kind discriminant for this action.
    pub fn kind_str(&self) -> &'static str {
        match self {
            OverrideAction::AddField { .. } => "add_field",
            OverrideAction::RemoveField { .. } => "remove_field",
            OverrideAction::ModifyField { .. } => "modify_field",
            OverrideAction::CustomClause { .. } => "custom_clause",
        }
    }
}

/// All valid override kind discriminants.
pub const VALID_KINDS: &[&str] = &["add_field", "remove_field", "modify_field", "custom_clause"];

/// Parse a stored `(kind, payload)` pair into a typed [`OverrideAction`].
///
/// Fails with [`CoreError::Validation`] for unknown kinds or payloads
/// that do not match the kind's expected shape.
pub fn parse_action(kind: &str, payload: &serde_json::Value) -> Result<OverrideAction, CoreError> {
    if !VALID_KINDS.contains(&kind) {
        return Err(CoreError::Validation(format!(
            "Invalid override kind '{kind}'. Must be one of: {}",
            VALID_KINDS.join(", ")
        )));
    }
    let tagged = serde_json::json!({ "kind": kind, "payload": payload });
    let action: OverrideAction = serde_json::from_value(tagged).map_err(|e| {
        CoreError::Validation(format!("Override payload does not match kind '{kind}': {e}"))
    })?;
    validate_action(&action)?;
    Ok(action)
}

/// Semantic checks beyond shape: non-empty names/clause text.
fn validate_action(action: &OverrideAction) -> Result<(), CoreError> {
    match action {
        OverrideAction::AddField { field } => crate::field::validate_fields(std::slice::from_ref(field)),
        OverrideAction::RemoveField { name } | OverrideAction::ModifyField { name, .. } => {
            if name.trim().is_empty() {
                Err(CoreError::Validation(
                    "Override field name must not be empty".to_string(),
                ))
            } else {
                Ok(())
            }
        }
        OverrideAction::CustomClause { text, .. } => {
            if text.trim().is_empty() {
                Err(CoreError::Validation(
                    "Custom clause text must not be empty".to_string(),
                ))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_parse_remove_field() {
        let action = parse_action("remove_field", &json!({ "name": "fullName" })).unwrap();
        assert_matches!(action, OverrideAction::RemoveField { name } if name == "fullName");
    }

    #[test]
    fn test_parse_add_field() {
        let payload = json!({
            "field": {
                "id": "f-1",
                "name": "coSignerName",
                "label": "Co-signer name",
                "kind": "text",
                "required": true,
                "placeholder": "Enter Co-signer name"
            }
        });
        let action = parse_action("add_field", &payload).unwrap();
        assert_eq!(action.kind_str(), "add_field");
    }

    #[test]
    fn test_parse_custom_clause() {
        let payload = json!({ "text": "Time is of the essence.", "position": "end" });
        let action = parse_action("custom_clause", &payload).unwrap();
        assert_matches!(
            action,
            OverrideAction::CustomClause { position: ClausePosition::End, .. }
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = parse_action("drop_table", &json!({})).unwrap_err();
        assert!(err.to_string().contains("Invalid override kind"));
    }

    #[test]
    fn test_mismatched_payload_rejected() {
        // remove_field payload under modify_field kind is fine (name is
        // shared), but a clause payload is not.
        assert!(parse_action("remove_field", &json!({ "text": "x" })).is_err());
    }

    #[test]
    fn test_empty_clause_rejected() {
        let payload = json!({ "text": "  ", "position": "start" });
        assert!(parse_action("custom_clause", &payload).is_err());
    }
}
