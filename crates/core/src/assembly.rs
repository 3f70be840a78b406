//! Placeholder substitution engine.
//!
//! Pure text transform at the heart of document generation: given a
//! template's text, its extracted fields, the client data map, and any
//! approved overrides, produce the output text plus the list of
//! declared placeholders that had no client value. Missing values are
//! never fatal here; the caller decides how to surface them.

use std::collections::HashMap;

use regex::Regex;

use crate::error::CoreError;
use crate::field::{placeholder_text, FieldDef};
use crate::matching::{keys_equivalent, lookup_value};
use crate::overrides::{ClausePosition, OverrideAction};

/// Result of one assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    /// Output document text with substitutions applied.
    pub text: String,
    /// Names of effective fields that had no client value, in field
    /// order. Their placeholder text stands in for the value.
    pub unmatched_fields: Vec<String>,
}

/// Apply approved overrides to a template's field set, yielding the
/// effective fields for one generation run.
///
/// - `remove_field` drops the named field (tolerant name match).
/// - `modify_field` updates label/kind presentation and resynthesizes
///   the placeholder text; the field's name never changes.
/// - `add_field` appends, unless a field with an equivalent name is
///   already present (the template's own definition wins).
pub fn effective_fields(fields: &[FieldDef], overrides: &[OverrideAction]) -> Vec<FieldDef> {
    let mut effective: Vec<FieldDef> = fields.to_vec();

    for action in overrides {
        match action {
            OverrideAction::RemoveField { name } => {
                effective.retain(|f| !keys_equivalent(&f.name, name));
            }
            OverrideAction::ModifyField { name, label, kind } => {
                if let Some(f) = effective.iter_mut().find(|f| keys_equivalent(&f.name, name)) {
                    if let Some(label) = label {
                        f.label = label.clone();
                    }
                    if let Some(kind) = kind {
                        f.kind = *kind;
                    }
                    f.placeholder = placeholder_text(f.kind, &f.label);
                }
            }
            OverrideAction::AddField { field } => {
                if !effective.iter().any(|f| keys_equivalent(&f.name, &field.name)) {
                    effective.push(field.clone());
                }
            }
            OverrideAction::CustomClause { .. } => {}
        }
    }

    effective
}

/// Substitute client data into the template text.
///
/// Every `{{name}}` token whose name tolerantly matches an effective
/// field is replaced: with the client value when one resolves, with the
/// field's synthesized placeholder text otherwise (never blank, so the
/// output stays legible). Tokens naming no effective field — including
/// fields excluded by `remove_field` — are left untouched. Approved
/// custom clauses are appended at their requested position afterwards.
///
/// Fails only when the template declares no placeholders and no
/// override contributes one (there is nothing to generate).
pub fn assemble(
    template_text: &str,
    fields: &[FieldDef],
    client_data: &HashMap<String, String>,
    overrides: &[OverrideAction],
) -> Result<AssemblyOutput, CoreError> {
    let effective = effective_fields(fields, overrides);
    let clauses: Vec<(&str, ClausePosition)> = overrides
        .iter()
        .filter_map(|a| match a {
            OverrideAction::CustomClause { text, position } => Some((text.as_str(), *position)),
            _ => None,
        })
        .collect();

    if effective.is_empty() && clauses.is_empty() {
        return Err(CoreError::Validation(
            "Template has no placeholders and no approved overrides".to_string(),
        ));
    }

    // Resolve each effective field to its substitution value up front.
    let mut unmatched_fields = Vec::new();
    let mut values: Vec<(&FieldDef, String)> = Vec::with_capacity(effective.len());
    for field in &effective {
        match lookup_value(client_data, &field.name) {
            Some(value) => values.push((field, value.to_string())),
            None => {
                unmatched_fields.push(field.name.clone());
                values.push((field, field.placeholder.clone()));
            }
        }
    }

    // {{ name }} tokens; names may themselves vary in casing/format.
    let token_re = Regex::new(r"\{\{\s*([A-Za-z0-9_\-]+)\s*\}\}")
        .map_err(|e| CoreError::Internal(format!("Token regex failed to compile: {e}")))?;

    let mut text = token_re
        .replace_all(template_text, |caps: &regex::Captures<'_>| {
            let token_name = &caps[1];
            match values.iter().find(|(f, _)| keys_equivalent(&f.name, token_name)) {
                Some((_, value)) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned();

    for (clause, position) in clauses {
        match position {
            ClausePosition::Start => text = format!("{clause}\n\n{text}"),
            ClausePosition::End => {
                if !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push('\n');
                text.push_str(clause);
            }
        }
    }

    Ok(AssemblyOutput {
        text,
        unmatched_fields,
    })
}
