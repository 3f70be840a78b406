//! The fixed field-extraction instruction prompt.

/// Sampling temperature for extraction calls. Low, favoring
/// deterministic output over creativity.
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Output token budget for extraction calls.
pub const EXTRACTION_MAX_TOKENS: u32 = 4096;

/// Build the instruction prompt embedding the full document text.
///
/// The prompt demands a single JSON object `{"fields": [...]}` and
/// enumerates the eight allowed kinds; the response parser enforces
/// that shape strictly. Document length is not special-cased — even an
/// empty document goes to the model as-is.
pub fn build_extraction_prompt(document_text: &str) -> String {
    format!(
        r#"You are a legal-document analyst. Identify every piece of client-specific information in the document below that an intake form should collect, and describe each one as a form field.

Respond with ONLY a JSON object of this exact shape, no prose:

{{
  "fields": [
    {{
      "name": "camelCaseIdentifier",
      "type": "text",
      "label": "Human-readable label",
      "description": "optional help text",
      "required": true,
      "options": ["only", "for", "choice", "types"]
    }}
  ]
}}

Rules:
- "name" must be a camelCase identifier with no spaces, unique in the list.
- "type" must be exactly one of: text, email, number, date, select, textarea, checkbox, radio.
- "options" must be present only when type is select, checkbox, or radio.
- "required" must be a boolean.
- Do not invent fields the document does not call for.

Document:
---
{document_text}
---"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_document_text() {
        let prompt = build_extraction_prompt("LEASE AGREEMENT between {{fullName}}...");
        assert!(prompt.contains("LEASE AGREEMENT between {{fullName}}..."));
    }

    #[test]
    fn test_prompt_lists_all_eight_kinds() {
        let prompt = build_extraction_prompt("x");
        for kind in ["text", "email", "number", "date", "select", "textarea", "checkbox", "radio"] {
            assert!(prompt.contains(kind), "prompt missing kind {kind}");
        }
    }

    #[test]
    fn test_empty_document_still_builds() {
        let prompt = build_extraction_prompt("");
        assert!(prompt.contains("\"fields\""));
    }
}
