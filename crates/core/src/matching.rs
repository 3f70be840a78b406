//! Case/format-tolerant field-key matching.
//!
//! AI-extracted field names are camelCase by construction, but intake
//! forms have been observed to collect the same keys in snake_case (and
//! with inconsistent casing). Substitution therefore resolves values in
//! three passes: exact key, case-insensitive key, then a normalized
//! comparison that erases the camelCase/snake_case distinction.

use std::collections::HashMap;

/// Normalize a field key for tolerant comparison: lowercase, with `_`,
/// `-`, and spaces removed. `fullName`, `full_name`, and `Full Name`
/// all normalize to `fullname`.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether two keys refer to the same field under tolerant matching.
pub fn keys_equivalent(a: &str, b: &str) -> bool {
    a == b || normalize_key(a) == normalize_key(b)
}

/// Look up `name` in a client data map: exact match first, then
/// case-insensitive, then normalized. Returns the matched value.
pub fn lookup_value<'a>(data: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    if let Some(v) = data.get(name) {
        return Some(v.as_str());
    }
    let lowered = name.to_lowercase();
    if let Some((_, v)) = data.iter().find(|(k, _)| k.to_lowercase() == lowered) {
        return Some(v.as_str());
    }
    let normalized = normalize_key(name);
    data.iter()
        .find(|(k, _)| normalize_key(k) == normalized)
        .map(|(_, v)| v.as_str())
}
