//! Alias-based field resolution over raw JSON payloads.
//!
//! Absence is never an error: resolution walks the alias list in priority
//! order and falls back when every alias is missing or empty.

use serde_json::Value;

/// Returns the first aliased value that is present and not an empty string.
pub fn resolve_value<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    for key in aliases {
        match record.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(v) => return Some(v),
        }
    }
    None
}

/// Resolves a string field, coercing scalar values to their display form.
pub fn resolve_str(record: &Value, aliases: &[&str], fallback: &str) -> String {
    match resolve_value(record, aliases) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => fallback.to_string(),
    }
}

/// Resolves an unsigned integer field; JSON strings holding digits coerce.
pub fn resolve_u32(record: &Value, aliases: &[&str], fallback: u32) -> u32 {
    match resolve_value(record, aliases) {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(fallback),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    }
}
