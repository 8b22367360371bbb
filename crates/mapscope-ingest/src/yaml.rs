//! Small accessors over loosely-shaped `serde_yaml::Value` trees.

use serde_yaml::Value;

use crate::error::Result;

pub fn parse_document(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(text)?)
}

/// First present key among `keys` (aliases, e.g. `subject` / `s`).
pub fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| value.get(*k))
        .filter(|v| !v.is_null())
}

/// Scalars rendered as strings; strings are trimmed.
pub fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        _ => None,
    }
}

pub fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    field(value, keys).and_then(scalar)
}

/// A sequence's items, a single value as one item, nothing for null.
pub fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => items.iter().collect(),
        other => vec![other],
    }
}
