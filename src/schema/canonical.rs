//! Canonical attribute representation used before diffing entities.
//!
//! Connectors are often inconsistent about multiplicity between commands:
//! `std:account:list` may return `"groups": ["admins"]` while
//! `std:account:read` returns `"groups": "admins"`. Canonicalizing both
//! sides removes that noise.

use serde_json::{Map, Value};

/// Canonical form of a single attribute value.
///
/// - a single-element array becomes its (canonical) element
/// - a longer array is canonicalized element-wise and sorted by rendered JSON,
///   so ordering differences do not produce diffs
/// - every other value is returned unchanged
pub fn canonicalize_value(value: &Value) -> Value {
    match value {
        Value::Array(items) if items.len() == 1 => canonicalize_value(&items[0]),
        Value::Array(items) => {
            let mut canonical: Vec<Value> = items.iter().map(canonicalize_value).collect();
            canonical.sort_by_cached_key(|item| item.to_string());
            Value::Array(canonical)
        }
        other => other.clone(),
    }
}

/// Canonicalize every value of an attribute map in place.
pub fn canonicalize_attributes(attributes: &mut Map<String, Value>) {
    for value in attributes.values_mut() {
        let canonical = canonicalize_value(value);
        *value = canonical;
    }
}

/// Values an attribute holds, flattening arrays and dropping nulls.
pub fn attribute_values(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|item| !item.is_null()).collect(),
        Some(scalar) => vec![scalar],
    }
}
