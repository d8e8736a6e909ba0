//! Pruning of empty entries from plain value trees.

use serde_json::Value;

/// Whether a value counts as "filled in": any number, any boolean, or a
/// non-empty string, array or object.
pub fn is_retained(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Whether writing `value` to a path should remove the path instead.
pub fn is_removal(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Recursively drop `null`, `""`, `[]` and `{}` entries.
///
/// Objects stay objects and arrays stay arrays; array items that are dropped
/// close up. Containers that end up empty after cleaning are dropped from their
/// parent, which makes the function idempotent. A scalar root is returned as is.
pub fn clean(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter_map(|(key, child)| clean_child(child).map(|child| (key.clone(), child)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().filter_map(clean_child).collect()),
        scalar => scalar.clone(),
    }
}

fn clean_child(value: &Value) -> Option<Value> {
    if !is_retained(value) {
        return None;
    }
    match value {
        Value::Object(_) | Value::Array(_) => Some(clean(value)).filter(is_retained),
        scalar => Some(scalar.clone()),
    }
}
