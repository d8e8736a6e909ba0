//! Schema `default` values merged into a form value at mount.

use serde_json::{Map, Value};

use crate::schema::properties;

/// Fill absent properties of `value` from the `default`s declared in `model`.
///
/// Values already present always win. Nested objects are filled recursively;
/// an object that receives nothing stays absent.
pub fn apply_defaults(model: &Value, value: &Value) -> Value {
    fill(model, Some(value).filter(|v| !v.is_null())).unwrap_or(Value::Null)
}

fn fill(schema: &Value, value: Option<&Value>) -> Option<Value> {
    let Some(props) = properties(schema) else {
        return value.cloned().or_else(|| schema.get("default").cloned());
    };
    let mut out = match value {
        Some(Value::Object(map)) => map.clone(),
        Some(other) => return Some(other.clone()),
        None => match schema.get("default") {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => return Some(other.clone()),
            None => Map::new(),
        },
    };
    for (name, prop) in props {
        let filled = fill(prop, out.get(name).filter(|v| !v.is_null()));
        if let Some(filled) = filled {
            out.insert(name.clone(), filled);
        }
    }
    if out.is_empty() && value.is_none() {
        return None;
    }
    Some(Value::Object(out))
}
