//! Derivation of the effective model from the base model and the current value.
//!
//! A property can carry `conditions`, evaluated against the value:
//!
//! ```json
//! "tag": {
//!   "type": "string",
//!   "conditions": [
//!     {"if": [{"tagType": {"equals": "custom"}}], "then": {"minLength": 3}}
//!   ]
//! }
//! ```
//!
//! The first condition whose `if` holds and whose `unless` does not is merged
//! into the property. A property whose conditions all fail is dropped from the
//! derived model (and from `required`).

use serde_json::{Map, Value};

use bunsen_model::{BunsenError, Result};

use crate::schema::properties;

/// Computes the model in effect for a value.
///
/// Implementations must be pure and deterministic; the reducer calls them on
/// every value or model change and propagates their errors unchanged.
pub trait SchemaConverter {
    fn convert(&self, base_model: &Value, value: &Value) -> Result<Value>;
}

impl<F> SchemaConverter for F
where
    F: Fn(&Value, &Value) -> Result<Value>,
{
    fn convert(&self, base_model: &Value, value: &Value) -> Result<Value> {
        self(base_model, value)
    }
}

/// Returns the base model unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl SchemaConverter for IdentityConverter {
    fn convert(&self, base_model: &Value, _value: &Value) -> Result<Value> {
        Ok(base_model.clone())
    }
}

/// Evaluates property `conditions` against the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalConverter;

impl SchemaConverter for ConditionalConverter {
    fn convert(&self, base_model: &Value, value: &Value) -> Result<Value> {
        let mut scope = Vec::new();
        convert_node(base_model, value, &mut scope, ROOT)
    }
}

const ROOT: &str = "#";

static NULL: Value = Value::Null;

fn join(path: &str, key: &str) -> String {
    if path == ROOT {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// `scope` holds the values of every enclosing container, root first.
fn convert_node<'v>(
    schema: &Value,
    value: &'v Value,
    scope: &mut Vec<&'v Value>,
    path: &str,
) -> Result<Value> {
    let Some(object) = schema.as_object() else {
        return Ok(schema.clone());
    };
    let mut out = object.clone();
    scope.push(value);
    let converted = convert_members(&mut out, value, scope, path);
    scope.pop();
    converted?;
    Ok(Value::Object(out))
}

fn convert_members<'v>(
    out: &mut Map<String, Value>,
    value: &'v Value,
    scope: &mut Vec<&'v Value>,
    path: &str,
) -> Result<()> {
    if let Some(props) = out.get("properties") {
        let props = props
            .as_object()
            .ok_or_else(|| BunsenError::schema(path, "properties must be an object"))?;
        let mut derived = Map::new();
        let mut hidden = Vec::new();
        for (name, prop) in props {
            let prop_path = join(path, name);
            let Some(prop) = apply_conditions(prop, scope, &prop_path)? else {
                hidden.push(name.clone());
                continue;
            };
            let child = value.get(name).unwrap_or(&NULL);
            derived.insert(name.clone(), convert_node(&prop, child, scope, &prop_path)?);
        }
        out.insert("properties".to_string(), Value::Object(derived));
        if !hidden.is_empty()
            && let Some(Value::Array(required)) = out.get_mut("required")
        {
            required.retain(|name| !name.as_str().is_some_and(|n| hidden.iter().any(|h| h == n)));
        }
    }

    let items = match out.get("items") {
        Some(items @ Value::Object(_)) => match value {
            Value::Array(elements) if contains_conditions(items) => {
                let mut tuple = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    let item_path = join(path, &index.to_string());
                    tuple.push(convert_node(items, element, scope, &item_path)?);
                }
                Some((Value::Array(tuple), Some(strip_conditions(items))))
            }
            _ => Some((convert_node(items, &NULL, scope, path)?, None)),
        },
        Some(Value::Array(schemas)) => {
            let mut tuple = Vec::with_capacity(schemas.len());
            for (index, item) in schemas.iter().enumerate() {
                let element = value.get(index).unwrap_or(&NULL);
                let item_path = join(path, &index.to_string());
                tuple.push(convert_node(item, element, scope, &item_path)?);
            }
            Some((Value::Array(tuple), None))
        }
        _ => None,
    };
    if let Some((items, additional)) = items {
        out.insert("items".to_string(), items);
        if let Some(additional) = additional {
            out.insert("additionalItems".to_string(), additional);
        }
    }
    Ok(())
}

/// The property schema in effect, or `None` when its conditions hide it.
fn apply_conditions(prop: &Value, scope: &[&Value], path: &str) -> Result<Option<Value>> {
    let Some(conditions) = prop.get("conditions") else {
        return Ok(Some(prop.clone()));
    };
    let conditions = conditions
        .as_array()
        .ok_or_else(|| BunsenError::schema(path, "conditions must be an array"))?;
    for condition in conditions {
        let condition = condition
            .as_object()
            .ok_or_else(|| BunsenError::schema(path, "condition must be an object"))?;
        let applies = match condition.get("if") {
            Some(entries) => any_entry_holds(entries, scope, path)?,
            None => true,
        };
        let excluded = match condition.get("unless") {
            Some(entries) => any_entry_holds(entries, scope, path)?,
            None => false,
        };
        if !applies || excluded {
            continue;
        }
        let mut derived = prop.as_object().cloned().unwrap_or_default();
        derived.remove("conditions");
        if let Some(then) = condition.get("then") {
            let then = then
                .as_object()
                .ok_or_else(|| BunsenError::schema(path, "'then' must be an object"))?;
            for (key, member) in then {
                derived.insert(key.clone(), member.clone());
            }
        }
        return Ok(Some(Value::Object(derived)));
    }
    Ok(None)
}

/// Entries are OR'd; the tests inside one entry are AND'd.
fn any_entry_holds(entries: &Value, scope: &[&Value], path: &str) -> Result<bool> {
    let entries = entries
        .as_array()
        .ok_or_else(|| BunsenError::schema(path, "'if' and 'unless' must be arrays"))?;
    for entry in entries {
        let tests = entry
            .as_object()
            .ok_or_else(|| BunsenError::schema(path, "condition entry must be an object"))?;
        let mut holds = true;
        for (target, test) in tests {
            if !test_holds(resolve(target, scope), test, path)? {
                holds = false;
                break;
            }
        }
        if holds {
            return Ok(true);
        }
    }
    Ok(false)
}

fn test_holds(actual: Option<&Value>, test: &Value, path: &str) -> Result<bool> {
    let test = test
        .as_object()
        .ok_or_else(|| BunsenError::schema(path, "condition test must be an object"))?;
    for (op, expected) in test {
        let holds = match op.as_str() {
            "equals" => actual == Some(expected),
            "notEquals" => actual != Some(expected),
            "defined" => {
                let wanted = expected
                    .as_bool()
                    .ok_or_else(|| BunsenError::schema(path, "'defined' expects a boolean"))?;
                actual.is_some_and(|v| !v.is_null()) == wanted
            }
            other => {
                return Err(BunsenError::schema(
                    path,
                    format!("unsupported condition test '{other}'"),
                ));
            }
        };
        if !holds {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Resolve a condition target against the enclosing values.
///
/// `x` and `./x` address a sibling, each `../` climbs one container, and a
/// leading `/` starts from the root value.
fn resolve<'v>(target: &str, scope: &[&'v Value]) -> Option<&'v Value> {
    let (start, rest) = match target.strip_prefix('/') {
        Some(rest) => (scope.first().copied()?, rest),
        None => {
            let mut depth = scope.len().checked_sub(1)?;
            let mut rest = target.strip_prefix("./").unwrap_or(target);
            while let Some(next) = rest.strip_prefix("../") {
                depth = depth.checked_sub(1)?;
                rest = next;
            }
            (scope.get(depth).copied()?, rest)
        }
    };
    if rest.is_empty() {
        return Some(start);
    }
    rest.split('.').try_fold(start, |node, key| match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn contains_conditions(schema: &Value) -> bool {
    let Some(object) = schema.as_object() else {
        return false;
    };
    object.contains_key("conditions")
        || properties(schema).is_some_and(|props| props.values().any(contains_conditions))
        || match object.get("items") {
            Some(Value::Array(tuple)) => tuple.iter().any(contains_conditions),
            Some(items) => contains_conditions(items),
            None => false,
        }
}

fn strip_conditions(schema: &Value) -> Value {
    let Some(object) = schema.as_object() else {
        return schema.clone();
    };
    let mut out = Map::new();
    for (key, member) in object {
        let member = match (key.as_str(), member) {
            ("conditions", _) => continue,
            ("properties", Value::Object(props)) => Value::Object(
                props
                    .iter()
                    .map(|(name, prop)| (name.clone(), strip_conditions(prop)))
                    .collect(),
            ),
            ("items" | "additionalItems", Value::Array(tuple)) => {
                Value::Array(tuple.iter().map(strip_conditions).collect())
            }
            ("items" | "additionalItems", items) => strip_conditions(items),
            _ => member.clone(),
        };
        out.insert(key.clone(), member);
    }
    Value::Object(out)
}
