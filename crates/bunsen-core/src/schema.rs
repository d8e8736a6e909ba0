//! Read helpers over JSON-Schema-like models.

use serde_json::{Map, Value};

use bunsen_model::{BunsenId, Segment};

pub fn properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

/// The declared `type`, taking the first entry when `type` is a list.
pub fn type_of(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types.iter().find_map(Value::as_str),
        _ => None,
    }
}

pub fn editable(schema: &Value) -> Option<bool> {
    schema.get("editable").and_then(Value::as_bool)
}

pub fn required(schema: &Value) -> impl Iterator<Item = &str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Schema of the item at `index`, honouring tuple-form `items` and `additionalItems`.
pub fn item_schema(schema: &Value, index: usize) -> Option<&Value> {
    match schema.get("items")? {
        Value::Array(tuple) => tuple
            .get(index)
            .or_else(|| schema.get("additionalItems").filter(|s| s.is_object())),
        items => Some(items),
    }
}

/// Sub-schema describing the field at `id`.
pub fn schema_for<'a>(model: &'a Value, id: &BunsenId) -> Option<&'a Value> {
    id.segments().try_fold(model, |schema, segment| {
        if let Some(props) = properties(schema) {
            return props.get(&segment.as_key());
        }
        match segment {
            Segment::Index(index) => item_schema(schema, index),
            Segment::Key(_) => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_nested_and_item_schemas() {
        let model = json!({
            "type": "object",
            "properties": {
                "address": {
                    "type": "object",
                    "properties": {"street": {"type": "string"}}
                },
                "phones": {
                    "type": "array",
                    "items": {"type": "object", "properties": {"number": {"type": "string"}}}
                }
            }
        });
        let street = schema_for(&model, &BunsenId::new("address.street").unwrap()).unwrap();
        assert_eq!(type_of(street), Some("string"));
        let number = schema_for(&model, &BunsenId::new("phones.3.number").unwrap()).unwrap();
        assert_eq!(type_of(number), Some("string"));
        assert!(schema_for(&model, &BunsenId::new("missing").unwrap()).is_none());
    }

    #[test]
    fn tuple_items_fall_back_to_additional_items() {
        let schema = json!({
            "type": "array",
            "items": [{"type": "string"}],
            "additionalItems": {"type": "number"}
        });
        assert_eq!(type_of(item_schema(&schema, 0).unwrap()), Some("string"));
        assert_eq!(type_of(item_schema(&schema, 5).unwrap()), Some("number"));
    }

    #[test]
    fn type_list_takes_first_name() {
        assert_eq!(type_of(&json!({"type": ["string", "null"]})), Some("string"));
        assert_eq!(type_of(&json!({})), None);
    }
}
