//! Validation of a form value against its derived model.
//!
//! The outcome is shaped for a `VALIDATION_RESOLVED` action: a summary list of
//! warnings and errors, plus the error messages keyed by bunsenId.

use serde_json::{Map, Value};
use tracing::debug;

use bunsen_model::{Action, FieldErrors, ValidationIssue, ValidationResult};

use crate::schema::{item_schema, properties, required, type_of};

const ROOT: &str = "#";

/// Result of one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub result: ValidationResult,
    pub errors: FieldErrors,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }

    /// The action that records this outcome in a form state.
    pub fn into_action(self) -> Action {
        Action::validation_resolved(self.result, self.errors)
    }
}

/// Check `value` against `model`.
pub fn validate(model: &Value, value: &Value) -> Validation {
    let mut checker = Checker::default();
    checker.check(model, value, ROOT);
    checker.result.errors.sort_by(|a, b| a.path.cmp(&b.path));
    checker.result.warnings.sort_by(|a, b| a.path.cmp(&b.path));

    let mut errors = FieldErrors::new();
    for issue in &checker.result.errors {
        let messages = errors
            .entry(issue.path.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(messages) = messages {
            messages.push(Value::String(issue.message.clone()));
        }
    }
    debug!(
        errors = checker.result.error_count(),
        warnings = checker.result.warning_count(),
        "validation complete"
    );
    Validation {
        result: checker.result,
        errors,
    }
}

fn join(path: &str, key: &str) -> String {
    if path == ROOT {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|n| n.fract() == 0.0)
        }
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

#[derive(Default)]
struct Checker {
    result: ValidationResult,
}

impl Checker {
    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.result.errors.push(ValidationIssue::new(path, message));
    }

    fn check(&mut self, schema: &Value, value: &Value, path: &str) {
        if let Some(expected) = type_of(schema)
            && !matches_type(expected, value)
        {
            self.error(path, format!("Value must be of type {expected}."));
            return;
        }

        if let Some(allowed) = schema.get("enum").and_then(Value::as_array)
            && !allowed.contains(value)
        {
            let names: Vec<String> = allowed.iter().map(Value::to_string).collect();
            self.error(
                path,
                format!("Value must be one of: {}.", names.join(", ")),
            );
        }

        match value {
            Value::String(s) => self.check_string(schema, s, path),
            Value::Number(n) => {
                if let Some(n) = n.as_f64() {
                    self.check_number(schema, n, path);
                }
            }
            Value::Array(items) => self.check_array(schema, items, path),
            Value::Object(map) => self.check_object(schema, map, path),
            _ => {}
        }
    }

    fn check_string(&mut self, schema: &Value, s: &str, path: &str) {
        let length = s.chars().count() as u64;
        if let Some(min) = schema.get("minLength").and_then(Value::as_u64)
            && length < min
        {
            self.error(path, format!("Value must be at least {min} characters."));
        }
        if let Some(max) = schema.get("maxLength").and_then(Value::as_u64)
            && length > max
        {
            self.error(path, format!("Value must be at most {max} characters."));
        }
    }

    fn check_number(&mut self, schema: &Value, n: f64, path: &str) {
        if let Some(min) = schema.get("minimum").and_then(Value::as_f64)
            && n < min
        {
            self.error(path, format!("Value must be at least {min}."));
        }
        if let Some(max) = schema.get("maximum").and_then(Value::as_f64)
            && n > max
        {
            self.error(path, format!("Value must be at most {max}."));
        }
    }

    fn check_array(&mut self, schema: &Value, items: &[Value], path: &str) {
        let count = items.len() as u64;
        if let Some(min) = schema.get("minItems").and_then(Value::as_u64)
            && count < min
        {
            self.error(path, format!("Must contain at least {min} items."));
        }
        if let Some(max) = schema.get("maxItems").and_then(Value::as_u64)
            && count > max
        {
            self.error(path, format!("Must contain at most {max} items."));
        }
        for (index, item) in items.iter().enumerate() {
            if let Some(item_schema) = item_schema(schema, index) {
                self.check(item_schema, item, &join(path, &index.to_string()));
            }
        }
    }

    fn check_object(&mut self, schema: &Value, map: &Map<String, Value>, path: &str) {
        for name in required(schema) {
            if map.get(name).is_none_or(Value::is_null) {
                self.result
                    .errors
                    .push(ValidationIssue::required(join(path, name), "Field is required."));
            }
        }
        let props = properties(schema);
        for (name, child) in map {
            match props.and_then(|props| props.get(name)) {
                Some(child_schema) => {
                    if !child.is_null() {
                        self.check(child_schema, child, &join(path, name));
                    }
                }
                None if schema.get("additionalProperties") == Some(&Value::Bool(false)) => {
                    self.result
                        .warnings
                        .push(ValidationIssue::new(join(path, name), "Unexpected property."));
                }
                None => {}
            }
        }
    }
}
