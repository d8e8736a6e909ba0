use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use bunsen_model::{BunsenId, FieldErrors, ValidationResult};

use crate::schema::schema_for;
use crate::value_store::ValueStore;

/// Snapshot of a form, replaced wholesale on every transition.
///
/// `model` is always the converter's output for `base_model` and `value`.
/// Both models sit behind `Arc`s so consumers can detect an unchanged derived
/// model by pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub value: ValueStore,
    #[serde(serialize_with = "serialize_shared")]
    pub base_model: Arc<Value>,
    #[serde(serialize_with = "serialize_shared")]
    pub model: Arc<Value>,
    pub errors: FieldErrors,
    pub validation_result: ValidationResult,
}

fn serialize_shared<S: Serializer>(value: &Arc<Value>, serializer: S) -> Result<S::Ok, S::Error> {
    value.as_ref().serialize(serializer)
}

pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            value: ValueStore::new(),
            base_model: Arc::new(empty_object()),
            model: Arc::new(empty_object()),
            errors: FieldErrors::new(),
            validation_result: ValidationResult::default(),
        }
    }
}

impl FormState {
    /// Sub-schema of the derived model for `id`.
    pub fn field_model(&self, id: &BunsenId) -> Option<&Value> {
        schema_for(&self.model, id)
    }

    pub fn field_value(&self, id: &BunsenId) -> Option<Value> {
        self.value.get(id)
    }

    pub fn field_errors(&self, id: &BunsenId) -> Option<&Value> {
        self.errors.get(id.as_str())
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "value": self.value.to_json(),
            "baseModel": self.base_model.as_ref(),
            "model": self.model.as_ref(),
            "errors": self.errors,
            "validationResult": self.validation_result,
        })
    }
}
