//! Actions understood by the form reducer.
//!
//! Actions travel as JSON objects discriminated by a `type` field:
//!
//! ```json
//! {"type": "CHANGE_VALUE", "bunsenId": "address.street", "value": "Main St"}
//! {"type": "CHANGE_VALUE", "bunsenId": null, "value": {"name": "Ada"}}
//! {"type": "CHANGE_MODEL", "model": {"type": "object", "properties": {}}}
//! {"type": "VALIDATION_RESOLVED", "validationResult": {"warnings": [], "errors": []}, "errors": {}}
//! {"type": "@@redux/INIT", "state": {"baseModel": {}}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::ids::BunsenId;
use crate::validation::{FieldErrors, ValidationResult};

pub const CHANGE_VALUE: &str = "CHANGE_VALUE";
pub const CHANGE_MODEL: &str = "CHANGE_MODEL";
pub const VALIDATION_RESOLVED: &str = "VALIDATION_RESOLVED";
pub const INIT: &str = "@@redux/INIT";

/// The closed set of action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ChangeValue,
    ChangeModel,
    ValidationResolved,
    Init,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::ChangeValue,
        ActionKind::ChangeModel,
        ActionKind::ValidationResolved,
        ActionKind::Init,
    ];

    /// Parse the wire `type` discriminator.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangeValue => CHANGE_VALUE,
            Self::ChangeModel => CHANGE_MODEL,
            Self::ValidationResolved => VALIDATION_RESOLVED,
            Self::Init => INIT,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Set, remove or replace part of the value tree. `bunsen_id: None` addresses the root.
    #[serde(rename = "CHANGE_VALUE")]
    ChangeValue {
        #[serde(rename = "bunsenId")]
        bunsen_id: Option<BunsenId>,
        #[serde(default)]
        value: Value,
    },

    /// Replace the base model.
    #[serde(rename = "CHANGE_MODEL")]
    ChangeModel { model: Value },

    /// Store the outcome of a validation pass.
    #[serde(rename = "VALIDATION_RESOLVED")]
    ValidationResolved {
        #[serde(rename = "validationResult", default)]
        validation_result: ValidationResult,
        #[serde(default)]
        errors: FieldErrors,
    },

    /// Build the initial state, optionally from a prior one.
    #[serde(rename = "@@redux/INIT")]
    Init {
        #[serde(default)]
        state: Option<InitialState>,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::ChangeValue { .. } => ActionKind::ChangeValue,
            Self::ChangeModel { .. } => ActionKind::ChangeModel,
            Self::ValidationResolved { .. } => ActionKind::ValidationResolved,
            Self::Init { .. } => ActionKind::Init,
        }
    }

    pub fn change_value(bunsen_id: BunsenId, value: Value) -> Self {
        Self::ChangeValue {
            bunsen_id: Some(bunsen_id),
            value,
        }
    }

    pub fn replace_value(value: Value) -> Self {
        Self::ChangeValue {
            bunsen_id: None,
            value,
        }
    }

    pub fn change_model(model: Value) -> Self {
        Self::ChangeModel { model }
    }

    pub fn validation_resolved(validation_result: ValidationResult, errors: FieldErrors) -> Self {
        Self::ValidationResolved {
            validation_result,
            errors,
        }
    }

    pub fn init(state: Option<InitialState>) -> Self {
        Self::Init { state }
    }

    /// Parse an action from its wire form.
    ///
    /// # Errors
    ///
    /// [`BunsenError::Json`](crate::BunsenError::Json) for an unknown `type` or a
    /// payload that does not fit its `type`.
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }
}

/// Prior state carried by the init action. Missing fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub base_model: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
    #[serde(default)]
    pub validation_result: Option<ValidationResult>,
}

impl InitialState {
    pub fn with_base_model(mut self, model: Value) -> Self {
        self.base_model = Some(model);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}
