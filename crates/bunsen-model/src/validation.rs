use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw validation error detail keyed by bunsenId.
pub type FieldErrors = BTreeMap<String, Value>;

/// A single problem found while validating a form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// bunsenId of the offending field (`#` for the root).
    pub path: String,
    /// Human-readable message.
    pub message: String,
    /// Set when the issue is a missing required property.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_required_error: bool,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            is_required_error: false,
        }
    }

    pub fn required(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_required_error: true,
            ..Self::new(path, message)
        }
    }
}

/// Summary of a validation pass: `{warnings: [...], errors: [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub warnings: Vec<ValidationIssue>,
    #[serde(default)]
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
