//! Error types shared across the bunsen crates.

use thiserror::Error;

/// Unified error type for form-state operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BunsenError {
    /// No renderer matched a field that has to render.
    #[error("Only {} fields are currently supported.", quoted_keys(.supported))]
    UnsupportedFieldType {
        /// Registry keys, in registry order.
        supported: Vec<String>,
    },

    /// A bunsenId with an empty segment.
    #[error("Invalid bunsenId: '{0}'")]
    InvalidBunsenId(String),

    /// The schema converter could not make sense of the model.
    #[error("Invalid schema at '{path}': {message}")]
    Schema {
        /// Location of the offending schema node.
        path: String,
        /// Description of the problem.
        message: String,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BunsenError {
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn quoted_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|key| format!("\"{key}\""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Result type alias for bunsen operations.
pub type Result<T> = std::result::Result<T, BunsenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_field_type_lists_quoted_keys() {
        let error = BunsenError::UnsupportedFieldType {
            supported: vec!["boolean".to_string(), "text".to_string()],
        };
        assert_eq!(
            error.to_string(),
            r#"Only "boolean","text" fields are currently supported."#
        );
    }

    #[test]
    fn schema_error_names_path() {
        let error = BunsenError::schema("properties.name", "conditions must be an array");
        assert_eq!(
            error.to_string(),
            "Invalid schema at 'properties.name': conditions must be an array"
        );
    }
}
