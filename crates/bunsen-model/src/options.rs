//! Configuration options for a mounted form.

use serde::{Deserialize, Serialize};

/// Widget rendered for read-only and non-editable fields.
pub const STATIC_WIDGET: &str = "frost-bunsen-input-static";

/// Options controlling how a form store behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    /// Run the validator after every value or model change and record the outcome.
    pub validate_on_change: bool,

    /// Fill schema `default`s into the value when the form mounts.
    pub apply_defaults: bool,

    /// Render every field with the static widget.
    pub read_only: bool,

    /// Widget used for read-only fields.
    pub static_widget: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_on_change: false,
            apply_defaults: true,
            read_only: false,
            static_widget: STATIC_WIDGET.to_string(),
        }
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validate_on_change(mut self, enable: bool) -> Self {
        self.validate_on_change = enable;
        self
    }

    pub fn with_apply_defaults(mut self, enable: bool) -> Self {
        self.apply_defaults = enable;
        self
    }

    pub fn with_read_only(mut self, enable: bool) -> Self {
        self.read_only = enable;
        self
    }

    pub fn with_static_widget(mut self, widget: impl Into<String>) -> Self {
        self.static_widget = widget.into();
        self
    }
}
