use serde::{Deserialize, Serialize};

use crate::ids::BunsenId;

/// Per-field view metadata, separate from the data schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellConfig {
    /// Field the cell renders.
    #[serde(default)]
    pub model: Option<BunsenId>,
    /// Custom renderer name, looked up in the renderer registry.
    #[serde(default)]
    pub renderer: Option<String>,
    /// Field that must hold a value before this cell renders.
    #[serde(default)]
    pub depends_on: Option<BunsenId>,
    #[serde(default)]
    pub label: Option<String>,
    /// Render the field read-only regardless of the form setting.
    #[serde(default)]
    pub read_only: bool,
}

impl CellConfig {
    pub fn for_model(model: BunsenId) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.renderer = Some(renderer.into());
        self
    }

    pub fn with_depends_on(mut self, depends_on: BunsenId) -> Self {
        self.depends_on = Some(depends_on);
        self
    }
}
