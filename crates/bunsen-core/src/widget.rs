//! Selection of the widget that renders a field.
//!
//! The policy, in order:
//!
//! 1. a custom renderer named by the cell wins (looked up in the registry);
//! 2. read-only or non-editable fields get the static widget;
//! 3. a registry entry for the field's type;
//! 4. otherwise the field cannot be rendered: an error when it is due to render,
//!    nothing when its dependency is unmet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bunsen_model::{BunsenError, BunsenId, CellConfig, FormOptions, Result, STATIC_WIDGET};

use crate::clean::is_retained;
use crate::schema::{editable, type_of};
use crate::state::FormState;
use crate::value_store::ValueStore;

/// Renderer-name or field-type → widget identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererRegistry(BTreeMap<String, String>);

const BUILTIN_INPUTS: [&str; 18] = [
    "boolean",
    "button-group",
    "checkbox-array",
    "date",
    "datetime",
    "image",
    "link",
    "multi-select",
    "number",
    "password",
    "property-chooser",
    "select",
    "static",
    "table",
    "text",
    "textarea",
    "url",
    "when",
];

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock inputs, keyed by renderer name and by JSON type.
    pub fn builtin() -> Self {
        let mut registry: Self = BUILTIN_INPUTS
            .into_iter()
            .map(|name| (name, format!("frost-bunsen-input-{name}")))
            .collect();
        for (field_type, input) in [
            ("string", "text"),
            ("integer", "number"),
            ("number", "number"),
            ("boolean", "boolean"),
        ] {
            registry.insert(field_type, format!("frost-bunsen-input-{input}"));
        }
        registry
    }

    pub fn insert(&mut self, key: impl Into<String>, widget: impl Into<String>) {
        self.0.insert(key.into(), widget.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, widget: impl Into<String>) -> Self {
        self.insert(key, widget);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RendererRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Whether a field should render given its dependency.
pub fn should_render(depends_on: Option<&BunsenId>, dependency_met: bool) -> bool {
    depends_on.is_none() || dependency_met
}

/// Whether the field a cell depends on currently holds a value.
pub fn dependency_met(cell: &CellConfig, value: &ValueStore) -> bool {
    match &cell.depends_on {
        Some(dependency) => value.get(dependency).is_some_and(|v| is_retained(&v)),
        None => true,
    }
}

/// Pick the widget for a field using [`STATIC_WIDGET`] for read-only fields.
///
/// # Errors
///
/// [`BunsenError::UnsupportedFieldType`] when nothing matches a field that
/// should render.
pub fn resolve_widget_name(
    renderer: Option<&str>,
    editable: Option<bool>,
    field_type: Option<&str>,
    read_only: bool,
    should_render: bool,
    registry: &RendererRegistry,
) -> Result<Option<String>> {
    resolve_with(
        STATIC_WIDGET,
        renderer,
        editable,
        field_type,
        read_only,
        should_render,
        registry,
    )
}

fn resolve_with(
    static_widget: &str,
    renderer: Option<&str>,
    editable: Option<bool>,
    field_type: Option<&str>,
    read_only: bool,
    should_render: bool,
    registry: &RendererRegistry,
) -> Result<Option<String>> {
    if let Some(renderer) = renderer.filter(|r| !r.is_empty()) {
        return Ok(registry.get(renderer).map(str::to_string));
    }
    if read_only || editable == Some(false) {
        return Ok(Some(static_widget.to_string()));
    }
    if let Some(widget) = field_type.and_then(|t| registry.get(t)) {
        return Ok(Some(widget.to_string()));
    }
    if should_render {
        return Err(BunsenError::UnsupportedFieldType {
            supported: registry.keys().map(str::to_string).collect(),
        });
    }
    Ok(None)
}

/// Resolves widgets for the fields of a mounted form.
#[derive(Debug, Clone)]
pub struct WidgetResolver {
    registry: RendererRegistry,
    static_widget: String,
    read_only: bool,
}

impl WidgetResolver {
    pub fn new(registry: RendererRegistry) -> Self {
        Self {
            registry,
            static_widget: STATIC_WIDGET.to_string(),
            read_only: false,
        }
    }

    /// Take the static widget and form-wide read-only flag from `options`.
    #[must_use]
    pub fn with_options(mut self, options: &FormOptions) -> Self {
        self.static_widget = options.static_widget.clone();
        self.read_only = options.read_only;
        self
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Widget for the field `id`, reading its type and `editable` flag from the
    /// derived model and its dependency from the value.
    ///
    /// # Errors
    ///
    /// [`BunsenError::UnsupportedFieldType`] as for [`resolve_widget_name`].
    pub fn resolve_field(
        &self,
        id: &BunsenId,
        cell: &CellConfig,
        state: &FormState,
    ) -> Result<Option<String>> {
        let field = state.field_model(id);
        let render = should_render(cell.depends_on.as_ref(), dependency_met(cell, &state.value));
        resolve_with(
            &self.static_widget,
            cell.renderer.as_deref(),
            field.and_then(editable),
            field.and_then(type_of),
            self.read_only || cell.read_only,
            render,
            &self.registry,
        )
    }
}
