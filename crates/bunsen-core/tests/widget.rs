//! Widget resolution against mounted form state.

use serde_json::{Value, json};

use bunsen_core::{ConditionalConverter, FormStore, Reducer, RendererRegistry, WidgetResolver};
use bunsen_model::{Action, BunsenError, BunsenId, CellConfig, FormOptions, STATIC_WIDGET};

fn id(path: &str) -> BunsenId {
    BunsenId::new(path).unwrap()
}

fn model() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "createdAt": {"type": "string", "editable": false},
            "tagType": {"type": "string"},
            "tag": {"type": "string"},
            "location": {"type": "object"}
        }
    })
}

fn store() -> FormStore<ConditionalConverter> {
    FormStore::mount(
        Reducer::new(ConditionalConverter),
        model(),
        None,
        FormOptions::default(),
    )
    .unwrap()
}

#[test]
fn field_type_picks_registry_entry() {
    let resolver = WidgetResolver::new(RendererRegistry::builtin());
    let store = store();
    let widget = resolver
        .resolve_field(&id("name"), &CellConfig::for_model(id("name")), store.state())
        .unwrap();
    assert_eq!(widget.as_deref(), Some("frost-bunsen-input-text"));

    let widget = resolver
        .resolve_field(&id("createdAt"), &CellConfig::for_model(id("createdAt")), store.state())
        .unwrap();
    assert_eq!(widget.as_deref(), Some(STATIC_WIDGET));
}

#[test]
fn custom_renderer_comes_from_cell() {
    let registry = RendererRegistry::builtin().with("tag-picker", "my-tag-picker");
    let resolver = WidgetResolver::new(registry);
    let cell = CellConfig::for_model(id("tag")).with_renderer("tag-picker");
    let widget = resolver.resolve_field(&id("tag"), &cell, store().state()).unwrap();
    assert_eq!(widget.as_deref(), Some("my-tag-picker"));
}

#[test]
fn form_options_control_read_only() {
    let options = FormOptions::default()
        .with_read_only(true)
        .with_static_widget("my-static");
    let resolver = WidgetResolver::new(RendererRegistry::builtin()).with_options(&options);
    let widget = resolver
        .resolve_field(&id("name"), &CellConfig::for_model(id("name")), store().state())
        .unwrap();
    assert_eq!(widget.as_deref(), Some("my-static"));
}

#[test]
fn unmet_dependency_suppresses_unsupported_error() {
    let resolver = WidgetResolver::new(RendererRegistry::builtin());
    let mut store = store();
    let cell = CellConfig::for_model(id("location")).with_depends_on(id("tagType"));

    let widget = resolver.resolve_field(&id("location"), &cell, store.state()).unwrap();
    assert_eq!(widget, None);

    store
        .dispatch(Action::change_value(id("tagType"), json!("custom")))
        .unwrap();
    let error = resolver
        .resolve_field(&id("location"), &cell, store.state())
        .unwrap_err();
    assert!(matches!(error, BunsenError::UnsupportedFieldType { .. }));
    assert!(error.to_string().starts_with(r#"Only "boolean","button-group""#));
}
