//! State engine for schema-driven forms.
//!
//! The core is [`Reducer`]: a pure transition function from a [`FormState`]
//! and an [`Action`](bunsen_model::Action) to the next state. Around it sit the
//! persistent [`ValueStore`], the value [`clean`]er, [`SchemaConverter`]s that
//! derive the effective model, the [`validate`] pass, and the widget resolver
//! consumed by rendering layers.

pub mod clean;
pub mod convert;
pub mod defaults;
pub mod reducer;
pub mod schema;
pub mod state;
pub mod store;
pub mod validate;
pub mod value_store;
pub mod widget;

pub use clean::{clean, is_removal, is_retained};
pub use convert::{ConditionalConverter, IdentityConverter, SchemaConverter};
pub use defaults::apply_defaults;
pub use reducer::Reducer;
pub use state::FormState;
pub use store::FormStore;
pub use validate::{Validation, validate};
pub use value_store::ValueStore;
pub use widget::{
    RendererRegistry, WidgetResolver, dependency_met, resolve_widget_name, should_render,
};
