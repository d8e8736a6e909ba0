//! The form-state transition function.
//!
//! [`Reducer::reduce`] takes the current [`FormState`] and an [`Action`] and
//! returns the next state. It never mutates its input; unchanged parts of the
//! state are shared with the previous snapshot.
//!
//! | Action                | Effect                                                     |
//! |-----------------------|------------------------------------------------------------|
//! | `CHANGE_VALUE`        | Set, remove or replace value entries; re-derive the model  |
//! | `CHANGE_MODEL`        | Replace the base model; re-derive the model                |
//! | `VALIDATION_RESOLVED` | Replace `errors` and `validationResult`                    |
//! | `@@redux/INIT`        | Merge a prior state over the defaults                      |
//!
//! Untyped actions go through [`Reducer::reduce_raw`]; kinds it does not know
//! are reported as error-level diagnostics and leave the state as it was.

use std::sync::Arc;

use serde_json::Value;
use tracing::{Dispatch, debug, error};

use bunsen_model::{Action, ActionKind, BunsenId, FieldErrors, InitialState, Result};

use crate::clean::{clean, is_removal, is_retained};
use crate::convert::SchemaConverter;
use crate::state::{FormState, empty_object};
use crate::value_store::ValueStore;

/// Computes form-state transitions using a schema converter.
pub struct Reducer<C> {
    converter: C,
    diagnostics: Option<Dispatch>,
}

impl<C: SchemaConverter> Reducer<C> {
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            diagnostics: None,
        }
    }

    /// Route diagnostics to `dispatch` instead of the default subscriber.
    #[must_use]
    pub fn with_diagnostics(mut self, dispatch: Dispatch) -> Self {
        self.diagnostics = Some(dispatch);
        self
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// The state produced by an init action without a prior state.
    pub fn initial_state(&self) -> FormState {
        FormState::default()
    }

    /// Apply a typed action.
    ///
    /// # Errors
    ///
    /// Returns whatever the schema converter returns when it fails; no other
    /// transition can fail.
    pub fn reduce(&self, state: &FormState, action: Action) -> Result<FormState> {
        match action {
            Action::ChangeValue { bunsen_id, value } => {
                self.change_value(state, bunsen_id.as_ref(), &value)
            }
            Action::ChangeModel { model } => {
                debug!(action = %ActionKind::ChangeModel, "reduce");
                let base_model = Arc::new(model);
                let model = self.derive_model(&base_model, &state.value, &state.model)?;
                Ok(FormState {
                    value: state.value.clone(),
                    base_model,
                    model,
                    errors: state.errors.clone(),
                    validation_result: state.validation_result.clone(),
                })
            }
            Action::ValidationResolved {
                validation_result,
                errors,
            } => {
                debug!(
                    action = %ActionKind::ValidationResolved,
                    errors = validation_result.error_count(),
                    warnings = validation_result.warning_count(),
                    "reduce"
                );
                Ok(FormState {
                    value: state.value.clone(),
                    base_model: Arc::clone(&state.base_model),
                    model: Arc::clone(&state.model),
                    errors,
                    validation_result,
                })
            }
            Action::Init { state: prior } => self.init(prior.unwrap_or_default()),
        }
    }

    /// Apply an action received as plain JSON.
    ///
    /// An unknown `type`, or a payload that does not fit its known `type`, is
    /// logged and the state is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns schema converter failures, as [`Reducer::reduce`] does.
    pub fn reduce_raw(&self, state: &FormState, action: &Value) -> Result<FormState> {
        let action_type = action.get("type").and_then(Value::as_str);
        let Some(kind) = action_type.and_then(ActionKind::parse) else {
            self.diagnose(|| {
                error!(
                    action = action_type.unwrap_or("<missing>"),
                    "Do not recognize action {}",
                    action_type.unwrap_or("<missing>")
                );
            });
            return Ok(state.clone());
        };
        match Action::from_json(action) {
            Ok(action) => self.reduce(state, action),
            Err(err) => {
                self.diagnose(|| {
                    error!(action = %kind, error = %err, "Malformed action payload");
                });
                Ok(state.clone())
            }
        }
    }

    fn change_value(
        &self,
        state: &FormState,
        bunsen_id: Option<&BunsenId>,
        value: &Value,
    ) -> Result<FormState> {
        debug!(
            action = %ActionKind::ChangeValue,
            bunsen_id = bunsen_id.map_or("<root>", BunsenId::as_str),
            "reduce"
        );
        let next = match bunsen_id {
            None => ValueStore::from_json(clean(value)),
            Some(id) if is_removal(value) => state.value.without(id),
            Some(id) => match clean(value) {
                cleaned if is_retained(&cleaned) => state.value.set(id, cleaned),
                _ => state.value.without(id),
            },
        };
        let model = self.derive_model(&state.base_model, &next, &state.model)?;
        Ok(FormState {
            value: next,
            base_model: Arc::clone(&state.base_model),
            model,
            errors: state.errors.clone(),
            validation_result: state.validation_result.clone(),
        })
    }

    fn init(&self, prior: InitialState) -> Result<FormState> {
        debug!(
            action = %ActionKind::Init,
            has_base_model = prior.base_model.is_some(),
            "reduce"
        );
        let value = prior.value.map(ValueStore::from_json).unwrap_or_default();
        let model = match &prior.base_model {
            Some(base_model) => self.converter.convert(base_model, &value.to_json())?,
            None => prior.model.unwrap_or_else(empty_object),
        };
        Ok(FormState {
            value,
            base_model: Arc::new(prior.base_model.unwrap_or_else(empty_object)),
            model: Arc::new(model),
            errors: prior.errors.unwrap_or_else(FieldErrors::new),
            validation_result: prior.validation_result.unwrap_or_default(),
        })
    }

    /// Run the converter, keeping `previous` when the result is unchanged.
    fn derive_model(
        &self,
        base_model: &Value,
        value: &ValueStore,
        previous: &Arc<Value>,
    ) -> Result<Arc<Value>> {
        let derived = self.converter.convert(base_model, &value.to_json())?;
        if derived == **previous {
            Ok(Arc::clone(previous))
        } else {
            Ok(Arc::new(derived))
        }
    }

    fn diagnose(&self, emit: impl FnOnce()) {
        match &self.diagnostics {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, emit),
            None => emit(),
        }
    }
}
