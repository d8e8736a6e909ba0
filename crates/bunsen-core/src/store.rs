//! Ownership of a single mounted form's state.

use serde_json::Value;
use tracing::{debug, info_span};

use bunsen_model::{Action, ActionKind, FormOptions, InitialState, Result};

use crate::clean::clean;
use crate::convert::SchemaConverter;
use crate::defaults::apply_defaults;
use crate::reducer::Reducer;
use crate::state::FormState;
use crate::validate::validate;

/// Holds one form's state; the only way to change it is to dispatch actions.
pub struct FormStore<C> {
    reducer: Reducer<C>,
    state: FormState,
    options: FormOptions,
}

impl<C: SchemaConverter> FormStore<C> {
    /// Mount a form: merge schema defaults into `value` and run the init action.
    ///
    /// # Errors
    ///
    /// Returns schema converter failures.
    pub fn mount(
        reducer: Reducer<C>,
        base_model: Value,
        value: Option<Value>,
        options: FormOptions,
    ) -> Result<Self> {
        let _span = info_span!("mount").entered();
        let value = value.unwrap_or(Value::Null);
        let value = if options.apply_defaults {
            let derived = reducer.converter().convert(&base_model, &value)?;
            apply_defaults(&derived, &value)
        } else {
            value
        };
        let prior = InitialState::default()
            .with_base_model(base_model)
            .with_value(clean(&value));
        let state = reducer.reduce(&reducer.initial_state(), Action::init(Some(prior)))?;
        let mut store = Self {
            reducer,
            state,
            options,
        };
        if store.options.validate_on_change {
            store.revalidate()?;
        }
        Ok(store)
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn reducer(&self) -> &Reducer<C> {
        &self.reducer
    }

    pub fn into_state(self) -> FormState {
        self.state
    }

    /// Apply `action` and return the new state.
    ///
    /// # Errors
    ///
    /// Returns schema converter failures; the previous state is kept.
    pub fn dispatch(&mut self, action: Action) -> Result<&FormState> {
        let kind = action.kind();
        self.state = self.reducer.reduce(&self.state, action)?;
        self.after(kind)?;
        Ok(&self.state)
    }

    /// Apply an untyped action. One that parses behaves exactly like
    /// [`FormStore::dispatch`]; anything else is logged by the reducer and
    /// leaves the state unchanged.
    ///
    /// # Errors
    ///
    /// Returns schema converter failures; the previous state is kept.
    pub fn dispatch_raw(&mut self, action: &Value) -> Result<&FormState> {
        match Action::from_json(action) {
            Ok(action) => self.dispatch(action),
            Err(_) => {
                self.state = self.reducer.reduce_raw(&self.state, action)?;
                Ok(&self.state)
            }
        }
    }

    /// Validate the current value against the derived model and record the outcome.
    ///
    /// # Errors
    ///
    /// Returns schema converter failures.
    pub fn revalidate(&mut self) -> Result<&FormState> {
        let validation = validate(&self.state.model, &self.state.value.to_json());
        self.state = self.reducer.reduce(&self.state, validation.into_action())?;
        Ok(&self.state)
    }

    fn after(&mut self, kind: ActionKind) -> Result<()> {
        if self.options.validate_on_change && kind != ActionKind::ValidationResolved {
            debug!(action = %kind, "revalidating");
            self.revalidate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunsen_model::{BunsenId, ValidationIssue, ValidationResult};
    use serde_json::json;

    use crate::convert::ConditionalConverter;

    fn model() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "country": {"type": "string", "default": "US"}
            },
            "required": ["name"]
        })
    }

    #[test]
    fn mount_applies_defaults() {
        let store = FormStore::mount(
            Reducer::new(ConditionalConverter),
            model(),
            None,
            FormOptions::default(),
        )
        .unwrap();
        assert_eq!(store.state().value.to_json(), json!({"country": "US"}));
        assert_eq!(*store.state().base_model, model());
        assert!(store.state().validation_result.is_valid());
    }

    #[test]
    fn validate_on_change_records_outcome() {
        let options = FormOptions::default().with_validate_on_change(true);
        let mut store =
            FormStore::mount(Reducer::new(ConditionalConverter), model(), None, options).unwrap();
        assert!(store.state().validation_result.has_errors());

        let name = BunsenId::new("name").unwrap();
        let state = store
            .dispatch(Action::change_value(name, json!("Ada")))
            .unwrap();
        assert!(state.validation_result.is_valid());
        assert!(state.errors.is_empty());
    }

    #[test]
    fn raw_and_typed_dispatch_revalidate_alike() {
        let options = FormOptions::default().with_validate_on_change(true);
        let stale = || {
            let mut store = FormStore::mount(
                Reducer::new(ConditionalConverter),
                model(),
                Some(json!({"name": "Ada"})),
                options.clone(),
            )
            .unwrap();
            let result = ValidationResult {
                warnings: vec![],
                errors: vec![ValidationIssue::required("name", "Field is required.")],
            };
            let errors = [("name".to_string(), json!(["Field is required."]))]
                .into_iter()
                .collect();
            store
                .dispatch(Action::validation_resolved(result, errors))
                .unwrap();
            assert!(store.state().validation_result.has_errors());
            store
        };

        let mut typed = stale();
        typed
            .dispatch(Action::change_value(BunsenId::new("name").unwrap(), json!("Ada")))
            .unwrap();
        let mut raw = stale();
        raw.dispatch_raw(&json!({"type": "CHANGE_VALUE", "bunsenId": "name", "value": "Ada"}))
            .unwrap();

        assert_eq!(raw.state(), typed.state());
        assert!(raw.state().validation_result.is_valid());
        assert!(raw.state().errors.is_empty());
    }

    #[test]
    fn unknown_raw_action_keeps_state() {
        let mut store = FormStore::mount(
            Reducer::new(ConditionalConverter),
            model(),
            Some(json!({"name": "Ada"})),
            FormOptions::default().with_apply_defaults(false),
        )
        .unwrap();
        let before = store.state().clone();
        let after = store.dispatch_raw(&json!({"type": "UNKNOWN_ACTION"})).unwrap();
        assert_eq!(*after, before);
    }
}
