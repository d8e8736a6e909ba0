//! Input loading and action replay for the CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{info, info_span, warn};

use bunsen_core::{
    ConditionalConverter, FormState, FormStore, Reducer, RendererRegistry, SchemaConverter,
    Validation, clean, validate,
};
use bunsen_model::{Action, FormOptions};

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

/// Accept either a single action object or an array of them.
pub fn action_list(actions: Value) -> Result<Vec<Value>> {
    match actions {
        Value::Array(items) => Ok(items),
        action @ Value::Object(_) => Ok(vec![action]),
        other => bail!("actions must be an object or an array, got {other}"),
    }
}

/// Outcome of replaying a sequence of actions against a freshly mounted form.
#[derive(Debug)]
pub struct Replay {
    pub state: FormState,
    /// Actions that parsed and went through the reducer.
    pub applied: usize,
    /// Actions with an unknown `type` or a malformed payload; they were logged
    /// and left the state as it was.
    pub skipped: usize,
}

/// Mount `model` with `initial` and dispatch every action in order.
pub fn replay(
    model: Value,
    initial: Option<Value>,
    actions: &[Value],
    options: FormOptions,
) -> Result<Replay> {
    let _span = info_span!("replay", actions = actions.len()).entered();
    let mut store = FormStore::mount(Reducer::new(ConditionalConverter), model, initial, options)
        .context("mount form")?;
    let mut applied = 0;
    let mut skipped = 0;
    for (index, action) in actions.iter().enumerate() {
        let parsed = Action::from_json(action).is_ok();
        store
            .dispatch_raw(action)
            .with_context(|| format!("apply action {index}"))?;
        if parsed {
            applied += 1;
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        warn!(skipped, "some actions were skipped");
    }
    info!(applied, "replay finished");
    Ok(Replay {
        state: store.into_state(),
        applied,
        skipped,
    })
}

/// Validate `value` (cleaned) against the model derived for it.
pub fn validate_value(model: &Value, value: &Value) -> Result<Validation> {
    let value = clean(value);
    let derived = ConditionalConverter
        .convert(model, &value)
        .context("derive model")?;
    Ok(validate(&derived, &value))
}

/// The builtin registry with `extra` entries layered on top.
pub fn registry_with(extra: Option<Value>) -> Result<RendererRegistry> {
    let mut registry = RendererRegistry::builtin();
    if let Some(extra) = extra {
        let extra: RendererRegistry =
            serde_json::from_value(extra).context("registry must map names to widget strings")?;
        for (key, widget) in extra.iter() {
            registry.insert(key, widget);
        }
    }
    Ok(registry)
}
