//! Integration tests for form-state transitions.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

use bunsen_core::{
    ConditionalConverter, FormState, IdentityConverter, Reducer, SchemaConverter, clean,
};
use bunsen_model::{Action, BunsenId, InitialState, ValidationIssue, ValidationResult};

fn id(path: &str) -> BunsenId {
    BunsenId::new(path).unwrap()
}

fn tag_model() -> Value {
    json!({
        "type": "object",
        "properties": {
            "tagType": {"type": "string"},
            "tag": {
                "type": "string",
                "conditions": [{"if": [{"tagType": {"equals": "custom"}}]}]
            }
        }
    })
}

fn mounted(model: Value, value: Value) -> (Reducer<ConditionalConverter>, FormState) {
    let reducer = Reducer::new(ConditionalConverter);
    let prior = InitialState::default()
        .with_base_model(model)
        .with_value(value);
    let state = reducer
        .reduce(&reducer.initial_state(), Action::init(Some(prior)))
        .unwrap();
    (reducer, state)
}

#[test]
fn init_without_prior_state_uses_defaults() {
    let reducer = Reducer::new(ConditionalConverter);
    let state = reducer
        .reduce(&FormState::default(), Action::init(None))
        .unwrap();
    assert_eq!(state.value.to_json(), json!({}));
    assert_eq!(*state.model, json!({}));
    assert_eq!(*state.base_model, json!({}));
    assert!(state.errors.is_empty());
    assert!(state.validation_result.is_valid());
}

#[test]
fn init_derives_model_from_prior_base_model() {
    let (_, state) = mounted(tag_model(), json!({"tagType": "custom"}));
    assert!(state.model["properties"].get("tag").is_some());
    assert!(state.base_model["properties"]["tag"].get("conditions").is_some());
}

#[test]
fn init_does_not_touch_supplied_state() {
    let prior = InitialState::default()
        .with_base_model(tag_model())
        .with_value(json!({"tagType": "custom"}));
    let snapshot = prior.clone();
    let reducer = Reducer::new(ConditionalConverter);
    reducer
        .reduce(&reducer.initial_state(), Action::init(Some(prior.clone())))
        .unwrap();
    assert_eq!(prior, snapshot);
    assert_eq!(prior.model, None);
}

#[test]
fn root_replacement_with_empty_object() {
    let (reducer, state) = mounted(tag_model(), json!({"tagType": "custom", "tag": "x"}));
    let next = reducer
        .reduce(&state, Action::replace_value(json!({})))
        .unwrap();
    assert_eq!(next.value.to_json(), json!({}));
    let expected = ConditionalConverter.convert(&tag_model(), &json!({})).unwrap();
    assert_eq!(*next.model, expected);
}

#[test]
fn empty_string_removes_key() {
    let (reducer, state) = mounted(tag_model(), json!({"name": "x", "tagType": "a"}));
    let next = reducer
        .reduce(&state, Action::change_value(id("name"), json!("")))
        .unwrap();
    assert_eq!(next.value.to_json(), json!({"tagType": "a"}));
    assert!(next.value.get(&id("name")).is_none());
}

#[test]
fn set_then_remove_round_trips() {
    let (reducer, state) = mounted(tag_model(), json!({"tagType": "a"}));
    let set = reducer
        .reduce(&state, Action::change_value(id("extra.note"), json!("hi")))
        .unwrap();
    let removed = reducer
        .reduce(&set, Action::change_value(id("extra.note"), Value::Null))
        .unwrap();
    assert_eq!(removed.value.get(&id("extra.note")), None);
    assert_eq!(removed.value, state.value);

    let cleared = reducer
        .reduce(&state, Action::change_value(id("tagType"), json!([])))
        .unwrap();
    let restored = reducer
        .reduce(&cleared, Action::change_value(id("tagType"), json!("a")))
        .unwrap();
    assert_eq!(restored.value, state.value);
}

#[test]
fn huge_array_index_is_stored_as_key() {
    let reducer = Reducer::new(IdentityConverter);
    let path = format!("a.{}", usize::MAX);
    let state = reducer
        .reduce_raw(
            &reducer.initial_state(),
            &json!({"type": "CHANGE_VALUE", "bunsenId": path.as_str(), "value": 1}),
        )
        .unwrap();
    assert_eq!(state.value.get(&id(&path)), Some(json!(1)));

    let state = reducer
        .reduce_raw(
            &state,
            &json!({"type": "CHANGE_VALUE", "bunsenId": "b.10000000000", "value": 2}),
        )
        .unwrap();
    assert_eq!(state.value.get(&id("b.10000000000")), Some(json!(2)));
}

#[test]
fn array_writes_never_pad_with_nulls() {
    let reducer = Reducer::new(IdentityConverter);
    let state = reducer
        .reduce(
            &reducer.initial_state(),
            Action::change_value(id("phones.2"), json!("555")),
        )
        .unwrap();
    assert_eq!(state.value.to_json(), json!({"phones": {"2": "555"}}));

    let state = reducer
        .reduce(
            &reducer.initial_state(),
            Action::change_value(id("phones.0"), json!("555")),
        )
        .unwrap();
    let state = reducer
        .reduce(&state, Action::change_value(id("phones.1"), json!("556")))
        .unwrap();
    assert_eq!(state.value.to_json(), json!({"phones": ["555", "556"]}));
}

#[test]
fn removing_last_item_drops_the_array() {
    let (reducer, state) = mounted(tag_model(), json!({"tags": ["a"], "tagType": "x"}));
    let next = reducer
        .reduce(&state, Action::change_value(id("tags.0"), Value::Null))
        .unwrap();
    assert_eq!(next.value.to_json(), json!({"tagType": "x"}));

    let (reducer, state) = mounted(tag_model(), json!({"address": {"street": "Main St"}}));
    let next = reducer
        .reduce(&state, Action::change_value(id("address.street"), json!("")))
        .unwrap();
    assert_eq!(next.value.to_json(), json!({}));
}

#[test]
fn container_values_are_cleaned_on_write() {
    let (reducer, state) = mounted(tag_model(), json!({"tagType": "x"}));
    let next = reducer
        .reduce(
            &state,
            Action::change_value(id("address"), json!({"street": "", "city": "Leeds", "zip": null})),
        )
        .unwrap();
    assert_eq!(next.value.get(&id("address")), Some(json!({"city": "Leeds"})));

    let next = reducer
        .reduce(&next, Action::change_value(id("address"), json!({"street": null})))
        .unwrap();
    assert_eq!(next.value.to_json(), json!({"tagType": "x"}));
}

#[test]
fn value_change_rederives_model() {
    let (reducer, state) = mounted(tag_model(), json!({}));
    assert!(state.model["properties"].get("tag").is_none());
    let next = reducer
        .reduce(&state, Action::change_value(id("tagType"), json!("custom")))
        .unwrap();
    assert!(next.model["properties"].get("tag").is_some());
    assert!(!Arc::ptr_eq(&state.model, &next.model));

    let again = reducer
        .reduce(&next, Action::change_value(id("tag"), json!("hello")))
        .unwrap();
    assert!(Arc::ptr_eq(&next.model, &again.model));
}

#[test]
fn change_model_then_validation_resolved() {
    let (reducer, state) = mounted(json!({"type": "object"}), json!({"tagType": "custom"}));
    let changed = reducer
        .reduce(&state, Action::change_model(tag_model()))
        .unwrap();
    assert_eq!(*changed.base_model, tag_model());
    assert!(changed.model["properties"].get("tag").is_some());

    let result = ValidationResult {
        warnings: vec![],
        errors: vec![ValidationIssue::required("tag", "Field is required.")],
    };
    let errors = [("tag".to_string(), json!(["Field is required."]))]
        .into_iter()
        .collect();
    let resolved = reducer
        .reduce(&changed, Action::validation_resolved(result.clone(), errors))
        .unwrap();
    assert_eq!(resolved.base_model, changed.base_model);
    assert!(Arc::ptr_eq(&resolved.model, &changed.model));
    assert_eq!(resolved.value, changed.value);
    assert_eq!(resolved.validation_result, result);
    assert_eq!(resolved.errors["tag"], json!(["Field is required."]));
}

#[test]
fn reduce_does_not_mutate_input() {
    let (reducer, state) = mounted(tag_model(), json!({"tagType": "a"}));
    let before = state.clone();
    reducer
        .reduce(&state, Action::change_value(id("tagType"), json!("custom")))
        .unwrap();
    reducer
        .reduce(&state, Action::change_model(json!({"type": "object"})))
        .unwrap();
    assert_eq!(state, before);
}

#[test]
fn root_replacement_cleans_nested_values() {
    let reducer = Reducer::new(IdentityConverter);
    let raw = json!({
        "name": "Ada",
        "address": {"street": "", "city": "London"},
        "phones": [null, {"number": "555"}],
        "count": 0,
        "active": false
    });
    let state = reducer
        .reduce(&reducer.initial_state(), Action::replace_value(raw.clone()))
        .unwrap();
    assert_eq!(state.value.to_json(), clean(&raw));
    assert_eq!(state.value.get(&id("count")), Some(json!(0)));
    assert_eq!(state.value.get(&id("active")), Some(json!(false)));
}

#[test]
fn raw_actions_are_parsed() {
    let (reducer, state) = mounted(tag_model(), json!({}));
    let next = reducer
        .reduce_raw(
            &state,
            &json!({"type": "CHANGE_VALUE", "bunsenId": "tagType", "value": "custom"}),
        )
        .unwrap();
    assert_eq!(next.value.get(&id("tagType")), Some(json!("custom")));
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

struct CaptureGuard(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("capture lock poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = CaptureGuard;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureGuard(Arc::clone(&self.0))
    }
}

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn unknown_action_is_logged_and_passed_through() {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .finish();
    let reducer = Reducer::new(IdentityConverter).with_diagnostics(Dispatch::new(subscriber));
    let state = reducer
        .reduce(
            &reducer.initial_state(),
            Action::change_value(id("name"), json!("Ada")),
        )
        .unwrap();

    let next = reducer
        .reduce_raw(&state, &json!({"type": "UNKNOWN_ACTION"}))
        .unwrap();

    assert_eq!(next, state);
    let logged = capture.contents();
    assert!(logged.contains("ERROR"), "log was: {logged}");
    assert!(logged.contains("Do not recognize action UNKNOWN_ACTION"));
}

#[test]
fn state_snapshot() {
    let reducer = Reducer::new(IdentityConverter);
    let state = reducer
        .reduce(
            &reducer.initial_state(),
            Action::init(Some(
                InitialState::default()
                    .with_base_model(json!({"type": "object"}))
                    .with_value(json!({"name": "Ada"})),
            )),
        )
        .unwrap();
    insta::assert_json_snapshot!(state.to_json(), @r###"
    {
      "baseModel": {
        "type": "object"
      },
      "errors": {},
      "model": {
        "type": "object"
      },
      "validationResult": {
        "errors": [],
        "warnings": []
      },
      "value": {
        "name": "Ada"
      }
    }
    "###);
}
