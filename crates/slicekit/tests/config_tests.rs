//! Slices built from TOML configuration.

#![allow(clippy::unwrap_used)]

use slicekit::{
    create_entity_slice, make_model_slice, EntityStateSeed, ModelStateSeed, Reducer, SliceConfig,
    SliceKind, StateStatus,
};
use slicekit_testkit::*;

const COUNTER_TOML: &str = r#"
name = "counter"
debug = true

[initialState]
status = "ready"
model = { count = 3 }
"#;

const TODOS_TOML: &str = r#"
name = "todos"

[initialState]
status = "loading"
entities = [
    { id = "b", title = "second", done = false, priority = 2 },
    { id = "a", title = "first", done = true, priority = 1 },
]
"#;

#[test]
fn test_model_slice_from_config() {
    let clock = ManualClock::epoch();
    let sink = RecordingSink::new();
    let config: SliceConfig<ModelStateSeed<Counter>> =
        SliceConfig::from_toml_str(COUNTER_TOML).unwrap();

    let (name, options) = config.into_model_options();
    let counter = make_model_slice(
        &name,
        select_counter,
        options.with_clock(clock).with_sink(sink.clone()),
    );

    let initial = counter.reducer.initial_state();
    assert_eq!(counter.name, "counter");
    assert_eq!(initial.model, Counter { count: 3 });
    assert_eq!(initial.meta.status, StateStatus::Ready);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.snapshots()[0].kind, SliceKind::Model);
}

#[test]
fn test_config_matches_equivalent_seed() {
    let config: SliceConfig<ModelStateSeed<Counter>> =
        SliceConfig::from_toml_str(COUNTER_TOML).unwrap();
    let seed = ModelStateSeed::with_model(Counter { count: 3 }).status(StateStatus::Ready);
    assert_eq!(config.initial_state, seed);
}

#[test]
fn test_entity_slice_from_config() {
    let clock = ManualClock::epoch();
    let config: SliceConfig<EntityStateSeed<Todo>> =
        SliceConfig::from_toml_str(TODOS_TOML).unwrap();

    let todos = create_entity_slice(
        config
            .into_entity_options(select_todos, |t: &Todo| t.id.clone())
            .sorted_by(|a: &Todo, b: &Todo| a.priority.cmp(&b.priority))
            .with_clock(clock),
    );

    let initial = todos.reducer.initial_state();
    assert_eq!(initial.ids(), ["a".to_string(), "b".to_string()]);
    assert_eq!(initial.meta.status, StateStatus::Loading);
    assert!(initial.entities()["a"].done);
}
