//! Entity slice behaviour through the public API.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use slicekit::{create_entity_slice, EntityStateSeed, Reducer, StateStatus, Update};
use slicekit_testkit::*;
use std::sync::Arc;

fn ids(store: &slicekit::Store<AppState>, slices: &AppSlices) -> Vec<String> {
    store.select(&slices.todos.selectors.select_ids).to_vec()
}

#[test]
fn test_add_then_upsert_scenario() {
    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Named {
        id: String,
        name: String,
    }

    struct Global {
        named: Arc<slicekit::EntityState<String, Named>>,
    }

    fn select_named(state: &Global) -> &Arc<slicekit::EntityState<String, Named>> {
        &state.named
    }

    let clock = ManualClock::epoch();
    let slice = create_entity_slice(
        slicekit::CreateEntitySliceOptions::new("named", select_named, |n: &Named| n.id.clone())
            .with_clock(clock),
    );
    let a = &slice.actions;

    let state = slice.reducer.initial_state();
    let state = slice.reducer.reduce(
        &state,
        &a.add_one(Named {
            id: "1".into(),
            name: "a".into(),
        }),
    );
    let state = slice.reducer.reduce(
        &state,
        &a.upsert_one(Named {
            id: "1".into(),
            name: "b".into(),
        }),
    );
    let global = Global { named: state };

    assert_eq!(
        *slice.selectors.select_all.select(&global),
        vec![Named {
            id: "1".into(),
            name: "b".into()
        }]
    );
    assert!(slice.selectors.select_last_modified.select(&global).is_some());
    assert!(slice.selectors.select_last_hydrated.select(&global).is_none());
}

#[test]
fn test_insertion_order_without_comparer() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store.dispatch(a.add_one(todo("b", "second"))).unwrap();
    store.dispatch(a.add_one(todo("a", "first"))).unwrap();
    assert_eq!(ids(&store, &slices), vec!["b", "a"]);
}

#[test]
fn test_comparer_keeps_ids_sorted() {
    let clock = ManualClock::epoch();
    let slice = sorted_todo_slice(&clock);
    let a = &slice.actions;

    let state = slice.reducer.initial_state();
    let state = slice.reducer.reduce(&state, &a.add_one(todo_with_priority("x", 3)));
    let state = slice.reducer.reduce(&state, &a.add_one(todo_with_priority("y", 1)));
    let state = slice.reducer.reduce(&state, &a.upsert_one(todo_with_priority("z", 2)));
    assert_eq!(state.ids(), ["y", "z", "x"].map(String::from));

    let state = slice.reducer.reduce(
        &state,
        &a.update_one(Update::new("y".into(), json!({"priority": 4}))),
    );
    assert_eq!(state.ids(), ["z", "x", "y"].map(String::from));
}

#[test]
fn test_add_does_not_replace_existing() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store.dispatch(a.add_one(todo("1", "original"))).unwrap();
    store.dispatch(a.add_one(todo("1", "ignored"))).unwrap();
    let stored = slices
        .todos
        .selectors
        .select_by_id
        .select(store.state(), &"1".to_string())
        .unwrap();
    assert_eq!(stored.title, "original");
    assert_eq!(store.select(&slices.todos.selectors.select_total), 1);
}

#[test]
fn test_update_is_shallow_and_keyed() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store
        .dispatch(a.add_many(vec![todo("1", "a"), todo("2", "b")]))
        .unwrap();
    store
        .dispatch(a.update_many(vec![
            Update::new("1".into(), json!({"done": true})),
            Update::new("missing".into(), json!({"done": true})),
        ]))
        .unwrap();

    let entities = store.select(&slices.todos.selectors.select_entities);
    assert!(entities["1"].done);
    assert_eq!(entities["1"].title, "a");
    assert!(!entities["2"].done);
    assert_eq!(entities.len(), 2);
}

#[test]
fn test_update_missing_id_stamps_modified_only() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store.dispatch(a.hydrate_all(vec![todo("1", "a")])).unwrap();
    let before = store.state().todos.collection.clone();
    store
        .dispatch(a.update_one(Update::new("2".into(), json!({"title": "z"}))))
        .unwrap();

    assert_eq!(store.state().todos.collection, before);
    assert!(store.state().todos.meta.last_modified.is_some());
    assert!(store.state().todos.meta.last_hydrated.is_none());
}

#[test]
fn test_remove_variants() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store
        .dispatch(a.add_many(["1", "2", "3", "4"].map(|id| todo(id, id))))
        .unwrap();
    store.dispatch(a.remove_one("2".into())).unwrap();
    store.dispatch(a.remove_one("nope".into())).unwrap();
    assert_eq!(ids(&store, &slices), vec!["1", "3", "4"]);

    store
        .dispatch(a.remove_many(vec!["1".to_string(), "nope".to_string()]))
        .unwrap();
    assert_eq!(ids(&store, &slices), vec!["3", "4"]);
}

#[test]
fn test_remove_all_leaves_status_and_error() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store.dispatch(a.add_one(todo("1", "a"))).unwrap();
    store.dispatch(a.set_status(StateStatus::Ready)).unwrap();
    let failure = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    store.dispatch(a.set_error_from(&failure)).unwrap();
    store.dispatch(a.remove_all()).unwrap();

    let state = &store.state().todos;
    assert!(state.ids().is_empty());
    assert!(state.entities().is_empty());
    assert_eq!(state.meta.status, StateStatus::Ready);
    assert_eq!(state.meta.error.as_ref().unwrap().message, "disk full");
}

#[test]
fn test_hydrate_one_upserts() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store.dispatch(a.add_one(todo("1", "local"))).unwrap();
    store.dispatch(a.hydrate_one(todo("1", "server"))).unwrap();
    store.dispatch(a.hydrate_many(vec![todo("2", "server")])).unwrap();

    let all = store.select(&slices.todos.selectors.select_all);
    assert_eq!(all.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), vec!["server", "server"]);
    assert!(store.state().todos.meta.last_modified.is_none());
}

#[test]
fn test_set_all_is_a_modification() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let a = &slices.todos.actions;

    store.dispatch(a.hydrate_all(vec![todo("1", "a")])).unwrap();
    store.dispatch(a.set_all(vec![todo("9", "z")])).unwrap();

    assert_eq!(ids(&store, &slices), vec!["9"]);
    assert!(store.state().todos.meta.last_modified.is_some());
    assert!(store.state().todos.meta.last_hydrated.is_none());
}

#[test]
fn test_reset_returns_seeded_collection() {
    let clock = ManualClock::epoch();
    let slice = create_entity_slice(
        todo_options(&clock)
            .with_initial_state(EntityStateSeed::with_entities(vec![todo("seed", "s")])),
    );
    let a = &slice.actions;

    let state = slice.reducer.initial_state();
    let state = slice.reducer.reduce(&state, &a.remove_all());
    let state = slice.reducer.reduce(&state, &a.reset());

    assert!(Arc::ptr_eq(&state, &slice.reducer.initial_state()));
    assert_eq!(state.ids(), ["seed".to_string()]);
    assert!(state.meta.last_modified.is_none());
}

#[test]
fn test_select_all_is_memoized_across_unrelated_dispatches() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let select_all = &slices.todos.selectors.select_all;

    store.dispatch(slices.todos.actions.add_one(todo("1", "a"))).unwrap();
    let first = store.select(select_all);
    store.dispatch(slices.counter.actions.set(Counter { count: 1 })).unwrap();
    let second = store.select(select_all);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(select_all.recomputations(), 1);
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Label {
    id: String,
    text: Option<String>,
}

fn label(id: &str, text: Option<&str>) -> Label {
    Label {
        id: id.into(),
        text: text.map(String::from),
    }
}

struct LabelGlobal {
    labels: Arc<slicekit::EntityState<String, Label>>,
}

fn select_labels(state: &LabelGlobal) -> &Arc<slicekit::EntityState<String, Label>> {
    &state.labels
}

fn labels_mut(state: &mut LabelGlobal) -> &mut Arc<slicekit::EntityState<String, Label>> {
    &mut state.labels
}

fn label_slice(name: &str, clock: &ManualClock) -> slicekit::EntitySlice<LabelGlobal, String, Label> {
    create_entity_slice(
        slicekit::CreateEntitySliceOptions::new(name, select_labels, |l: &Label| l.id.clone())
            .with_clock(clock.clone())
            .with_initial_state(EntityStateSeed::with_entities(vec![label("1", Some("red"))])),
    )
}

#[test]
fn test_update_one_with_null_clears_optional_field() {
    let clock = ManualClock::epoch();
    let labels = label_slice("labels", &clock);

    let state = labels.reducer.reduce(
        &labels.reducer.initial_state(),
        &labels
            .actions
            .update_one(Update::new("1".into(), json!({"text": null}))),
    );
    assert_eq!(state.entities()["1"], label("1", None));
}

#[test]
fn test_update_one_with_typed_none_keeps_field() {
    #[derive(serde::Serialize)]
    struct LabelPatch {
        text: Option<String>,
    }

    let clock = ManualClock::epoch();
    let labels = label_slice("labels", &clock);

    let action = labels
        .actions
        .update_one_with("1".into(), &LabelPatch { text: None })
        .unwrap();
    let state = labels.reducer.reduce(&labels.reducer.initial_state(), &action);
    assert_eq!(state.entities()["1"], label("1", Some("red")));
    assert!(state.meta.last_modified.is_some());
}

#[test]
fn test_nested_slice_name_reduces_and_routes() {
    let clock = ManualClock::epoch();
    let labels = label_slice("features/labels", &clock);
    let add = labels.actions.add_one(label("2", None));
    assert_eq!(add.action_type, "features/labels/addOne");

    let state = labels.reducer.reduce(&labels.reducer.initial_state(), &add);
    assert_eq!(state.ids(), ["1".to_string(), "2".to_string()]);

    let mut store = slicekit::Store::new(LabelGlobal {
        labels: labels.reducer.initial_state(),
    });
    store.register(labels_mut, labels.reducer.clone()).unwrap();
    store.dispatch(add).unwrap();
    store.dispatch(labels.actions.remove_one("1".into())).unwrap();

    assert_eq!(*store.select(&labels.selectors.select_ids), vec!["2".to_string()]);
    assert_eq!(store.select(&labels.selectors.select_total), 1);
}

#[test]
fn test_collection_selectors_survive_envelope_writes() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let todos = &slices.todos;

    store.dispatch(todos.actions.add_one(todo("1", "a"))).unwrap();
    let all = store.select(&todos.selectors.select_all);
    let ids_before = store.select(&todos.selectors.select_ids);

    store.dispatch(todos.actions.set_status(StateStatus::Loading)).unwrap();
    store
        .dispatch(todos.actions.set_error_from(&std::fmt::Error))
        .unwrap();

    assert!(Arc::ptr_eq(&all, &store.select(&todos.selectors.select_all)));
    assert!(Arc::ptr_eq(&ids_before, &store.select(&todos.selectors.select_ids)));
    assert_eq!(todos.selectors.select_all.recomputations(), 1);

    store.dispatch(todos.actions.upsert_one(todo("1", "b"))).unwrap();
    assert!(Arc::ptr_eq(&ids_before, &store.select(&todos.selectors.select_ids)));
    assert_eq!(store.select(&todos.selectors.select_all)[0].title, "b");
    assert_eq!(todos.selectors.select_all.recomputations(), 2);
}

#[test]
fn test_batch_creators_accept_keyed_maps() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let keyed: std::collections::HashMap<String, Todo> = ["1", "2"]
        .into_iter()
        .map(|id| (id.to_string(), todo(id, id)))
        .collect();

    store
        .dispatch(slices.todos.actions.upsert_many(keyed.into_values()))
        .unwrap();

    let mut stored = ids(&store, &slices);
    stored.sort();
    assert_eq!(stored, vec!["1".to_string(), "2".to_string()]);
}
