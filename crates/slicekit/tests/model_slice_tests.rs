//! Model slice behaviour through the public API.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use slicekit::{
    make_model_slice, ModelSliceOptions, ModelStateSeed, Reducer, SerializableError, StateStatus,
};
use slicekit_testkit::*;
use std::sync::Arc;

#[test]
fn test_counter_update_then_reset() {
    let clock = ManualClock::at("2024-01-01T12:00:00.000+00:00");
    let (mut store, slices) = app_store(&clock);
    let counter = &slices.counter;

    store.dispatch(counter.actions.update(json!({"count": 5}))).unwrap();
    assert_eq!(store.select(&counter.selectors.select_model), Counter { count: 5 });
    assert!(store.select(&counter.selectors.select_last_modified).is_some());

    store.dispatch(counter.actions.reset()).unwrap();
    assert_eq!(store.select(&counter.selectors.select_model), Counter { count: 0 });
    assert_eq!(store.select(&counter.selectors.select_last_modified), None);
    assert_eq!(store.select(&counter.selectors.select_last_hydrated), None);
}

#[test]
fn test_update_deep_merges_nested_objects() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let profile = &slices.profile;

    store
        .dispatch(profile.actions.update(json!({
            "preferences": {"notifications": {"push": true}}
        })))
        .unwrap();

    let model = store.select(&profile.selectors.select_model);
    assert_eq!(model.name, "ada");
    assert_eq!(model.preferences.theme, "light");
    assert!(model.preferences.notifications.email);
    assert!(model.preferences.notifications.push);
}

#[test]
fn test_update_replaces_arrays_wholesale() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let profile = &slices.profile;

    store
        .dispatch(profile.actions.update(json!({"tags": ["guest"]})))
        .unwrap();
    assert_eq!(
        store.select(&profile.selectors.select_model).tags,
        vec!["guest".to_string()]
    );
}

#[test]
fn test_update_with_typed_partial_skips_none() {
    #[derive(serde::Serialize)]
    struct ProfilePatch {
        name: Option<String>,
        tags: Option<Vec<String>>,
    }

    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let profile = &slices.profile;

    let action = profile
        .actions
        .update_with(&ProfilePatch {
            name: Some("grace".into()),
            tags: None,
        })
        .unwrap();
    store.dispatch(action).unwrap();

    let model = store.select(&profile.selectors.select_model);
    assert_eq!(model.name, "grace");
    assert_eq!(model.tags, sample_profile().tags);
}

#[test]
fn test_hydrate_then_modify_alternates_stamps() {
    let clock = ManualClock::at("2024-01-01T00:00:00.000+05:30");
    let (mut store, slices) = app_store(&clock);
    let counter = &slices.counter;

    store.dispatch(counter.actions.hydrate(Counter { count: 9 })).unwrap();
    let hydrated = store.select(&counter.selectors.select_last_hydrated).unwrap();
    assert_eq!(hydrated.as_str(), "2024-01-01T00:00:00.000+05:30");
    assert_eq!(store.select(&counter.selectors.select_last_modified), None);

    clock.advance_secs(60);
    store.dispatch(counter.actions.set(Counter { count: 1 })).unwrap();
    let modified = store.select(&counter.selectors.select_last_modified).unwrap();
    assert_eq!(modified.as_str(), "2024-01-01T00:01:00.000+05:30");
    assert_eq!(store.select(&counter.selectors.select_last_hydrated), None);

    clock.advance_secs(60);
    store.dispatch(counter.actions.hydrate(Counter { count: 2 })).unwrap();
    assert_eq!(store.select(&counter.selectors.select_last_modified), None);
    assert_eq!(
        store
            .select(&counter.selectors.select_last_hydrated)
            .unwrap()
            .as_str(),
        "2024-01-01T00:02:00.000+05:30"
    );
}

#[test]
fn test_status_and_error_are_exposed_verbatim() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let counter = &slices.counter;
    let error = SerializableError::new("FetchError", "503").with_stack("caused by: upstream");

    store.dispatch(counter.actions.set_status(StateStatus::Error)).unwrap();
    store.dispatch(counter.actions.set_error(Some(error.clone()))).unwrap();

    assert_eq!(store.select(&counter.selectors.select_status), StateStatus::Error);
    assert_eq!(store.select(&counter.selectors.select_error), Some(error));
    assert_eq!(store.select(&counter.selectors.select_last_modified), None);
    assert_eq!(store.select(&counter.selectors.select_last_hydrated), None);

    store.dispatch(counter.actions.set_error(None)).unwrap();
    assert_eq!(store.select(&counter.selectors.select_error), None);
}

#[test]
fn test_reset_restores_non_trivial_seed() {
    let clock = ManualClock::epoch();
    let seeded = ModelStateSeed::with_model(Counter { count: 42 }).status(StateStatus::Ready);
    let counter = make_model_slice(
        "counter",
        select_counter,
        ModelSliceOptions::default()
            .with_clock(clock.clone())
            .with_initial_state(seeded),
    );

    let state = counter.reducer.initial_state();
    let state = counter.reducer.reduce(&state, &counter.actions.set(Counter { count: 1 }));
    let state = counter
        .reducer
        .reduce(&state, &counter.actions.set_status(StateStatus::Loading));
    let state = counter.reducer.reduce(&state, &counter.actions.reset());

    assert!(Arc::ptr_eq(&state, &counter.reducer.initial_state()));
    assert_eq!(state.model.count, 42);
    assert_eq!(state.meta.status, StateStatus::Ready);
}

#[test]
fn test_selectors_recompute_only_for_their_slice() {
    let clock = ManualClock::epoch();
    let (mut store, slices) = app_store(&clock);
    let select_model = &slices.counter.selectors.select_model;

    store.select(select_model);
    store.dispatch(slices.todos.actions.add_one(todo("1", "a"))).unwrap();
    store.select(select_model);
    assert_eq!(select_model.recomputations(), 1);

    store.dispatch(slices.counter.actions.set(Counter { count: 3 })).unwrap();
    store.select(select_model);
    assert_eq!(select_model.recomputations(), 2);
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
struct Account {
    handle: String,
    nickname: Option<String>,
}

struct AccountGlobal {
    account: Arc<slicekit::ModelState<Account>>,
}

fn select_account(state: &AccountGlobal) -> &Arc<slicekit::ModelState<Account>> {
    &state.account
}

fn account_mut(state: &mut AccountGlobal) -> &mut Arc<slicekit::ModelState<Account>> {
    &mut state.account
}

fn account_slice(name: &str, clock: &ManualClock) -> slicekit::ModelSlice<AccountGlobal, Account> {
    make_model_slice(
        name,
        select_account,
        ModelSliceOptions::default()
            .with_clock(clock.clone())
            .with_initial_state(ModelStateSeed::with_model(Account {
                handle: "ada".into(),
                nickname: Some("countess".into()),
            })),
    )
}

#[test]
fn test_update_with_null_clears_optional_field() {
    let clock = ManualClock::epoch();
    let account = account_slice("account", &clock);

    let state = account.reducer.initial_state();
    let state = account
        .reducer
        .reduce(&state, &account.actions.update(json!({"nickname": null})));

    assert_eq!(state.model.nickname, None);
    assert_eq!(state.model.handle, "ada");
    assert!(state.meta.last_modified.is_some());
}

#[test]
fn test_update_with_typed_none_keeps_optional_field() {
    #[derive(serde::Serialize)]
    struct AccountPatch {
        handle: Option<String>,
        nickname: Option<String>,
    }

    let clock = ManualClock::epoch();
    let account = account_slice("account", &clock);

    let action = account
        .actions
        .update_with(&AccountPatch {
            handle: Some("grace".into()),
            nickname: None,
        })
        .unwrap();
    let state = account.reducer.reduce(&account.reducer.initial_state(), &action);

    assert_eq!(state.model.handle, "grace");
    assert_eq!(state.model.nickname.as_deref(), Some("countess"));
}

#[test]
fn test_nested_slice_name_reduces_and_routes() {
    let clock = ManualClock::epoch();
    let account = account_slice("features/account", &clock);
    let set = account.actions.set(Account {
        handle: "lin".into(),
        nickname: None,
    });
    assert_eq!(set.action_type, "features/account/set");

    let state = account.reducer.reduce(&account.reducer.initial_state(), &set);
    assert_eq!(state.model.handle, "lin");

    let mut store = slicekit::Store::new(AccountGlobal {
        account: account.reducer.initial_state(),
    });
    store.register(account_mut, account.reducer.clone()).unwrap();
    store.dispatch(set).unwrap();
    store
        .dispatch(account.actions.update(json!({"nickname": "lin"})))
        .unwrap();

    let model = store.select(&account.selectors.select_model);
    assert_eq!(model.handle, "lin");
    assert_eq!(model.nickname.as_deref(), Some("lin"));
    assert_eq!(store.dispatched(), 2);
}
