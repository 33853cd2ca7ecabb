//! Application fixtures
//!
//! A small application state with two model slices and one entity slice,
//! wired the way an application would wire them.

use crate::clock::ManualClock;
use serde::{Deserialize, Serialize};
use slicekit::{
    create_entity_slice, make_model_slice, CreateEntitySliceOptions, EntitySlice, EntityState,
    ModelSlice, ModelSliceOptions, ModelState, ModelStateSeed, Reducer, Store,
};
use std::sync::Arc;

/// Single-number model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// Current count
    pub count: i64,
}

/// Nested model exercising deep merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name
    pub name: String,
    /// Nested preferences
    pub preferences: Preferences,
    /// Free-form tags
    pub tags: Vec<String>,
}

/// Second level of [`Profile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// UI theme
    pub theme: String,
    /// Third level
    pub notifications: Notifications,
}

/// Third level of [`Profile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    /// Email notifications on
    pub email: bool,
    /// Push notifications on
    pub push: bool,
}

/// Entity fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Completed
    pub done: bool,
    /// Sort key for sorted slices
    pub priority: u8,
}

/// Build a todo with priority 0.
pub fn todo(id: &str, title: &str) -> Todo {
    Todo {
        id: id.to_string(),
        title: title.to_string(),
        done: false,
        priority: 0,
    }
}

/// Build a todo with an explicit priority.
pub fn todo_with_priority(id: &str, priority: u8) -> Todo {
    Todo {
        priority,
        ..todo(id, id)
    }
}

/// Counter slice state
pub type CounterState = ModelState<Counter>;
/// Profile slice state
pub type ProfileState = ModelState<Profile>;
/// Todo slice state
pub type TodoState = EntityState<String, Todo>;

/// Global application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// `counter` slice
    pub counter: Arc<CounterState>,
    /// `profile` slice
    pub profile: Arc<ProfileState>,
    /// `todos` slice
    pub todos: Arc<TodoState>,
}

/// Projection to the `counter` slice.
pub fn select_counter(state: &AppState) -> &Arc<CounterState> {
    &state.counter
}

/// Lens into the `counter` slice.
pub fn counter_mut(state: &mut AppState) -> &mut Arc<CounterState> {
    &mut state.counter
}

/// Projection to the `profile` slice.
pub fn select_profile(state: &AppState) -> &Arc<ProfileState> {
    &state.profile
}

/// Lens into the `profile` slice.
pub fn profile_mut(state: &mut AppState) -> &mut Arc<ProfileState> {
    &mut state.profile
}

/// Projection to the `todos` slice.
pub fn select_todos(state: &AppState) -> &Arc<TodoState> {
    &state.todos
}

/// Lens into the `todos` slice.
pub fn todos_mut(state: &mut AppState) -> &mut Arc<TodoState> {
    &mut state.todos
}

/// Every slice of [`AppState`].
pub struct AppSlices {
    /// `counter`, seeded with `{count: 0}`
    pub counter: ModelSlice<AppState, Counter>,
    /// `profile`, seeded with a populated profile
    pub profile: ModelSlice<AppState, Profile>,
    /// `todos`, insertion ordered
    pub todos: EntitySlice<AppState, String, Todo>,
}

impl AppSlices {
    /// Global state assembled from each slice's initial state.
    pub fn initial_state(&self) -> AppState {
        AppState {
            counter: self.counter.reducer.initial_state(),
            profile: self.profile.reducer.initial_state(),
            todos: self.todos.reducer.initial_state(),
        }
    }
}

/// A profile with every level populated.
pub fn sample_profile() -> Profile {
    Profile {
        name: "ada".to_string(),
        preferences: Preferences {
            theme: "light".to_string(),
            notifications: Notifications {
                email: true,
                push: false,
            },
        },
        tags: vec!["admin".to_string(), "beta".to_string()],
    }
}

/// Todo slice options with the fixture projection and id selector.
pub fn todo_options(clock: &ManualClock) -> CreateEntitySliceOptions<AppState, String, Todo> {
    CreateEntitySliceOptions::new("todos", select_todos, |t: &Todo| t.id.clone())
        .with_clock(clock.clone())
}

/// Insertion-ordered todo slice.
pub fn todo_slice(clock: &ManualClock) -> EntitySlice<AppState, String, Todo> {
    create_entity_slice(todo_options(clock))
}

/// Todo slice kept sorted by priority.
pub fn sorted_todo_slice(clock: &ManualClock) -> EntitySlice<AppState, String, Todo> {
    create_entity_slice(
        todo_options(clock).sorted_by(|a: &Todo, b: &Todo| a.priority.cmp(&b.priority)),
    )
}

/// Build every fixture slice on `clock`.
pub fn app_slices(clock: &ManualClock) -> AppSlices {
    AppSlices {
        counter: make_model_slice(
            "counter",
            select_counter,
            ModelSliceOptions::default()
                .with_clock(clock.clone())
                .with_initial_state(ModelStateSeed::with_model(Counter { count: 0 })),
        ),
        profile: make_model_slice(
            "profile",
            select_profile,
            ModelSliceOptions::default()
                .with_clock(clock.clone())
                .with_initial_state(ModelStateSeed::with_model(sample_profile())),
        ),
        todos: todo_slice(clock),
    }
}

/// A store with every fixture slice registered.
pub fn app_store(clock: &ManualClock) -> (Store<AppState>, AppSlices) {
    let slices = app_slices(clock);
    let mut store = Store::new(slices.initial_state());
    store
        .register(counter_mut, slices.counter.reducer.clone())
        .expect("counter registers");
    store
        .register(profile_mut, slices.profile.reducer.clone())
        .expect("profile registers");
    store
        .register(todos_mut, slices.todos.reducer.clone())
        .expect("todos registers");
    (store, slices)
}
