//! Property test strategies for slicekit fixtures
//!
//! Ids are drawn from a small pool so generated operation sequences collide
//! often enough to exercise add-if-absent, upsert and update paths.

use crate::fixtures::{Counter, Todo};
use proptest::prelude::*;
use serde_json::{json, Value};
use slicekit::{Action, EntityAction, EntityActions, StateStatus, Update};

// Re-export proptest for convenience
pub use proptest;

/// Strategy for ids from a pool of six.
pub fn arb_todo_id() -> impl Strategy<Value = String> {
    (0u8..6).prop_map(|n| format!("t{n}"))
}

/// Strategy for todos with pooled ids.
pub fn arb_todo() -> impl Strategy<Value = Todo> {
    (arb_todo_id(), "[a-z]{1,8}", any::<bool>(), 0u8..5).prop_map(|(id, title, done, priority)| {
        Todo {
            id,
            title,
            done,
            priority,
        }
    })
}

/// Strategy for short todo lists.
pub fn arb_todos() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::vec(arb_todo(), 0..6)
}

/// Strategy for counters.
pub fn arb_counter() -> impl Strategy<Value = Counter> {
    any::<i64>().prop_map(|count| Counter { count })
}

/// Strategy for lifecycle statuses.
pub fn arb_status() -> impl Strategy<Value = StateStatus> {
    prop_oneof![
        Just(StateStatus::Idle),
        Just(StateStatus::Loading),
        Just(StateStatus::Ready),
        Just(StateStatus::Error),
    ]
}

/// A generated todo slice operation.
#[derive(Debug, Clone)]
pub enum TodoOp {
    /// `addOne`
    Add(Todo),
    /// `addMany`
    AddMany(Vec<Todo>),
    /// `upsertOne`
    Upsert(Todo),
    /// `updateOne` with new title and priority
    Update(String, String, u8),
    /// `removeOne`
    Remove(String),
    /// `removeMany`
    RemoveMany(Vec<String>),
    /// `hydrateMany`
    Hydrate(Vec<Todo>),
    /// `hydrateAll`
    HydrateAll(Vec<Todo>),
    /// `setAll`
    SetAll(Vec<Todo>),
    /// `removeAll`
    RemoveAll,
    /// `setStatus`
    SetStatus(StateStatus),
}

impl TodoOp {
    /// Build the action for this operation.
    pub fn to_action(&self, actions: &EntityActions<String, Todo>) -> Action<EntityAction<String, Todo>> {
        match self {
            Self::Add(todo) => actions.add_one(todo.clone()),
            Self::AddMany(todos) => actions.add_many(todos.clone()),
            Self::Upsert(todo) => actions.upsert_one(todo.clone()),
            Self::Update(id, title, priority) => actions.update_one(Update::new(
                id.clone(),
                json!({"title": title, "priority": priority}),
            )),
            Self::Remove(id) => actions.remove_one(id.clone()),
            Self::RemoveMany(ids) => actions.remove_many(ids.clone()),
            Self::Hydrate(todos) => actions.hydrate_many(todos.clone()),
            Self::HydrateAll(todos) => actions.hydrate_all(todos.clone()),
            Self::SetAll(todos) => actions.set_all(todos.clone()),
            Self::RemoveAll => actions.remove_all(),
            Self::SetStatus(status) => actions.set_status(*status),
        }
    }

    /// Whether this operation belongs to the hydrate family.
    pub fn is_hydrate(&self) -> bool {
        matches!(self, Self::Hydrate(_) | Self::HydrateAll(_))
    }

    /// Whether this operation changes the envelope status only.
    pub fn is_status_only(&self) -> bool {
        matches!(self, Self::SetStatus(_))
    }
}

/// Strategy for single todo operations.
pub fn arb_todo_op() -> impl Strategy<Value = TodoOp> {
    prop_oneof![
        4 => arb_todo().prop_map(TodoOp::Add),
        1 => arb_todos().prop_map(TodoOp::AddMany),
        3 => arb_todo().prop_map(TodoOp::Upsert),
        3 => (arb_todo_id(), "[a-z]{1,8}", 0u8..5).prop_map(|(id, title, p)| TodoOp::Update(id, title, p)),
        2 => arb_todo_id().prop_map(TodoOp::Remove),
        1 => prop::collection::vec(arb_todo_id(), 0..4).prop_map(TodoOp::RemoveMany),
        1 => arb_todos().prop_map(TodoOp::Hydrate),
        1 => arb_todos().prop_map(TodoOp::HydrateAll),
        1 => arb_todos().prop_map(TodoOp::SetAll),
        1 => Just(TodoOp::RemoveAll),
        1 => arb_status().prop_map(TodoOp::SetStatus),
    ]
}

/// Strategy for operation sequences.
pub fn arb_todo_ops() -> impl Strategy<Value = Vec<TodoOp>> {
    prop::collection::vec(arb_todo_op(), 0..24)
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::from),
            prop::collection::btree_map("[a-c]", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for JSON objects whose values nest objects, arrays, scalars and
/// `null`.
pub fn arb_json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-c]", arb_json(), 0..4)
        .prop_map(|map| Value::Object(map.into_iter().collect()))
}
