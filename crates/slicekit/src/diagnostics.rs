//! Construction-time diagnostics
//!
//! When a slice is built with `debug = true`, a [`SliceSnapshot`] describing
//! the generated surface is handed to a [`DiagnosticSink`] exactly once.
//! Sinks observe; nothing they do feeds back into the slice.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which factory produced a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceKind {
    /// `make_model_slice`
    Model,
    /// `create_entity_slice`
    Entity,
}

/// Description of a freshly generated slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceSnapshot {
    /// Slice name
    pub name: String,
    /// Producing factory
    pub kind: SliceKind,
    /// Every namespaced action type the reducer handles
    pub action_types: Vec<String>,
    /// Selector names
    pub selectors: Vec<String>,
    /// Captured initial state
    pub initial_state: Value,
}

impl SliceSnapshot {
    /// Build a snapshot, serializing the initial state.
    ///
    /// A state that fails to serialize is recorded as `null`.
    pub fn new<St: Serialize + ?Sized>(
        name: &str,
        kind: SliceKind,
        action_types: Vec<String>,
        selectors: impl IntoIterator<Item = &'static str>,
        initial_state: &St,
    ) -> Self {
        let initial_state = serde_json::to_value(initial_state).unwrap_or_else(|err| {
            tracing::warn!(slice = name, error = %err, "initial state not serializable");
            Value::Null
        });
        Self {
            name: name.to_string(),
            kind,
            action_types,
            selectors: selectors.into_iter().map(str::to_string).collect(),
            initial_state,
        }
    }
}

/// Receiver for slice snapshots.
pub trait DiagnosticSink: Send + Sync {
    /// Record one snapshot.
    fn record(&self, snapshot: &SliceSnapshot);
}

/// Default sink: one `debug` event per slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, snapshot: &SliceSnapshot) {
        tracing::debug!(
            slice = %snapshot.name,
            kind = ?snapshot.kind,
            actions = ?snapshot.action_types,
            selectors = ?snapshot.selectors,
            initial_state = %snapshot.initial_state,
            "slice created"
        );
    }
}

/// Hand a snapshot to `sink` when `debug` is set.
pub(crate) fn emit(debug: bool, sink: &dyn DiagnosticSink, snapshot: impl FnOnce() -> SliceSnapshot) {
    if debug {
        sink.record(&snapshot());
    }
}
