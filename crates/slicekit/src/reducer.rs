//! Reducer contract
//!
//! A reducer is a pure `(state, action) → state` function. It never mutates
//! the state it is given: unchanged state is returned as the same `Arc`,
//! changed state as a fresh one.

use slicekit_core::Action;
use std::sync::Arc;

/// A slice reducer.
pub trait Reducer: Send + Sync {
    /// Slice-local state
    type State;
    /// Action payload this reducer understands
    type Payload;

    /// Slice name; actions are accepted only under this namespace.
    fn name(&self) -> &str;

    /// The initial state captured at construction.
    fn initial_state(&self) -> Arc<Self::State>;

    /// Compute the next state.
    fn reduce(&self, state: &Arc<Self::State>, action: &Action<Self::Payload>) -> Arc<Self::State>;

    /// Whether `action` belongs to this slice.
    fn accepts(&self, action: &Action<Self::Payload>) -> bool {
        action.slice_name() == self.name()
    }
}
