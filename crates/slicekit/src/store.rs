//! # Store
//!
//! Dispatch host for generated slices. The store owns the global state and
//! a registry of slice reducers keyed by slice name. Each dispatched action
//! is routed by the text before the last `/` of its type
//! (`"todos/addOne"` → `todos`, `"features/todos/addOne"` → `features/todos`)
//! and applied to the state the reducer's lens points at.
//!
//! Reducers have heterogeneous payload types, so they are stored
//! type-erased and downcast the action on the way in.
//!
//! `dispatch` takes `&mut self`: there is exactly one writer, and actions
//! are applied strictly in dispatch order.

use crate::reducer::Reducer;
use slicekit_core::{Action, Selector, SliceError};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Mutable projection from global state to one slice's state.
pub type Lens<G, St> = fn(&mut G) -> &mut Arc<St>;

type Handler<G> = Box<dyn Fn(&mut G, &dyn Any) -> bool + Send + Sync>;

/// Global state plus the reducers that may change it.
pub struct Store<G> {
    state: G,
    handlers: HashMap<String, Handler<G>>,
    dispatched: u64,
}

impl<G> Store<G> {
    /// Create a store around an initial global state.
    pub fn new(state: G) -> Self {
        Self {
            state,
            handlers: HashMap::new(),
            dispatched: 0,
        }
    }

    /// Current global state.
    pub fn state(&self) -> &G {
        &self.state
    }

    /// Consume the store, returning the global state.
    pub fn into_state(self) -> G {
        self.state
    }

    /// Run a selector against the current state.
    pub fn select<S: Selector<G>>(&self, selector: &S) -> S::Output {
        selector.select(&self.state)
    }

    /// Number of actions applied so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Check if a slice name has a registered reducer.
    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Get all registered slice names.
    pub fn registered_slices(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Apply an action to the slice named by its type prefix.
    pub fn dispatch<P: 'static>(&mut self, action: Action<P>) -> Result<(), SliceError> {
        let slice = action.slice_name();
        let Some(handler) = self.handlers.get(slice) else {
            tracing::warn!(action = %action.action_type, "no reducer registered for slice");
            return Err(SliceError::unknown_slice(slice));
        };

        if !handler(&mut self.state, &action) {
            return Err(SliceError::payload_mismatch(slice, &action.action_type));
        }

        self.dispatched += 1;
        tracing::trace!(action = %action.action_type, seq = self.dispatched, "dispatched");
        Ok(())
    }
}

impl<G: 'static> Store<G> {
    /// Register a slice reducer together with the lens into its state.
    ///
    /// The reducer's name becomes the routing key. Registering the same
    /// name twice is rejected.
    pub fn register<R>(&mut self, lens: Lens<G, R::State>, reducer: R) -> Result<(), SliceError>
    where
        R: Reducer + 'static,
        R::State: 'static,
        R::Payload: 'static,
    {
        let name = reducer.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(SliceError::duplicate_slice(name));
        }

        let handler: Handler<G> = Box::new(move |state: &mut G, action: &dyn Any| {
            let Some(action) = action.downcast_ref::<Action<R::Payload>>() else {
                return false;
            };
            let slot = lens(state);
            let next = reducer.reduce(slot, action);
            *slot = next;
            true
        });

        tracing::debug!(slice = %name, "reducer registered");
        self.handlers.insert(name, handler);
        Ok(())
    }
}

impl<G> fmt::Debug for Store<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("registered_slices", &self.handlers.keys().collect::<Vec<_>>())
            .field("dispatched", &self.dispatched)
            .finish_non_exhaustive()
    }
}
