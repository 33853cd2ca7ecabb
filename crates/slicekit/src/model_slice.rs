//! # Model Slice Factory
//!
//! [`make_model_slice`] generates a slice around one domain value:
//!
//! | action | payload | effect |
//! |---|---|---|
//! | `hydrate` | `T` | replace model, stamp `lastHydrated`, clear `lastModified` |
//! | `update` | JSON partial | deep-merge into model, stamp `lastModified` |
//! | `set` | `T` | replace model, stamp `lastModified` |
//! | `reset` | none | restore the captured initial state |
//! | `setStatus` | `S` | replace status |
//! | `setError` | `Option<E>` | replace error |
//!
//! `update` merges objects recursively, replaces arrays and scalars, and
//! assigns explicit `null`s, so an `Option` field can be cleared. A patch that no longer fits `T` is dropped
//! with a warning and the state is left as it was.

use crate::diagnostics::{self, DiagnosticSink, SliceKind, SliceSnapshot, TracingSink};
use crate::model_state::{ModelState, ModelStateSeed};
use crate::reducer::Reducer;
use crate::selectors::{MetaSelectors, META_SELECTOR_NAMES};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slicekit_core::{
    create_selector, merge, Action, ActionKind, ClockEffects, IsoTimestamp, Memoized,
    SerializableError, SliceError, StateStatus, StateValue, Status, SystemClock,
};
use std::marker::PhantomData;
use std::sync::Arc;

/// Action kinds a model slice handles.
pub const MODEL_ACTION_KINDS: [&str; 6] =
    ["hydrate", "update", "set", "reset", "setStatus", "setError"];

/// Payload of a model slice action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ModelAction<T, S = StateStatus, E = SerializableError> {
    /// Replace the model from an authoritative source
    Hydrate(T),
    /// Deep-merge a partial into the model
    Update(Value),
    /// Replace the model locally
    Set(T),
    /// Restore the initial state
    Reset,
    /// Replace the status
    SetStatus(S),
    /// Replace the error
    SetError(Option<E>),
}

impl<T, S, E> ActionKind for ModelAction<T, S, E> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Hydrate(_) => "hydrate",
            Self::Update(_) => "update",
            Self::Set(_) => "set",
            Self::Reset => "reset",
            Self::SetStatus(_) => "setStatus",
            Self::SetError(_) => "setError",
        }
    }
}

// ─── Reducer ─────────────────────────────────────────────────

/// Reducer generated for a model slice.
pub struct ModelReducer<T, S = StateStatus, E = SerializableError> {
    name: String,
    initial_state: Arc<ModelState<T, S, E>>,
    clock: Arc<dyn ClockEffects>,
}

impl<T, S, E> Clone for ModelReducer<T, S, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            initial_state: Arc::clone(&self.initial_state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, S, E> ModelReducer<T, S, E>
where
    T: Clone,
    S: Clone,
    E: Clone,
{
    fn next(
        &self,
        state: &ModelState<T, S, E>,
        apply: impl FnOnce(&mut ModelState<T, S, E>),
    ) -> Arc<ModelState<T, S, E>> {
        let mut next = state.clone();
        apply(&mut next);
        Arc::new(next)
    }
}

impl<T, S, E> Reducer for ModelReducer<T, S, E>
where
    T: StateValue,
    S: Status,
    E: StateValue,
{
    type State = ModelState<T, S, E>;
    type Payload = ModelAction<T, S, E>;

    fn name(&self) -> &str {
        &self.name
    }

    fn initial_state(&self) -> Arc<Self::State> {
        Arc::clone(&self.initial_state)
    }

    fn reduce(&self, state: &Arc<Self::State>, action: &Action<Self::Payload>) -> Arc<Self::State> {
        if !self.accepts(action) {
            return Arc::clone(state);
        }
        tracing::trace!(slice = %self.name, action = %action.action_type, "reduce");

        match &action.payload {
            ModelAction::Hydrate(model) => self.next(state, |next| {
                next.model = model.clone();
                next.meta.mark_hydrated(self.clock.now_iso());
            }),
            ModelAction::Update(patch) => match merge::merge_into(&state.model, patch.clone()) {
                Ok(model) => self.next(state, |next| {
                    next.model = model;
                    next.meta.mark_modified(self.clock.now_iso());
                }),
                Err(err) => {
                    tracing::warn!(
                        slice = %self.name,
                        error = %err,
                        "update patch does not fit the model, ignored"
                    );
                    Arc::clone(state)
                }
            },
            ModelAction::Set(model) => self.next(state, |next| {
                next.model = model.clone();
                next.meta.mark_modified(self.clock.now_iso());
            }),
            ModelAction::Reset => Arc::clone(&self.initial_state),
            ModelAction::SetStatus(status) => {
                self.next(state, |next| next.meta.set_status(status.clone()))
            }
            ModelAction::SetError(error) => {
                self.next(state, |next| next.meta.set_error(error.clone()))
            }
        }
    }
}

// ─── Action creators ─────────────────────────────────────────

/// Action creators for a model slice.
pub struct ModelActions<T, S = StateStatus, E = SerializableError> {
    name: String,
    _marker: PhantomData<fn() -> (T, S, E)>,
}

impl<T, S, E> Clone for ModelActions<T, S, E> {
    fn clone(&self) -> Self {
        Self::new(&self.name)
    }
}

impl<T, S, E> ModelActions<T, S, E> {
    /// Action creators namespaced under `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            _marker: PhantomData,
        }
    }

    /// Every action type this slice handles.
    pub fn types(&self) -> Vec<String> {
        MODEL_ACTION_KINDS
            .iter()
            .map(|kind| format!("{}/{kind}", self.name))
            .collect()
    }

    fn action(&self, payload: ModelAction<T, S, E>) -> Action<ModelAction<T, S, E>> {
        Action::for_slice(&self.name, payload)
    }

    /// Replace the model from an authoritative source.
    pub fn hydrate(&self, model: T) -> Action<ModelAction<T, S, E>> {
        self.action(ModelAction::Hydrate(model))
    }

    /// Deep-merge a JSON partial into the model.
    pub fn update(&self, patch: Value) -> Action<ModelAction<T, S, E>> {
        self.action(ModelAction::Update(patch))
    }

    /// Deep-merge a typed partial into the model.
    ///
    /// Fields serialized as `null` (e.g. `None`) leave the model untouched;
    /// clear a field with [`update`](Self::update) and an explicit `null`.
    pub fn update_with<P: Serialize + ?Sized>(
        &self,
        partial: &P,
    ) -> Result<Action<ModelAction<T, S, E>>, SliceError> {
        Ok(self.update(merge::to_patch(partial)?))
    }

    /// Replace the model locally.
    pub fn set(&self, model: T) -> Action<ModelAction<T, S, E>> {
        self.action(ModelAction::Set(model))
    }

    /// Restore the initial state.
    pub fn reset(&self) -> Action<ModelAction<T, S, E>> {
        self.action(ModelAction::Reset)
    }

    /// Replace the status.
    pub fn set_status(&self, status: S) -> Action<ModelAction<T, S, E>> {
        self.action(ModelAction::SetStatus(status))
    }

    /// Replace the error; `None` clears it.
    pub fn set_error(&self, error: Option<E>) -> Action<ModelAction<T, S, E>> {
        self.action(ModelAction::SetError(error))
    }
}

// ─── Selectors ───────────────────────────────────────────────

/// Selectors generated for a model slice.
pub struct ModelSelectors<G, T, S = StateStatus, E = SerializableError> {
    /// The whole slice state
    pub select_slice_state: Memoized<G, Arc<ModelState<T, S, E>>, Arc<ModelState<T, S, E>>>,
    /// Envelope status
    pub select_status: Memoized<G, Arc<ModelState<T, S, E>>, S>,
    /// Envelope error
    pub select_error: Memoized<G, Arc<ModelState<T, S, E>>, Option<E>>,
    /// Last local modification
    pub select_last_modified: Memoized<G, Arc<ModelState<T, S, E>>, Option<IsoTimestamp>>,
    /// Last hydration
    pub select_last_hydrated: Memoized<G, Arc<ModelState<T, S, E>>, Option<IsoTimestamp>>,
    /// The model
    pub select_model: Memoized<G, Arc<ModelState<T, S, E>>, T>,
}

impl<G, T, S, E> ModelSelectors<G, T, S, E>
where
    G: 'static,
    T: StateValue,
    S: Status,
    E: StateValue,
{
    /// Selector names, in declaration order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        META_SELECTOR_NAMES.into_iter().chain(["selectModel"])
    }

    /// Bind every selector to a slice state projection.
    pub fn new(select_slice_state: fn(&G) -> &Arc<ModelState<T, S, E>>) -> Self {
        let MetaSelectors {
            select_slice_state: select_state,
            select_status,
            select_error,
            select_last_modified,
            select_last_hydrated,
        } = MetaSelectors::new(select_slice_state);

        Self {
            select_slice_state: select_state,
            select_status,
            select_error,
            select_last_modified,
            select_last_hydrated,
            select_model: create_selector(
                move |state: &G| Arc::clone(select_slice_state(state)),
                |st: &Arc<ModelState<T, S, E>>| st.model.clone(),
            ),
        }
    }
}

// ─── Factory ─────────────────────────────────────────────────

/// Construction options for [`make_model_slice`].
pub struct ModelSliceOptions<T, S = StateStatus, E = SerializableError> {
    /// Emit a diagnostic snapshot at construction
    pub debug: bool,
    /// Partial seed for the initial state
    pub initial_state: ModelStateSeed<T, S, E>,
    /// Timestamp source
    pub clock: Arc<dyn ClockEffects>,
    /// Diagnostic receiver used when `debug` is set
    pub sink: Arc<dyn DiagnosticSink>,
}

impl<T, S, E> Default for ModelSliceOptions<T, S, E> {
    fn default() -> Self {
        Self {
            debug: false,
            initial_state: ModelStateSeed::default(),
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
        }
    }
}

impl<T, S, E> ModelSliceOptions<T, S, E> {
    /// Set the debug flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the initial seed.
    pub fn with_initial_state(mut self, seed: ModelStateSeed<T, S, E>) -> Self {
        self.initial_state = seed;
        self
    }

    /// Use a specific timestamp source.
    pub fn with_clock(mut self, clock: impl ClockEffects + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use a specific diagnostic sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }
}

/// A generated model slice.
pub struct ModelSlice<G, T, S = StateStatus, E = SerializableError> {
    /// Slice name
    pub name: String,
    /// Reducer
    pub reducer: ModelReducer<T, S, E>,
    /// Action creators
    pub actions: ModelActions<T, S, E>,
    /// Memoized selectors
    pub selectors: ModelSelectors<G, T, S, E>,
}

/// Generate a model slice.
///
/// The initial state is computed once from `options.initial_state` and
/// captured; `reset` always restores that exact value.
pub fn make_model_slice<G, T, S, E>(
    name: &str,
    select_slice_state: fn(&G) -> &Arc<ModelState<T, S, E>>,
    options: ModelSliceOptions<T, S, E>,
) -> ModelSlice<G, T, S, E>
where
    G: 'static,
    T: StateValue + Default,
    S: Status,
    E: StateValue,
{
    let ModelSliceOptions {
        debug,
        initial_state,
        clock,
        sink,
    } = options;

    let initial_state = Arc::new(ModelState::create(initial_state));
    let actions = ModelActions::new(name);
    let selectors = ModelSelectors::new(select_slice_state);

    diagnostics::emit(debug, sink.as_ref(), || {
        SliceSnapshot::new(
            name,
            SliceKind::Model,
            actions.types(),
            ModelSelectors::<G, T, S, E>::names(),
            initial_state.as_ref(),
        )
    });
    tracing::trace!(slice = name, "model slice created");

    ModelSlice {
        name: name.to_string(),
        reducer: ModelReducer {
            name: name.to_string(),
            initial_state,
            clock,
        },
        actions,
        selectors,
    }
}
