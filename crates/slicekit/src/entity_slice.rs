//! # Entity Slice Factory
//!
//! [`create_entity_slice`] generates a slice around a normalized entity
//! collection. Collection shaping is delegated to [`EntityAdapter`]; the
//! reducer only picks the adapter primitive and applies the envelope
//! policy on top of it.
//!
//! ## Timestamp families
//!
//! - **hydrate** (`hydrateOne`, `hydrateMany`, `hydrateAll`): upsert /
//!   replace from an authoritative source, stamp `lastHydrated`
//! - **modify** (`addOne/Many`, `updateOne/Many`, `upsertOne/Many`,
//!   `removeOne/Many/All`, `setAll`): local edits, stamp `lastModified`,
//!   even when the adapter leaves the collection unchanged
//! - `reset`, `setStatus`, `setError` touch neither timestamp

use crate::diagnostics::{self, DiagnosticSink, SliceKind, SliceSnapshot, TracingSink};
use crate::entity_state::{EntityState, EntityStateSeed};
use crate::reducer::Reducer;
use crate::selectors::{MetaSelectors, META_SELECTOR_NAMES};
use serde::{Deserialize, Serialize};
use slicekit_core::adapter::{SelectById, SharedEntities, SharedIds};
use slicekit_core::{
    Action, ActionKind, ClockEffects, EntityAdapter, EntityCollection, EntityId, IdSelector,
    IsoTimestamp, Memoized, SerializableError, SliceError, SortOrder, StateStatus, StateValue,
    Status, SystemClock, Update,
};
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

/// Action kinds an entity slice handles.
pub const ENTITY_ACTION_KINDS: [&str; 16] = [
    "addOne",
    "addMany",
    "hydrateOne",
    "hydrateMany",
    "hydrateAll",
    "updateOne",
    "updateMany",
    "upsertOne",
    "upsertMany",
    "removeOne",
    "removeMany",
    "removeAll",
    "setAll",
    "reset",
    "setStatus",
    "setError",
];

/// Selector names of an entity slice, in declaration order.
pub const ENTITY_SELECTOR_NAMES: [&str; 5] = [
    "selectIds",
    "selectEntities",
    "selectAll",
    "selectTotal",
    "selectById",
];

/// Payload of an entity slice action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum EntityAction<Id, T, S = StateStatus> {
    /// Insert if absent
    AddOne(T),
    /// Insert each if absent
    AddMany(Vec<T>),
    /// Upsert from an authoritative source
    HydrateOne(T),
    /// Upsert many from an authoritative source
    HydrateMany(Vec<T>),
    /// Replace the collection from an authoritative source
    HydrateAll(Vec<T>),
    /// Shallow patch by id
    UpdateOne(Update<Id>),
    /// Shallow patches by id
    UpdateMany(Vec<Update<Id>>),
    /// Insert or replace
    UpsertOne(T),
    /// Insert or replace each
    UpsertMany(Vec<T>),
    /// Remove by id
    RemoveOne(Id),
    /// Remove each id
    RemoveMany(Vec<Id>),
    /// Empty the collection
    RemoveAll,
    /// Replace the collection locally
    SetAll(Vec<T>),
    /// Restore the initial state
    Reset,
    /// Replace the status
    SetStatus(S),
    /// Replace the error
    SetError(Option<SerializableError>),
}

impl<Id, T, S> ActionKind for EntityAction<Id, T, S> {
    fn kind(&self) -> &'static str {
        match self {
            Self::AddOne(_) => "addOne",
            Self::AddMany(_) => "addMany",
            Self::HydrateOne(_) => "hydrateOne",
            Self::HydrateMany(_) => "hydrateMany",
            Self::HydrateAll(_) => "hydrateAll",
            Self::UpdateOne(_) => "updateOne",
            Self::UpdateMany(_) => "updateMany",
            Self::UpsertOne(_) => "upsertOne",
            Self::UpsertMany(_) => "upsertMany",
            Self::RemoveOne(_) => "removeOne",
            Self::RemoveMany(_) => "removeMany",
            Self::RemoveAll => "removeAll",
            Self::SetAll(_) => "setAll",
            Self::Reset => "reset",
            Self::SetStatus(_) => "setStatus",
            Self::SetError(_) => "setError",
        }
    }
}

// ─── Reducer ─────────────────────────────────────────────────

/// Reducer generated for an entity slice.
pub struct EntityReducer<Id: Eq + Hash, T, S = StateStatus> {
    name: String,
    adapter: EntityAdapter<Id, T>,
    initial_state: Arc<EntityState<Id, T, S>>,
    clock: Arc<dyn ClockEffects>,
}

impl<Id: Eq + Hash, T, S> Clone for EntityReducer<Id, T, S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            adapter: self.adapter.clone(),
            initial_state: Arc::clone(&self.initial_state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<Id, T, S> EntityReducer<Id, T, S>
where
    Id: EntityId,
    T: StateValue,
    S: Status,
{
    /// The adapter shaping this slice's collection.
    pub fn adapter(&self) -> &EntityAdapter<Id, T> {
        &self.adapter
    }

    fn hydrate(
        &self,
        state: &EntityState<Id, T, S>,
        apply: impl FnOnce(&EntityAdapter<Id, T>, &mut EntityCollection<Id, T>),
    ) -> Arc<EntityState<Id, T, S>> {
        let mut next = state.clone();
        apply(&self.adapter, &mut next.collection);
        next.meta.mark_hydrated(self.clock.now_iso());
        Arc::new(next)
    }

    fn modify(
        &self,
        state: &EntityState<Id, T, S>,
        apply: impl FnOnce(&EntityAdapter<Id, T>, &mut EntityCollection<Id, T>),
    ) -> Arc<EntityState<Id, T, S>> {
        let mut next = state.clone();
        apply(&self.adapter, &mut next.collection);
        next.meta.mark_modified(self.clock.now_iso());
        Arc::new(next)
    }
}

impl<Id, T, S> Reducer for EntityReducer<Id, T, S>
where
    Id: EntityId,
    T: StateValue,
    S: Status,
{
    type State = EntityState<Id, T, S>;
    type Payload = EntityAction<Id, T, S>;

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
            // Hydrate family
            EntityAction::HydrateOne(entity) => {
                self.hydrate(state, |adapter, c| adapter.upsert_one(c, entity.clone()))
            }
            EntityAction::HydrateMany(entities) => {
                self.hydrate(state, |adapter, c| adapter.upsert_many(c, entities.iter().cloned()))
            }
            EntityAction::HydrateAll(entities) => {
                self.hydrate(state, |adapter, c| adapter.set_all(c, entities.iter().cloned()))
            }

            // Modify family
            EntityAction::AddOne(entity) => self.modify(state, |adapter, c| {
                adapter.add_one(c, entity.clone());
            }),
            EntityAction::AddMany(entities) => self.modify(state, |adapter, c| {
                adapter.add_many(c, entities.iter().cloned());
            }),
            EntityAction::UpdateOne(update) => self.modify(state, |adapter, c| {
                adapter.update_one(c, update);
            }),
            EntityAction::UpdateMany(updates) => self.modify(state, |adapter, c| {
                adapter.update_many(c, updates);
            }),
            EntityAction::UpsertOne(entity) => {
                self.modify(state, |adapter, c| adapter.upsert_one(c, entity.clone()))
            }
            EntityAction::UpsertMany(entities) => {
                self.modify(state, |adapter, c| adapter.upsert_many(c, entities.iter().cloned()))
            }
            EntityAction::RemoveOne(id) => self.modify(state, |adapter, c| {
                adapter.remove_one(c, id);
            }),
            EntityAction::RemoveMany(ids) => self.modify(state, |adapter, c| {
                adapter.remove_many(c, ids);
            }),
            EntityAction::RemoveAll => self.modify(state, |adapter, c| adapter.remove_all(c)),
            EntityAction::SetAll(entities) => {
                self.modify(state, |adapter, c| adapter.set_all(c, entities.iter().cloned()))
            }

            // Envelope
            EntityAction::Reset => Arc::clone(&self.initial_state),
            EntityAction::SetStatus(status) => {
                let mut next = (**state).clone();
                next.meta.set_status(status.clone());
                Arc::new(next)
            }
            EntityAction::SetError(error) => {
                let mut next = (**state).clone();
                next.meta.set_error(error.clone());
                Arc::new(next)
            }
        }
    }
}

// ─── Action creators ─────────────────────────────────────────

/// Action creators for an entity slice.
///
/// Batch creators (`add_many`, `upsert_many`, `set_all` and the hydrate
/// family) take any `IntoIterator<Item = T>`. An id-keyed
/// `HashMap<Id, T>` is passed with `.into_values()`.
pub struct EntityActions<Id, T, S = StateStatus> {
    name: String,
    _marker: PhantomData<fn() -> (Id, T, S)>,
}

impl<Id, T, S> Clone for EntityActions<Id, T, S> {
    fn clone(&self) -> Self {
        Self::new(&self.name)
    }
}

type EntityActionOf<Id, T, S> = Action<EntityAction<Id, T, S>>;

impl<Id, T, S> EntityActions<Id, T, S> {
    /// Action creators namespaced under `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            _marker: PhantomData,
        }
    }

    /// Every action type this slice handles.
    pub fn types(&self) -> Vec<String> {
        ENTITY_ACTION_KINDS
            .iter()
            .map(|kind| format!("{}/{kind}", self.name))
            .collect()
    }

    fn action(&self, payload: EntityAction<Id, T, S>) -> EntityActionOf<Id, T, S> {
        Action::for_slice(&self.name, payload)
    }

    /// Insert an entity unless its id exists.
    pub fn add_one(&self, entity: T) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::AddOne(entity))
    }

    /// Insert each entity whose id does not exist.
    pub fn add_many(&self, entities: impl IntoIterator<Item = T>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::AddMany(entities.into_iter().collect()))
    }

    /// Upsert an entity from an authoritative source.
    pub fn hydrate_one(&self, entity: T) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::HydrateOne(entity))
    }

    /// Upsert entities from an authoritative source.
    pub fn hydrate_many(&self, entities: impl IntoIterator<Item = T>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::HydrateMany(entities.into_iter().collect()))
    }

    /// Replace the collection from an authoritative source.
    pub fn hydrate_all(&self, entities: impl IntoIterator<Item = T>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::HydrateAll(entities.into_iter().collect()))
    }

    /// Apply a shallow patch to one entity.
    pub fn update_one(&self, update: Update<Id>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::UpdateOne(update))
    }

    /// Apply a typed partial to one entity.
    pub fn update_one_with<P: Serialize + ?Sized>(
        &self,
        id: Id,
        partial: &P,
    ) -> Result<EntityActionOf<Id, T, S>, SliceError> {
        Ok(self.update_one(Update::from_partial(id, partial)?))
    }

    /// Apply shallow patches in order.
    pub fn update_many(
        &self,
        updates: impl IntoIterator<Item = Update<Id>>,
    ) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::UpdateMany(updates.into_iter().collect()))
    }

    /// Insert or replace an entity.
    pub fn upsert_one(&self, entity: T) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::UpsertOne(entity))
    }

    /// Insert or replace each entity.
    pub fn upsert_many(&self, entities: impl IntoIterator<Item = T>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::UpsertMany(entities.into_iter().collect()))
    }

    /// Remove an entity by id.
    pub fn remove_one(&self, id: Id) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::RemoveOne(id))
    }

    /// Remove entities by id.
    pub fn remove_many(&self, ids: impl IntoIterator<Item = Id>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::RemoveMany(ids.into_iter().collect()))
    }

    /// Remove every entity.
    pub fn remove_all(&self) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::RemoveAll)
    }

    /// Replace the collection locally.
    pub fn set_all(&self, entities: impl IntoIterator<Item = T>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::SetAll(entities.into_iter().collect()))
    }

    /// Restore the initial state.
    pub fn reset(&self) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::Reset)
    }

    /// Replace the status.
    pub fn set_status(&self, status: S) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::SetStatus(status))
    }

    /// Replace the error with an already-serialized value.
    pub fn set_error(&self, error: Option<SerializableError>) -> EntityActionOf<Id, T, S> {
        self.action(EntityAction::SetError(error))
    }

    /// Record an arbitrary error value in serialized form.
    pub fn set_error_from<E>(&self, error: &E) -> EntityActionOf<Id, T, S>
    where
        E: std::error::Error + ?Sized,
    {
        self.set_error(Some(SerializableError::from_error(error)))
    }

    /// Clear the recorded error.
    pub fn clear_error(&self) -> EntityActionOf<Id, T, S> {
        self.set_error(None)
    }
}

// ─── Selectors ───────────────────────────────────────────────

type EntityInput<Id, T, S> = Arc<EntityState<Id, T, S>>;

/// Selectors generated for an entity slice: collection selectors from the
/// adapter merged with the envelope selectors.
pub struct EntitySliceSelectors<G, Id: Eq + Hash, T, S = StateStatus> {
    /// Ordered ids
    pub select_ids: Memoized<G, SharedIds<Id>, SharedIds<Id>>,
    /// Id → entity map
    pub select_entities: Memoized<G, SharedEntities<Id, T>, SharedEntities<Id, T>>,
    /// Entities in id order
    pub select_all: Memoized<G, (SharedIds<Id>, SharedEntities<Id, T>), Arc<Vec<T>>>,
    /// Entity count
    pub select_total: Memoized<G, SharedIds<Id>, usize>,
    /// Lookup by id
    pub select_by_id: SelectById<G, EntityState<Id, T, S>, Id, T>,
    /// The whole slice state
    pub select_slice_state: Memoized<G, EntityInput<Id, T, S>, EntityInput<Id, T, S>>,
    /// Envelope status
    pub select_status: Memoized<G, EntityInput<Id, T, S>, S>,
    /// Envelope error
    pub select_error: Memoized<G, EntityInput<Id, T, S>, Option<SerializableError>>,
    /// Last local modification
    pub select_last_modified: Memoized<G, EntityInput<Id, T, S>, Option<IsoTimestamp>>,
    /// Last hydration
    pub select_last_hydrated: Memoized<G, EntityInput<Id, T, S>, Option<IsoTimestamp>>,
}

impl<G, Id, T, S> EntitySliceSelectors<G, Id, T, S>
where
    G: 'static,
    Id: EntityId,
    T: StateValue,
    S: Status,
{
    /// Selector names, in declaration order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        ENTITY_SELECTOR_NAMES.into_iter().chain(META_SELECTOR_NAMES)
    }

    /// Bind every selector to a slice state projection.
    pub fn new(
        adapter: &EntityAdapter<Id, T>,
        select_slice_state: fn(&G) -> &Arc<EntityState<Id, T, S>>,
    ) -> Self {
        let collection = adapter.get_selectors(select_slice_state);
        let meta = MetaSelectors::new(select_slice_state);

        Self {
            select_ids: collection.select_ids,
            select_entities: collection.select_entities,
            select_all: collection.select_all,
            select_total: collection.select_total,
            select_by_id: collection.select_by_id,
            select_slice_state: meta.select_slice_state,
            select_status: meta.select_status,
            select_error: meta.select_error,
            select_last_modified: meta.select_last_modified,
            select_last_hydrated: meta.select_last_hydrated,
        }
    }
}

// ─── Factory ─────────────────────────────────────────────────

/// Construction options for [`create_entity_slice`].
pub struct CreateEntitySliceOptions<G, Id: Eq + Hash, T, S = StateStatus> {
    /// Slice name, used to namespace action types
    pub name: String,
    /// Projection from global state to this slice
    pub select_slice_state: fn(&G) -> &Arc<EntityState<Id, T, S>>,
    /// Entity → id
    pub select_id: IdSelector<T, Id>,
    /// Insertion order or a comparator
    pub sort_comparer: SortOrder<T>,
    /// Partial seed for the initial state
    pub initial_state: EntityStateSeed<T, S>,
    /// Emit a diagnostic snapshot at construction
    pub debug: bool,
    /// Timestamp source
    pub clock: Arc<dyn ClockEffects>,
    /// Diagnostic receiver used when `debug` is set
    pub sink: Arc<dyn DiagnosticSink>,
}

impl<G, Id, T, S> CreateEntitySliceOptions<G, Id, T, S>
where
    Id: Eq + Hash,
{
    /// Options with insertion order, an empty seed, and default effects.
    pub fn new(
        name: &str,
        select_slice_state: fn(&G) -> &Arc<EntityState<Id, T, S>>,
        select_id: impl Fn(&T) -> Id + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            select_slice_state,
            select_id: Arc::new(select_id),
            sort_comparer: SortOrder::Insertion,
            initial_state: EntityStateSeed::default(),
            debug: false,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
        }
    }

    /// Keep `ids` sorted by `compare`.
    pub fn sorted_by(
        mut self,
        compare: impl Fn(&T, &T) -> std::cmp::Ordering + Send + Sync + 'static,
    ) -> Self {
        self.sort_comparer = SortOrder::by(compare);
        self
    }

    /// Set the initial seed.
    pub fn with_initial_state(mut self, seed: EntityStateSeed<T, S>) -> Self {
        self.initial_state = seed;
        self
    }

    /// Set the debug flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
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

/// A generated entity slice.
pub struct EntitySlice<G, Id: Eq + Hash, T, S = StateStatus> {
    /// Slice name
    pub name: String,
    /// Reducer
    pub reducer: EntityReducer<Id, T, S>,
    /// Action creators
    pub actions: EntityActions<Id, T, S>,
    /// Memoized selectors
    pub selectors: EntitySliceSelectors<G, Id, T, S>,
}

/// Generate an entity slice.
///
/// Seeded entities are inserted through the adapter, so the captured
/// initial state already respects the sort order.
pub fn create_entity_slice<G, Id, T, S>(
    options: CreateEntitySliceOptions<G, Id, T, S>,
) -> EntitySlice<G, Id, T, S>
where
    G: 'static,
    Id: EntityId,
    T: StateValue,
    S: Status,
{
    let CreateEntitySliceOptions {
        name,
        select_slice_state,
        select_id,
        sort_comparer,
        initial_state,
        debug,
        clock,
        sink,
    } = options;

    let adapter = EntityAdapter::with_sort_order(select_id, sort_comparer);
    let initial_state = Arc::new(EntityState::create(&adapter, initial_state));
    let actions = EntityActions::new(&name);
    let selectors = EntitySliceSelectors::new(&adapter, select_slice_state);

    diagnostics::emit(debug, sink.as_ref(), || {
        SliceSnapshot::new(
            &name,
            SliceKind::Entity,
            actions.types(),
            EntitySliceSelectors::<G, Id, T, S>::names(),
            initial_state.as_ref(),
        )
    });
    tracing::trace!(
        slice = %name,
        sorted = adapter.sort_order().is_sorted(),
        "entity slice created"
    );

    EntitySlice {
        reducer: EntityReducer {
            name: name.clone(),
            adapter,
            initial_state,
            clock,
        },
        name,
        actions,
        selectors,
    }
}
