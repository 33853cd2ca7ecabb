//! `{...envelope, ids, entities}` state container.

use serde::{Deserialize, Serialize};
use slicekit_core::adapter::EntityStateView;
use slicekit_core::{
    EntityAdapter, EntityCollection, EntityId, HasMeta, MetaSeed, MetaState, SerializableError,
    StateStatus, StateValue,
};
use std::collections::HashMap;
use std::hash::Hash;

/// State of an entity slice.
///
/// Errors are stored in their serialized form so any error value can be
/// recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState<Id: Eq + Hash, T, S = StateStatus> {
    /// Shared envelope
    #[serde(flatten)]
    pub meta: MetaState<S, SerializableError>,
    /// Normalized collection
    #[serde(flatten)]
    pub collection: EntityCollection<Id, T>,
}

impl<Id: Eq + Hash, T, S> EntityState<Id, T, S> {
    /// Ordered ids.
    pub fn ids(&self) -> &[Id] {
        &self.collection.ids
    }

    /// Id → entity map.
    pub fn entities(&self) -> &HashMap<Id, T> {
        &self.collection.entities
    }
}

impl<Id: EntityId, T: StateValue, S: Default> EntityState<Id, T, S> {
    /// Build a state from a partial seed, inserting seeded entities through
    /// the adapter so they respect its sort order.
    pub fn create(adapter: &EntityAdapter<Id, T>, seed: EntityStateSeed<T, S>) -> Self {
        Self {
            meta: MetaState::create(seed.meta),
            collection: adapter.get_initial_state_with(seed.entities),
        }
    }
}

impl<Id: Eq + Hash, T, S> HasMeta for EntityState<Id, T, S> {
    type Status = S;
    type Error = SerializableError;

    fn meta(&self) -> &MetaState<S, SerializableError> {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MetaState<S, SerializableError> {
        &mut self.meta
    }
}

impl<Id: Eq + Hash, T, S> EntityStateView<Id, T> for EntityState<Id, T, S> {
    fn collection(&self) -> &EntityCollection<Id, T> {
        &self.collection
    }
}

/// Partial seed for an [`EntityState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityStateSeed<T, S = StateStatus> {
    /// Envelope fields
    #[serde(flatten)]
    pub meta: MetaSeed<S, SerializableError>,
    /// Entities present at creation
    pub entities: Vec<T>,
}

impl<T, S> Default for EntityStateSeed<T, S> {
    fn default() -> Self {
        Self {
            meta: MetaSeed::default(),
            entities: Vec::new(),
        }
    }
}

impl<T, S> EntityStateSeed<T, S> {
    /// Seed carrying only entities.
    pub fn with_entities(entities: impl IntoIterator<Item = T>) -> Self {
        Self {
            entities: entities.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the initial status.
    pub fn status(mut self, status: S) -> Self {
        self.meta.status = Some(status);
        self
    }
}
