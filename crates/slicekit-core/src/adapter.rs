//! # Entity Adapter
//!
//! A normalized entity collection: an ordered `ids` list plus an
//! `id → entity` map, kept consistent by [`EntityAdapter`].
//!
//! - `ids` holds exactly the keys of `entities`
//! - without a comparator, `ids` follows insertion order
//! - with a comparator, `ids` is re-sorted (stable) after every mutation
//! - an id appears at most once; add is insert-if-absent, upsert is
//!   insert-or-replace
//!
//! `ids` and `entities` are shared behind `Arc` and copied on write, so a
//! cloned state keeps pointing at the same halves until the adapter
//! actually changes one. Collection selectors memoize on those halves, not
//! on the enclosing slice state.
//!
//! ## Example
//!
//! ```rust,ignore
//! let adapter = EntityAdapter::new(|todo: &Todo| todo.id.clone());
//! let mut todos = adapter.get_initial_state();
//!
//! adapter.add_one(&mut todos, todo("1", "write docs"));
//! adapter.upsert_one(&mut todos, todo("1", "write more docs"));
//! assert_eq!(*todos.ids, vec!["1".to_string()]);
//! ```

use crate::errors::SliceError;
use crate::merge;
use crate::selector::{create_selector, Memoized};
use crate::{EntityId, StateValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

/// Extracts the identifier of an entity.
pub type IdSelector<T, Id> = Arc<dyn Fn(&T) -> Id + Send + Sync>;

/// Total ordering over entities.
pub type Comparer<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// How `ids` is ordered.
pub enum SortOrder<T> {
    /// Insertion / operation order
    Insertion,
    /// Stable order under a comparator
    By(Comparer<T>),
}

impl<T> Default for SortOrder<T> {
    fn default() -> Self {
        Self::Insertion
    }
}

impl<T> Clone for SortOrder<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Insertion => Self::Insertion,
            Self::By(compare) => Self::By(Arc::clone(compare)),
        }
    }
}

impl<T> SortOrder<T> {
    /// Order entities with the given comparator.
    pub fn by(compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self::By(Arc::new(compare))
    }

    /// Whether a comparator is present.
    pub fn is_sorted(&self) -> bool {
        matches!(self, Self::By(_))
    }
}

impl<T> std::fmt::Debug for SortOrder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insertion => f.write_str("Insertion"),
            Self::By(_) => f.write_str("By(<comparer>)"),
        }
    }
}

/// Shared, ordered id list.
pub type SharedIds<Id> = Arc<Vec<Id>>;

/// Shared id → entity map.
pub type SharedEntities<Id, T> = Arc<HashMap<Id, T>>;

/// Normalized `{ids, entities}` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCollection<Id: Eq + Hash, T> {
    /// Ordered identifiers
    pub ids: SharedIds<Id>,
    /// Entities keyed by identifier
    pub entities: SharedEntities<Id, T>,
}

impl<Id: Eq + Hash, T> Default for EntityCollection<Id, T> {
    fn default() -> Self {
        Self {
            ids: Arc::new(Vec::new()),
            entities: Arc::new(HashMap::new()),
        }
    }
}

impl<Id: Eq + Hash, T> EntityCollection<Id, T> {
    /// Number of entities.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Get an entity by id.
    pub fn get(&self, id: &Id) -> Option<&T> {
        self.entities.get(id)
    }

    /// Entities in `ids` order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }
}

/// A partial change keyed by entity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update<Id> {
    /// Entity to change
    pub id: Id,
    /// Top-level fields to assign
    pub changes: Value,
}

impl<Id> Update<Id> {
    /// Create an update from raw JSON changes.
    pub fn new(id: Id, changes: Value) -> Self {
        Self { id, changes }
    }

    /// Create an update from a serializable partial.
    ///
    /// `None` fields are left out of the patch. Use [`Update::new`] with an
    /// explicit `null` to clear a field.
    pub fn from_partial<P: Serialize + ?Sized>(id: Id, partial: &P) -> Result<Self, SliceError> {
        Ok(Self {
            id,
            changes: merge::to_patch(partial)?,
        })
    }
}

/// States that embed an entity collection.
pub trait EntityStateView<Id: Eq + Hash, T> {
    /// The embedded collection.
    fn collection(&self) -> &EntityCollection<Id, T>;
}

impl<Id: Eq + Hash, T> EntityStateView<Id, T> for EntityCollection<Id, T> {
    fn collection(&self) -> &EntityCollection<Id, T> {
        self
    }
}

/// Maintains id/entity consistency and sort order for a collection.
pub struct EntityAdapter<Id, T> {
    select_id: IdSelector<T, Id>,
    sort_order: SortOrder<T>,
}

impl<Id, T> Clone for EntityAdapter<Id, T> {
    fn clone(&self) -> Self {
        Self {
            select_id: Arc::clone(&self.select_id),
            sort_order: self.sort_order.clone(),
        }
    }
}

impl<Id, T> std::fmt::Debug for EntityAdapter<Id, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityAdapter")
            .field("sort_order", &self.sort_order)
            .finish_non_exhaustive()
    }
}

impl<Id, T> EntityAdapter<Id, T>
where
    Id: EntityId,
    T: StateValue,
{
    /// Create an insertion-ordered adapter.
    pub fn new(select_id: impl Fn(&T) -> Id + Send + Sync + 'static) -> Self {
        Self::with_sort_order(Arc::new(select_id), SortOrder::Insertion)
    }

    /// Create an adapter with an explicit sort order.
    pub fn with_sort_order(select_id: IdSelector<T, Id>, sort_order: SortOrder<T>) -> Self {
        Self {
            select_id,
            sort_order,
        }
    }

    /// Id of an entity.
    pub fn select_id(&self, entity: &T) -> Id {
        (self.select_id)(entity)
    }

    /// The configured sort order.
    pub fn sort_order(&self) -> &SortOrder<T> {
        &self.sort_order
    }

    // ─── Construction ────────────────────────────────────────

    /// An empty collection.
    pub fn get_initial_state(&self) -> EntityCollection<Id, T> {
        EntityCollection::default()
    }

    /// A collection seeded with entities (respecting sort order).
    pub fn get_initial_state_with(
        &self,
        entities: impl IntoIterator<Item = T>,
    ) -> EntityCollection<Id, T> {
        let mut collection = self.get_initial_state();
        self.add_many(&mut collection, entities);
        collection
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Insert an entity unless its id is already present.
    ///
    /// Returns `true` if the entity was inserted.
    pub fn add_one(&self, collection: &mut EntityCollection<Id, T>, entity: T) -> bool {
        let added = self.insert_if_absent(collection, entity);
        if added {
            self.resort(collection);
        }
        added
    }

    /// Insert each entity whose id is not yet present.
    ///
    /// Returns the number of inserted entities.
    pub fn add_many(
        &self,
        collection: &mut EntityCollection<Id, T>,
        entities: impl IntoIterator<Item = T>,
    ) -> usize {
        let mut added = 0;
        for entity in entities {
            if self.insert_if_absent(collection, entity) {
                added += 1;
            }
        }
        if added > 0 {
            self.resort(collection);
        }
        added
    }

    /// Replace the whole collection with `entities`.
    pub fn set_all(
        &self,
        collection: &mut EntityCollection<Id, T>,
        entities: impl IntoIterator<Item = T>,
    ) {
        self.remove_all(collection);
        self.add_many(collection, entities);
    }

    /// Insert an entity, replacing any entity with the same id.
    pub fn upsert_one(&self, collection: &mut EntityCollection<Id, T>, entity: T) {
        self.insert_or_replace(collection, entity);
        self.resort(collection);
    }

    /// Insert or replace each entity.
    pub fn upsert_many(
        &self,
        collection: &mut EntityCollection<Id, T>,
        entities: impl IntoIterator<Item = T>,
    ) {
        for entity in entities {
            self.insert_or_replace(collection, entity);
        }
        self.resort(collection);
    }

    /// Apply a partial change to an existing entity.
    ///
    /// A missing id is a no-op. If the change alters the entity's id, the
    /// entity is re-keyed in place.
    pub fn update_one(&self, collection: &mut EntityCollection<Id, T>, update: &Update<Id>) -> bool {
        let updated = self.apply_update(collection, update);
        if updated {
            self.resort(collection);
        }
        updated
    }

    /// Apply several partial changes in order.
    ///
    /// Returns the number of entities that were changed.
    pub fn update_many(
        &self,
        collection: &mut EntityCollection<Id, T>,
        updates: &[Update<Id>],
    ) -> usize {
        let updated = updates
            .iter()
            .filter(|update| self.apply_update(collection, update))
            .count();
        if updated > 0 {
            self.resort(collection);
        }
        updated
    }

    /// Remove an entity if present.
    pub fn remove_one(&self, collection: &mut EntityCollection<Id, T>, id: &Id) -> bool {
        if !collection.entities.contains_key(id) {
            return false;
        }
        Arc::make_mut(&mut collection.entities).remove(id);
        Arc::make_mut(&mut collection.ids).retain(|existing| existing != id);
        true
    }

    /// Remove every listed id that is present.
    pub fn remove_many(&self, collection: &mut EntityCollection<Id, T>, ids: &[Id]) -> usize {
        let removed: HashSet<&Id> = ids
            .iter()
            .filter(|id| collection.entities.contains_key(*id))
            .collect();
        if removed.is_empty() {
            return 0;
        }
        let entities = Arc::make_mut(&mut collection.entities);
        for id in &removed {
            entities.remove(*id);
        }
        Arc::make_mut(&mut collection.ids).retain(|existing| !removed.contains(existing));
        removed.len()
    }

    /// Remove every entity.
    pub fn remove_all(&self, collection: &mut EntityCollection<Id, T>) {
        if !collection.is_empty() {
            *collection = EntityCollection::default();
        }
    }

    // ─── Selectors ───────────────────────────────────────────

    /// Build collection selectors bound to a state projection.
    pub fn get_selectors<G, St>(&self, project: fn(&G) -> &Arc<St>) -> EntitySelectors<G, St, Id, T>
    where
        G: 'static,
        St: EntityStateView<Id, T> + Send + Sync + 'static,
    {
        let ids = move |state: &G| Arc::clone(&project(state).collection().ids);
        let entities = move |state: &G| Arc::clone(&project(state).collection().entities);
        EntitySelectors {
            select_ids: create_selector(ids, |ids: &SharedIds<Id>| Arc::clone(ids)),
            select_entities: create_selector(entities, |entities: &SharedEntities<Id, T>| {
                Arc::clone(entities)
            }),
            select_all: create_selector(
                move |state: &G| (ids(state), entities(state)),
                |(ids, entities): &(SharedIds<Id>, SharedEntities<Id, T>)| {
                    Arc::new(ids.iter().filter_map(|id| entities.get(id)).cloned().collect())
                },
            ),
            select_total: create_selector(ids, |ids: &SharedIds<Id>| ids.len()),
            select_by_id: SelectById {
                project,
                _marker: PhantomData,
            },
        }
    }

    // ─── Internals ───────────────────────────────────────────

    fn insert_if_absent(&self, collection: &mut EntityCollection<Id, T>, entity: T) -> bool {
        let id = self.select_id(&entity);
        if collection.entities.contains_key(&id) {
            tracing::trace!(?id, "entity already present, add skipped");
            return false;
        }
        Arc::make_mut(&mut collection.ids).push(id.clone());
        Arc::make_mut(&mut collection.entities).insert(id, entity);
        true
    }

    fn insert_or_replace(&self, collection: &mut EntityCollection<Id, T>, entity: T) {
        let id = self.select_id(&entity);
        let entities = Arc::make_mut(&mut collection.entities);
        if let Some(existing) = entities.get_mut(&id) {
            *existing = entity;
        } else {
            Arc::make_mut(&mut collection.ids).push(id.clone());
            entities.insert(id, entity);
        }
    }

    fn apply_update(&self, collection: &mut EntityCollection<Id, T>, update: &Update<Id>) -> bool {
        let Some(current) = collection.entities.get(&update.id) else {
            tracing::trace!(id = ?update.id, "update for missing entity ignored");
            return false;
        };

        let updated = match merge::assign_into(current, update.changes.clone()) {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(id = ?update.id, error = %err, "entity update rejected");
                return false;
            }
        };

        let new_id = self.select_id(&updated);
        let entities = Arc::make_mut(&mut collection.entities);
        if new_id != update.id {
            entities.remove(&update.id);
            let ids = Arc::make_mut(&mut collection.ids);
            if entities.contains_key(&new_id) {
                ids.retain(|existing| *existing != new_id);
            }
            if let Some(slot) = ids.iter_mut().find(|id| **id == update.id) {
                *slot = new_id.clone();
            }
        }
        entities.insert(new_id, updated);
        true
    }

    /// Stable re-sort; an `ids` list already in order keeps its identity.
    fn resort(&self, collection: &mut EntityCollection<Id, T>) {
        let SortOrder::By(compare) = &self.sort_order else {
            return;
        };
        let EntityCollection { ids, entities } = collection;
        let order = |a: &Id, b: &Id| match (entities.get(a), entities.get(b)) {
            (Some(a), Some(b)) => compare(a, b),
            _ => Ordering::Equal,
        };
        if ids.windows(2).all(|pair| order(&pair[0], &pair[1]) != Ordering::Greater) {
            return;
        }
        Arc::make_mut(ids).sort_by(order);
    }
}

/// Collection selectors derived from an [`EntityAdapter`].
pub struct EntitySelectors<G, St, Id, T> {
    /// Ordered ids
    pub select_ids: Memoized<G, SharedIds<Id>, SharedIds<Id>>,
    /// Id → entity map
    pub select_entities: Memoized<G, SharedEntities<Id, T>, SharedEntities<Id, T>>,
    /// Entities in id order
    pub select_all: Memoized<G, (SharedIds<Id>, SharedEntities<Id, T>), Arc<Vec<T>>>,
    /// Entity count
    pub select_total: Memoized<G, SharedIds<Id>, usize>,
    /// Lookup by id
    pub select_by_id: SelectById<G, St, Id, T>,
}

/// Parametric selector: one entity by id.
pub struct SelectById<G, St, Id, T> {
    project: fn(&G) -> &Arc<St>,
    _marker: PhantomData<fn() -> (Id, T)>,
}

impl<G, St, Id, T> SelectById<G, St, Id, T>
where
    Id: Eq + Hash,
    T: Clone,
    St: EntityStateView<Id, T>,
{
    /// The entity with `id`, if present.
    pub fn select(&self, state: &G, id: &Id) -> Option<T> {
        (self.project)(state).collection().get(id).cloned()
    }
}
