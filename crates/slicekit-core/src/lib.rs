//! slicekit Core - Envelope and Collaborator Foundation
//!
//! This crate provides the pieces every generated slice is assembled from.
//! It contains no slice factories itself; those live in `slicekit`.
//!
//! # Modules
//!
//! ## Envelope
//! - [`meta::MetaState`]: `{status, error, lastModified, lastHydrated}`
//! - [`meta::StateStatus`]: default lifecycle status domain
//! - [`time::IsoTimestamp`]: ISO-8601 timestamp with explicit offset
//!
//! ## Collaborators
//! - [`adapter::EntityAdapter`]: normalized `{ids, entities}` collection
//! - [`selector::Memoized`]: input/projection selectors with identity memoization
//! - [`merge`]: deep and shallow JSON merge used for partial updates
//! - [`errors::SerializableError`]: plain, storable error representation
//!
//! ## Effect Interfaces
//! - [`effects::ClockEffects`]: timestamp source, with the production
//!   [`effects::SystemClock`] handler
//!
//! ## Envelope Recency Law
//! - hydrate: `lastHydrated = now`, `lastModified = null`
//! - modify:  `lastModified = now`, `lastHydrated = null`
//! - status / error writes touch neither timestamp

#![forbid(unsafe_code)]

/// Action envelope and namespacing
pub mod action;

/// Normalized entity collection adapter
pub mod adapter;

/// Pure effect interfaces and production handlers
pub mod effects;

/// Unified error handling and the error serializer
pub mod errors;

/// Deep and shallow merge for partial updates
pub mod merge;

/// Envelope state shared by every slice
pub mod meta;

/// Memoized selectors
pub mod selector;

/// ISO-8601 timestamps
pub mod time;

pub use action::{Action, ActionKind};
pub use adapter::{
    Comparer, EntityAdapter, EntityCollection, EntitySelectors, EntityStateView, IdSelector,
    SelectById, SharedEntities, SharedIds, SortOrder, Update,
};
pub use effects::{ClockEffects, SystemClock};
pub use errors::{SerializableError, SliceError};
pub use meta::{HasMeta, MetaSeed, MetaState, Recency, StateStatus};
pub use selector::{create_selector, Memoized, Selector, SelectorInput};
pub use time::IsoTimestamp;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Bounds shared by every value stored in slice state.
///
/// State must be cloneable for the immutable update discipline, serializable
/// for diagnostics and configuration, and shareable across threads.
pub trait StateValue: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> StateValue for T where T: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{}

/// Bounds for a caller-defined status domain.
pub trait Status: StateValue + PartialEq + Default {}

impl<T> Status for T where T: StateValue + PartialEq + Default {}

/// Bounds for entity identifiers.
pub trait EntityId: StateValue + Eq + Hash {}

impl<T> EntityId for T where T: StateValue + Eq + Hash {}
