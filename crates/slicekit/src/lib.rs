//! slicekit - Standardized State Slices
//!
//! Factories that generate self-contained state slices: a state shape
//! wrapped in the shared envelope, a reducer, namespaced action creators,
//! and memoized selectors.
//!
//! # Factories
//!
//! - [`make_model_slice`]: one domain value, `{...envelope, model}`
//! - [`create_entity_slice`]: a normalized collection,
//!   `{...envelope, ids, entities}`
//!
//! # Hosting
//!
//! - [`Store`]: owns the global state, routes actions to registered
//!   reducers by slice name, applies them in dispatch order
//!
//! # Example
//!
//! ```rust,ignore
//! let counter = make_model_slice("counter", select_counter, ModelSliceOptions::default()
//!     .with_initial_state(ModelStateSeed::with_model(Counter { count: 0 })));
//!
//! let mut store = Store::new(AppState::new(counter.reducer.initial_state()));
//! store.register(counter_mut, counter.reducer.clone())?;
//!
//! store.dispatch(counter.actions.update(json!({"count": 5})))?;
//! assert_eq!(store.select(&counter.selectors.select_model).count, 5);
//! ```

#![forbid(unsafe_code)]

/// Slice configuration loaded from TOML
pub mod config;

/// Construction-time diagnostic sink
pub mod diagnostics;

/// Entity slice factory
pub mod entity_slice;

/// Entity state container
pub mod entity_state;

/// Model slice factory
pub mod model_slice;

/// Model state container
pub mod model_state;

/// Reducer contract
pub mod reducer;

/// Envelope selectors
pub mod selectors;

/// Dispatch host
pub mod store;

pub use config::SliceConfig;
pub use diagnostics::{DiagnosticSink, SliceKind, SliceSnapshot, TracingSink};
pub use entity_slice::{
    create_entity_slice, CreateEntitySliceOptions, EntityAction, EntityActions, EntityReducer,
    EntitySlice, EntitySliceSelectors,
};
pub use entity_state::{EntityState, EntityStateSeed};
pub use model_slice::{
    make_model_slice, ModelAction, ModelActions, ModelReducer, ModelSelectors, ModelSlice,
    ModelSliceOptions,
};
pub use model_state::{ModelState, ModelStateSeed};
pub use reducer::Reducer;
pub use selectors::MetaSelectors;
pub use store::Store;

// Re-export the foundation so most callers need only this crate
pub use slicekit_core::merge;
pub use slicekit_core::{
    create_selector, Action, ActionKind, ClockEffects, EntityAdapter, EntityCollection, HasMeta,
    IsoTimestamp, Memoized, MetaSeed, MetaState, Recency, Selector, SerializableError,
    SliceError, SortOrder, StateStatus, SystemClock, Update,
};
