//! Slice configuration
//!
//! A slice's name, debug flag and initial seed can be declared in TOML:
//!
//! ```toml
//! name = "todos"
//! debug = true
//!
//! [initialState]
//! status = "ready"
//! entities = [{ id = "1", title = "write docs", done = false }]
//! ```

use crate::entity_slice::CreateEntitySliceOptions;
use crate::entity_state::{EntityState, EntityStateSeed};
use crate::model_slice::ModelSliceOptions;
use crate::model_state::ModelStateSeed;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slicekit_core::SliceError;
use std::hash::Hash;
use std::sync::Arc;

/// Declarative slice configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliceConfig<Seed> {
    /// Slice name
    pub name: String,
    /// Emit a diagnostic snapshot at construction
    pub debug: bool,
    /// Partial initial state
    pub initial_state: Seed,
}

impl<Seed: Default> Default for SliceConfig<Seed> {
    fn default() -> Self {
        Self {
            name: String::new(),
            debug: false,
            initial_state: Seed::default(),
        }
    }
}

impl<Seed: DeserializeOwned + Default> SliceConfig<Seed> {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SliceError> {
        let config: Self = toml::from_str(text).map_err(|err| SliceError::config(err.to_string()))?;
        if config.name.is_empty() {
            return Err(SliceError::config("slice name must not be empty"));
        }
        Ok(config)
    }
}

impl<T, S, E> SliceConfig<ModelStateSeed<T, S, E>> {
    /// Split into a slice name and model slice options.
    pub fn into_model_options(self) -> (String, ModelSliceOptions<T, S, E>) {
        let options = ModelSliceOptions::default()
            .with_debug(self.debug)
            .with_initial_state(self.initial_state);
        (self.name, options)
    }
}

impl<T, S> SliceConfig<EntityStateSeed<T, S>> {
    /// Build entity slice options from this configuration.
    pub fn into_entity_options<G, Id>(
        self,
        select_slice_state: fn(&G) -> &Arc<EntityState<Id, T, S>>,
        select_id: impl Fn(&T) -> Id + Send + Sync + 'static,
    ) -> CreateEntitySliceOptions<G, Id, T, S>
    where
        Id: Eq + Hash,
    {
        CreateEntitySliceOptions::new(&self.name, select_slice_state, select_id)
            .with_debug(self.debug)
            .with_initial_state(self.initial_state)
    }
}
