//! `{...envelope, model}` state container.

use serde::{Deserialize, Serialize};
use slicekit_core::{HasMeta, MetaSeed, MetaState, SerializableError, StateStatus};

/// State of a single-model slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState<T, S = StateStatus, E = SerializableError> {
    /// Shared envelope
    #[serde(flatten)]
    pub meta: MetaState<S, E>,
    /// The domain value owned by the slice
    pub model: T,
}

impl<T: Default, S: Default, E> Default for ModelState<T, S, E> {
    fn default() -> Self {
        Self {
            meta: MetaState::default(),
            model: T::default(),
        }
    }
}

impl<T: Default, S: Default, E> ModelState<T, S, E> {
    /// Build a state from a partial seed; absent fields take defaults.
    pub fn create(seed: ModelStateSeed<T, S, E>) -> Self {
        Self {
            meta: MetaState::create(seed.meta),
            model: seed.model.unwrap_or_default(),
        }
    }
}

impl<T, S, E> HasMeta for ModelState<T, S, E> {
    type Status = S;
    type Error = E;

    fn meta(&self) -> &MetaState<S, E> {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MetaState<S, E> {
        &mut self.meta
    }
}

/// Partial seed for a [`ModelState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelStateSeed<T, S = StateStatus, E = SerializableError> {
    /// Envelope fields
    #[serde(flatten)]
    pub meta: MetaSeed<S, E>,
    /// Initial model
    pub model: Option<T>,
}

impl<T, S, E> Default for ModelStateSeed<T, S, E> {
    fn default() -> Self {
        Self {
            meta: MetaSeed::default(),
            model: None,
        }
    }
}

impl<T, S, E> ModelStateSeed<T, S, E> {
    /// Seed carrying only a model.
    pub fn with_model(model: T) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    /// Set the initial status.
    pub fn status(mut self, status: S) -> Self {
        self.meta.status = Some(status);
        self
    }
}
