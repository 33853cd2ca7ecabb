//! # Envelope State
//!
//! [`MetaState`] is the bookkeeping attached to every slice:
//! lifecycle status, last recorded error, and two mutually exclusive
//! recency stamps.
//!
//! ```text
//! hydrate      → lastHydrated = now, lastModified = null
//! modify       → lastModified = now, lastHydrated = null
//! set status   → timestamps untouched
//! set error    → timestamps untouched
//! ```

use crate::errors::SerializableError;
use crate::time::IsoTimestamp;
use serde::{Deserialize, Serialize};

/// Default lifecycle status domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A load is in flight
    Loading,
    /// Data is present and current
    Ready,
    /// The last load failed
    Error,
}

/// Envelope fields shared by every slice state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaState<S = StateStatus, E = SerializableError> {
    /// Current lifecycle status
    pub status: S,
    /// Last recorded failure
    pub error: Option<E>,
    /// Last local mutation
    pub last_modified: Option<IsoTimestamp>,
    /// Last population from an authoritative source
    pub last_hydrated: Option<IsoTimestamp>,
}

/// Which recency signal an envelope currently carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency<'a> {
    /// Neither timestamp is set
    Pristine,
    /// Locally modified at the given time
    Modified(&'a IsoTimestamp),
    /// Hydrated at the given time
    Hydrated(&'a IsoTimestamp),
}

impl<S: Default, E> Default for MetaState<S, E> {
    fn default() -> Self {
        Self {
            status: S::default(),
            error: None,
            last_modified: None,
            last_hydrated: None,
        }
    }
}

impl<S: Default, E> MetaState<S, E> {
    /// Build an envelope from a partial seed; absent fields use defaults.
    pub fn create(seed: MetaSeed<S, E>) -> Self {
        Self {
            status: seed.status.unwrap_or_default(),
            error: seed.error,
            last_modified: seed.last_modified,
            last_hydrated: seed.last_hydrated,
        }
    }
}

impl<S, E> MetaState<S, E> {
    /// Record a population from an authoritative source.
    pub fn mark_hydrated(&mut self, at: IsoTimestamp) {
        self.last_modified = None;
        self.last_hydrated = Some(at);
    }

    /// Record a local mutation.
    pub fn mark_modified(&mut self, at: IsoTimestamp) {
        self.last_hydrated = None;
        self.last_modified = Some(at);
    }

    /// Replace the status only.
    pub fn set_status(&mut self, status: S) {
        self.status = status;
    }

    /// Replace the error only.
    pub fn set_error(&mut self, error: Option<E>) {
        self.error = error;
    }

    /// The recency signal currently carried.
    ///
    /// A seed may carry both stamps; hydration wins in that case.
    pub fn recency(&self) -> Recency<'_> {
        match (&self.last_hydrated, &self.last_modified) {
            (Some(at), _) => Recency::Hydrated(at),
            (None, Some(at)) => Recency::Modified(at),
            (None, None) => Recency::Pristine,
        }
    }
}

/// Partial envelope used to seed an initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetaSeed<S = StateStatus, E = SerializableError> {
    /// Initial status
    pub status: Option<S>,
    /// Initial error
    pub error: Option<E>,
    /// Initial modification stamp
    pub last_modified: Option<IsoTimestamp>,
    /// Initial hydration stamp
    pub last_hydrated: Option<IsoTimestamp>,
}

impl<S, E> Default for MetaSeed<S, E> {
    fn default() -> Self {
        Self {
            status: None,
            error: None,
            last_modified: None,
            last_hydrated: None,
        }
    }
}

/// Access to the envelope embedded in a slice state.
pub trait HasMeta {
    /// Status domain
    type Status;
    /// Stored error type
    type Error;

    /// The envelope.
    fn meta(&self) -> &MetaState<Self::Status, Self::Error>;

    /// The envelope, mutably.
    fn meta_mut(&mut self) -> &mut MetaState<Self::Status, Self::Error>;
}

impl<S, E> HasMeta for MetaState<S, E> {
    type Status = S;
    type Error = E;

    fn meta(&self) -> &MetaState<S, E> {
        self
    }

    fn meta_mut(&mut self) -> &mut MetaState<S, E> {
        self
    }
}
