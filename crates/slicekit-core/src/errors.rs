//! Unified error system for slicekit
//!
//! Two kinds of error live here. [`SliceError`] covers infrastructure
//! failures (configuration, routing, merge). [`SerializableError`] is the
//! plain representation domain errors are stored as inside slice state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error type for slicekit infrastructure operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SliceError {
    /// A timestamp string is not valid RFC 3339
    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp {
        /// The rejected input
        value: String,
        /// Parser message
        message: String,
    },

    /// A partial update could not be merged into the current value
    #[error("Merge failed: {message}")]
    Merge {
        /// Error message describing the merge failure
        message: String,
    },

    /// Slice configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// An action was dispatched to a slice that is not registered
    #[error("Unknown slice: {name}")]
    UnknownSlice {
        /// Slice name taken from the action type
        name: String,
    },

    /// A slice was handed a payload type it does not reduce
    #[error("Action '{action_type}' carries a payload slice '{slice}' does not accept")]
    PayloadMismatch {
        /// Slice the action was routed to
        slice: String,
        /// Full namespaced action type
        action_type: String,
    },

    /// Two slices were registered under the same name
    #[error("Duplicate slice: {name}")]
    DuplicateSlice {
        /// The conflicting name
        name: String,
    },
}

impl SliceError {
    /// Create an invalid timestamp error
    pub fn invalid_timestamp(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a merge error
    pub fn merge(message: impl Into<String>) -> Self {
        Self::Merge {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown slice error
    pub fn unknown_slice(name: impl Into<String>) -> Self {
        Self::UnknownSlice { name: name.into() }
    }

    /// Create a payload mismatch error
    pub fn payload_mismatch(slice: impl Into<String>, action_type: impl Into<String>) -> Self {
        Self::PayloadMismatch {
            slice: slice.into(),
            action_type: action_type.into(),
        }
    }

    /// Create a duplicate slice error
    pub fn duplicate_slice(name: impl Into<String>) -> Self {
        Self::DuplicateSlice { name: name.into() }
    }
}

impl From<serde_json::Error> for SliceError {
    fn from(err: serde_json::Error) -> Self {
        Self::merge(err.to_string())
    }
}

/// Plain, storable form of an arbitrary error value.
///
/// `stack` carries the `source()` chain, one cause per line, or `None` when
/// the error has no underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SerializableError {
    /// Short type name of the original error
    pub name: String,
    /// `Display` output of the original error
    pub message: String,
    /// Cause chain, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl SerializableError {
    /// Create an error from a name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Attach a cause chain.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Map any error value to its plain representation.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name: short_type_name::<E>().to_string(),
            message: error.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

impl fmt::Display for SerializableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// `std::io::Error` for `std::io::Error`, `Error` for `my_crate::Error<T>`.
fn short_type_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
