//! Action envelope
//!
//! Every action is `{type, payload}` where `type` is namespaced as
//! `"{slice}/{kind}"`. The slice prefix is what the store routes on.
//!
//! Kinds never contain `/`, so the split is on the last separator and a
//! slice name may itself be a path such as `"features/todos"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload enums name their own action kind.
pub trait ActionKind {
    /// Unqualified kind, e.g. `"addOne"`.
    fn kind(&self) -> &'static str;
}

/// A dispatched action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action<P> {
    /// Namespaced action type
    #[serde(rename = "type")]
    pub action_type: String,
    /// Operation payload
    pub payload: P,
}

impl<P> Action<P> {
    /// Create an action with an explicit type string.
    pub fn new(action_type: impl Into<String>, payload: P) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }

    /// Slice name, i.e. the text before the last `/`.
    pub fn slice_name(&self) -> &str {
        self.action_type
            .rsplit_once('/')
            .map_or(self.action_type.as_str(), |(slice, _)| slice)
    }

    /// Kind, i.e. the text after the last `/`.
    pub fn kind(&self) -> &str {
        self.action_type
            .rsplit_once('/')
            .map_or("", |(_, kind)| kind)
    }
}

impl<P: ActionKind> Action<P> {
    /// Namespace `payload` under `slice`.
    pub fn for_slice(slice: &str, payload: P) -> Self {
        let action_type = format!("{slice}/{}", payload.kind());
        Self {
            action_type,
            payload,
        }
    }
}

impl<P> fmt::Display for Action<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Ping {
        Ping(u32),
    }

    impl ActionKind for Ping {
        fn kind(&self) -> &'static str {
            "ping"
        }
    }

    #[test]
    fn test_for_slice_namespaces_type() {
        let action = Action::for_slice("net", Ping::Ping(1));
        assert_eq!(action.action_type, "net/ping");
        assert_eq!(action.slice_name(), "net");
        assert_eq!(action.kind(), "ping");
    }

    #[test]
    fn test_nested_slice_name() {
        let action = Action::for_slice("features/net", Ping::Ping(1));
        assert_eq!(action.action_type, "features/net/ping");
        assert_eq!(action.slice_name(), "features/net");
        assert_eq!(action.kind(), "ping");
    }

    #[test]
    fn test_unnamespaced_type() {
        let action = Action::new("bare", ());
        assert_eq!(action.slice_name(), "bare");
        assert_eq!(action.kind(), "");
    }

    #[test]
    fn test_wire_shape() {
        let action = Action::new("counter/set", 3);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, serde_json::json!({"type": "counter/set", "payload": 3}));
    }
}
