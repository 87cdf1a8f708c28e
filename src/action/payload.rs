use serde_json::Value;
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier types usable as handler-table keys.
///
/// Usually a fieldless `enum` listing every action the application knows.
/// Implemented for every type meeting the bounds.
pub trait ActionKey: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> ActionKey for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

/// One dispatched action as delivered to a store.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload<K, B = Value> {
    pub action_id: K,
    pub body: B,
}

impl<K, B> Payload<K, B> {
    /// Create a payload for `action_id` carrying `body`.
    pub fn new(action_id: K, body: B) -> Self {
        Self { action_id, body }
    }
}
