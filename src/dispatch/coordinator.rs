use crate::error::HandlerError;
use crate::store::StoreId;
use std::fmt;

/// Registration token handed out by a dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DispatchToken(pub String);

impl DispatchToken {
    /// Wrap a dispatcher token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Display for DispatchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something a store can wait on: a raw dispatcher token or another store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WaitTarget {
    Token(DispatchToken),
    Store(StoreId),
}

impl From<DispatchToken> for WaitTarget {
    fn from(token: DispatchToken) -> Self {
        WaitTarget::Token(token)
    }
}

impl From<StoreId> for WaitTarget {
    fn from(id: StoreId) -> Self {
        WaitTarget::Store(id)
    }
}

/// Dispatcher-side ordering of store handlers.
///
/// `wait_for` is called from inside a running handler and must return only
/// after the handlers behind `targets` have processed the current action.
pub trait Coordinator: Send + Sync {
    fn wait_for(&self, targets: &[WaitTarget]) -> Result<(), HandlerError>;
}
