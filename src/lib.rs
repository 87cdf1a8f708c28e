//! # Flux Store
//!
//! Flux-style stores for Rust.
//!
//! A [`Store`] owns a map of application state and only changes it while
//! handling a dispatched action. Handlers can update the state as many times
//! as they like; the store commits the combined result when the handler is
//! done and emits a single `change` event, so listeners never observe a
//! half-applied action.
//!
//! ## Pieces
//!
//! - [`Store`] - state, handler table and the dispatch entry point
//! - [`Payload`] - one dispatched action: its key and body
//! - [`ChangeEmitter`] / [`Subscription`] - `change` event listeners
//! - [`Coordinator`] - hook into the application's dispatcher for `wait_for`
//! - [`StoreError`] - everything that can go wrong

pub mod action;
pub mod dispatch;
mod error;
pub mod event;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use action::{ActionKey, Payload};
pub use dispatch::{Coordinator, DispatchToken, WaitTarget};
pub use error::{HandlerError, StoreError};
pub use event::{ChangeEmitter, StoreEvent, Subscription};
pub use state::StateMap;
pub use store::{Store, StoreConfig, StoreId, WeakStore};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store: Store<&'static str> = Store::new();
        store.register("ADD", |store, _, _| {
            store.set_state(json!({ "count": 1 }))?;
            Ok(())
        });

        store.handle(&Payload::new("ADD", json!({}))).unwrap();
        assert_eq!(store.get_state()["count"], 1);
    }
}
