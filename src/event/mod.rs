//! Change notification for stores.
//!
//! Stores broadcast a single payload-less `change` event. Listeners read the
//! new state back from the store themselves.

mod emitter;

pub use emitter::{ChangeEmitter, StoreEvent, Subscription};
