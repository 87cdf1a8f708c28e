//! Flux stores.
//!
//! A store owns one piece of application state and changes it only while
//! handling a dispatched action. Every update made during one action is
//! batched and committed at the end, followed by at most one `change` event.

mod config;
mod cycle;
mod id;
mod store;

pub use config::StoreConfig;
pub use id::StoreId;
pub use store::{Store, WeakStore};
