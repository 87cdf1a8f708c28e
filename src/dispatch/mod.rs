//! Hooks into the application's dispatcher.
//!
//! The dispatcher itself lives outside this crate. Stores only need a way to
//! ask it to finish running other stores' handlers first.

mod coordinator;

pub use coordinator::{Coordinator, DispatchToken, WaitTarget};
