//! Dispatched actions.

mod payload;

pub use payload::{ActionKey, Payload};
