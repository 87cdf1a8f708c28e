//! Store state representation.
//!
//! State is a string-keyed map of JSON values. Updates are either merged
//! shallowly over the current map or replace it wholesale.

mod map;

pub use map::{merge_into, to_partial, StateMap};
