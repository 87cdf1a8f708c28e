use crate::error::StoreError;
use serde_json::{Map, Value};

/// The state held by a store: top-level keys mapped to arbitrary values.
pub type StateMap = Map<String, Value>;

/// Convert an update value into a map of top-level keys.
///
/// `null` is treated as an empty update.
pub fn to_partial(value: Value) -> Result<StateMap, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(StateMap::new()),
        other => Err(StoreError::InvalidPartial {
            kind: kind_of(&other),
        }),
    }
}

/// Shallow merge: keys in `partial` overwrite keys in `target`, all other
/// keys of `target` are kept.
pub fn merge_into(target: &mut StateMap, partial: StateMap) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
