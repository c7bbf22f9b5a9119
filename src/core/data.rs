//! Form data values.
//!
//! Field values are opaque to the engine, so they are carried as JSON values
//! keyed by field name.

use serde_json::{Map, Value};

/// Key/value map of field values.
pub type FormData = Map<String, Value>;

/// Merge `update` over `base`, returning a new map.
///
/// Keys present in both maps take the value from `update` (last write wins).
/// Neither input is modified.
///
/// # Example
///
/// ```rust
/// use stepwise::core::merge_data;
/// use stepwise::form_data;
///
/// let base = form_data! { "name" => "Sara", "age" => 16 };
/// let update = form_data! { "age" => 17 };
///
/// let merged = merge_data(&base, &update);
/// assert_eq!(merged["name"], "Sara");
/// assert_eq!(merged["age"], 17);
/// assert_eq!(base["age"], 16);
/// ```
pub fn merge_data(base: &FormData, update: &FormData) -> FormData {
    let mut merged = base.clone();
    for (key, value) in update {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Check whether a value counts as "not provided".
///
/// Missing keys, `null` and the empty string are all treated as empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
