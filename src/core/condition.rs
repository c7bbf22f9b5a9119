//! Visibility conditions for steps.
//!
//! A condition is a pure predicate over the aggregated form data. It decides
//! whether a step is currently part of the form.

use super::data::FormData;
use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether a step is visible.
///
/// Conditions are re-evaluated against the current data every time they are
/// checked, so a step can appear or disappear as earlier answers change.
///
/// # Example
///
/// ```rust
/// use stepwise::core::Condition;
/// use stepwise::form_data;
///
/// let adults_only = Condition::new(|data| {
///     data.get("age").and_then(|v| v.as_i64()).is_some_and(|age| age >= 18)
/// });
///
/// assert!(adults_only.check(&form_data! { "age" => 30 }));
/// assert!(!adults_only.check(&form_data! { "age" => 16 }));
/// assert!(!adults_only.check(&form_data! {}));
/// ```
#[derive(Clone)]
pub struct Condition {
    predicate: Arc<dyn Fn(&FormData) -> bool + Send + Sync>,
}

impl Condition {
    /// Create a condition from a pure predicate.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&FormData) -> bool + Send + Sync + 'static,
    {
        Condition {
            predicate: Arc::new(predicate),
        }
    }

    /// Condition that holds when `key` is present and equal to `value`.
    pub fn equals(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let key = key.into();
        let value = value.into();
        Self::new(move |data| data.get(&key) == Some(&value))
    }

    /// Condition that holds when `key` is present and not empty.
    pub fn present(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |data| !super::data::is_empty_value(data.get(&key)))
    }

    /// Evaluate the condition against the aggregated form data.
    pub fn check(&self, data: &FormData) -> bool {
        (self.predicate)(data)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}
