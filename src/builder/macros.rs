//! Macros for ergonomic form data construction.

/// Build a [`FormData`](crate::core::FormData) map from `key => value` pairs.
///
/// Values are any expressions `serde_json::json!` can convert.
///
/// # Example
///
/// ```
/// use stepwise::form_data;
///
/// let data = form_data! {
///     "name" => "Lena",
///     "age" => 34,
///     "tags" => ["a", "b"],
/// };
///
/// assert_eq!(data["age"], 34);
/// assert_eq!(data.len(), 3);
/// ```
#[macro_export]
macro_rules! form_data {
    () => {
        $crate::core::FormData::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::core::FormData::new();
        $(
            data.insert(::std::string::String::from($key), $crate::__serde_json::json!($value));
        )+
        data
    }};
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn form_data_macro_builds_map() {
        let data = form_data! {
            "name" => "Lena",
            "age" => 34,
            "employed" => true,
        };

        assert_eq!(data["name"], json!("Lena"));
        assert_eq!(data["age"], json!(34));
        assert_eq!(data["employed"], json!(true));
    }

    #[test]
    fn form_data_macro_supports_empty() {
        let data = form_data! {};
        assert!(data.is_empty());
    }

    #[test]
    fn later_keys_overwrite_earlier() {
        let data = form_data! { "x" => 1, "x" => 2 };
        assert_eq!(data.len(), 1);
        assert_eq!(data["x"], json!(2));
    }
}
