//! Common type definitions for helperbox
//!
//! Keyed data travels as an insertion-ordered JSON object ([`Map`]), lists as
//! plain vectors. The helpers here convert leaf values to the text form used
//! when they are written into XML, CSV, SQL or compared as substrings.

use serde_json::Value;

/// Insertion-ordered associative map
pub type Map = serde_json::Map<String, Value>;

/// One row of a list-of-maps table
pub type Row = Map;

/// Render a leaf value as text
///
/// Strings are returned as-is, numbers in their canonical form, `true` as
/// `"1"`, `false` and `null` as the empty string. Containers are rendered as
/// compact JSON.
///
/// # Example
///
/// ```rust
/// use helperbox::types::scalar_to_string;
/// use serde_json::json;
///
/// assert_eq!(scalar_to_string(&json!("abc")), "abc");
/// assert_eq!(scalar_to_string(&json!(42)), "42");
/// assert_eq!(scalar_to_string(&json!(true)), "1");
/// assert_eq!(scalar_to_string(&json!(null)), "");
/// ```
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Check whether a value nests further values
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// View a list as a map keyed by position
///
/// Objects are cloned unchanged; arrays become `{"0": .., "1": .., ...}`.
/// Scalars yield `None`.
pub fn as_keyed(value: &Value) -> Option<Map> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&json!("Вася")), "Вася");
        assert_eq!(scalar_to_string(&json!(1.5)), "1.5");
        assert_eq!(scalar_to_string(&json!(-3)), "-3");
        assert_eq!(scalar_to_string(&json!(false)), "");
        assert_eq!(scalar_to_string(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_as_keyed() {
        let keyed = as_keyed(&json!(["a", "b"])).unwrap();
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["0", "1"]);
        assert_eq!(keyed["1"], json!("b"));

        let keyed = as_keyed(&json!({"z": 1, "a": 2})).unwrap();
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["z", "a"]);

        assert!(as_keyed(&json!(7)).is_none());
        assert!(is_container(&json!({})));
        assert!(!is_container(&json!("x")));
    }
}
