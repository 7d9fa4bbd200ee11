//! Array utility functions
//!
//! Key renaming, positional insertion, row filtering and de-duplication over
//! insertion-ordered maps, plus SQL value-list formatting. Sorting lives in
//! [`sort`] and lazy integer ranges in [`range`].

pub mod range;
pub mod sort;

use crate::types::{as_keyed, scalar_to_string, Map, Row};
use serde_json::Value;
use std::collections::HashSet;

pub use range::{range_generator, RangeGenerator};
pub use sort::{quick_sort, sort_by_date};

/// Default wrapper for string literals in [`create_sql_values_string`]
pub const DEFAULT_SQL_QUOTE: char = '"';

/// Return a copy of `map` where every key is prefixed with `prefix`
///
/// When `recursive` is true, nested maps and lists get the same treatment at
/// every depth (a nested list is keyed by position, so `[10, 20]` becomes
/// `{"_0": 10, "_1": 20}`). When false, nested values pass through unchanged.
///
/// # Example
///
/// ```rust
/// use helperbox::array::add_prefix_to_array_keys;
/// use serde_json::json;
///
/// let map = json!({"a": 1, "c": {"a": 11}});
/// let prefixed = add_prefix_to_array_keys(map.as_object().unwrap(), "_", true);
/// assert_eq!(serde_json::Value::Object(prefixed), json!({"_a": 1, "_c": {"_a": 11}}));
/// ```
pub fn add_prefix_to_array_keys(map: &Map, prefix: &str, recursive: bool) -> Map {
    rename_keys(map, recursive, &|key| format!("{prefix}{key}"))
}

/// Return a copy of `map` where every key is postfixed with `postfix`
///
/// Mirrors [`add_prefix_to_array_keys`].
pub fn add_postfix_to_array_keys(map: &Map, postfix: &str, recursive: bool) -> Map {
    rename_keys(map, recursive, &|key| format!("{key}{postfix}"))
}

/// Strip `prefix` from every key that starts with it
///
/// Inverse of [`add_prefix_to_array_keys`] for maps whose keys do not collide
/// once the prefix is removed. Nested lists come back keyed by position.
pub fn remove_prefix_from_array_keys(map: &Map, prefix: &str, recursive: bool) -> Map {
    rename_keys(map, recursive, &|key| {
        key.strip_prefix(prefix).unwrap_or(key).to_string()
    })
}

fn rename_keys(map: &Map, recursive: bool, rename: &dyn Fn(&str) -> String) -> Map {
    map.iter()
        .map(|(key, value)| {
            let value = match as_keyed(value) {
                Some(nested) if recursive => Value::Object(rename_keys(&nested, true, rename)),
                _ => value.clone(),
            };
            (rename(key), value)
        })
        .collect()
}

/// Insert `key => value` right after the entry named `after_key`
///
/// All other entries keep their relative order. When `after_key` is absent
/// the new entry lands after the first entry (position 1), or first in an
/// empty map. If `key` already exists its position is kept and the value is
/// the one that comes last in merge order.
///
/// # Example
///
/// ```rust
/// use helperbox::array::insert_after_key;
/// use serde_json::json;
///
/// let map = json!({"one": "first", "three": "third"});
/// let map = insert_after_key(map.as_object().unwrap(), "one", "two", json!("second"));
/// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["one", "two", "three"]);
/// ```
pub fn insert_after_key(map: &Map, after_key: &str, key: &str, value: Value) -> Map {
    let position = map
        .keys()
        .position(|k| k == after_key)
        .map_or(1, |index| index + 1);

    let mut result = Map::new();
    let mut pending = Some((key.to_string(), value));

    for (index, (k, v)) in map.iter().enumerate() {
        if index == position {
            if let Some((new_key, new_value)) = pending.take() {
                result.insert(new_key, new_value);
            }
        }
        result.insert(k.clone(), v.clone());
    }

    if let Some((new_key, new_value)) = pending {
        result.insert(new_key, new_value);
    }

    result
}

/// Keep rows whose fields contain every given substring
///
/// Each `(field, needle)` criterion with a non-empty needle retains only rows
/// whose `field` contains `needle` (case-sensitive). A criterion is skipped
/// when the first row has no value for `field`. Criteria combine with AND and
/// surviving rows keep their original order.
///
/// # Example
///
/// ```rust
/// use helperbox::array::filter_list_of_arrays_by_key_value_pairs;
/// use serde_json::json;
///
/// let rows = vec![
///     json!({"firstname": "John", "lastname": "Doe"}).as_object().unwrap().clone(),
///     json!({"firstname": "Вася", "lastname": "Пупкин"}).as_object().unwrap().clone(),
/// ];
/// let found = filter_list_of_arrays_by_key_value_pairs(&rows, &[("firstname", "Jo")]);
/// assert_eq!(found.len(), 1);
/// assert!(filter_list_of_arrays_by_key_value_pairs(&rows, &[("firstname", "jo")]).is_empty());
/// ```
pub fn filter_list_of_arrays_by_key_value_pairs(rows: &[Row], criteria: &[(&str, &str)]) -> Vec<Row> {
    let mut kept: Vec<&Row> = rows.iter().collect();

    for &(field, needle) in criteria {
        let schema_has_field = rows
            .first()
            .and_then(|row| row.get(field))
            .is_some_and(|value| !value.is_null());
        if needle.is_empty() || !schema_has_field {
            continue;
        }

        kept.retain(|row| {
            row.get(field)
                .is_some_and(|value| scalar_to_string(value).contains(needle))
        });
    }

    kept.into_iter().cloned().collect()
}

/// Remove exact structural duplicates, keeping first occurrences in order
///
/// Two entries are duplicates when their serialized forms match, so maps must
/// agree on key order as well as content.
///
/// # Example
///
/// ```rust
/// use helperbox::array::remove_duplicates_from_multi_dimensional_array;
/// use serde_json::json;
///
/// let rows = vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": 4}), json!({"a": 1, "b": 2})];
/// let unique = remove_duplicates_from_multi_dimensional_array(rows);
/// assert_eq!(unique, vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": 4})]);
/// ```
pub fn remove_duplicates_from_multi_dimensional_array(rows: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for row in rows {
        if seen.insert(row.to_string()) {
            result.push(row);
        }
    }

    result
}

/// Format values as a parenthesized SQL literal list
///
/// Numbers are written bare, booleans as `1`/`0`, null as `NULL`, everything
/// else wrapped in `quote` with embedded `quote` characters backslash-escaped.
///
/// # Example
///
/// ```rust
/// use helperbox::array::create_sql_values_string;
/// use serde_json::json;
///
/// let sql = create_sql_values_string(&[json!(1), json!("one"), json!("\"")], '"');
/// assert_eq!(sql, r#"(1, "one", "\"")"#);
/// ```
pub fn create_sql_values_string(values: &[Value], quote: char) -> String {
    let escaped_quote = format!("\\{quote}");
    let literals: Vec<String> = values
        .iter()
        .map(|value| match value {
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Null => "NULL".to_string(),
            other => {
                let text = scalar_to_string(other).replace(quote, &escaped_quote);
                format!("{quote}{text}{quote}")
            }
        })
        .collect();

    format!("({})", literals.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_add_prefix_to_array_keys() {
        assert!(add_prefix_to_array_keys(&Map::new(), "", true).is_empty());

        let flat = obj(json!({"a": 1, "b": 2}));
        assert_eq!(add_prefix_to_array_keys(&flat, "", true), flat);
        assert_eq!(
            add_prefix_to_array_keys(&flat, "_", true),
            obj(json!({"_a": 1, "_b": 2}))
        );

        let nested = obj(json!({"a": 1, "b": 2, "c": {"a": 11, "b": 22}}));
        assert_eq!(
            add_prefix_to_array_keys(&nested, "_", true),
            obj(json!({"_a": 1, "_b": 2, "_c": {"_a": 11, "_b": 22}}))
        );
        assert_eq!(
            add_prefix_to_array_keys(&nested, "_", false),
            obj(json!({"_a": 1, "_b": 2, "_c": {"a": 11, "b": 22}}))
        );
    }

    #[test]
    fn test_add_prefix_keys_nested_list() {
        let map = obj(json!({"list": [10, 20]}));
        assert_eq!(
            add_prefix_to_array_keys(&map, "p.", true),
            obj(json!({"p.list": {"p.0": 10, "p.1": 20}}))
        );
        assert_eq!(
            add_prefix_to_array_keys(&map, "p.", false),
            obj(json!({"p.list": [10, 20]}))
        );
    }

    #[test]
    fn test_add_postfix_to_array_keys() {
        let flat = obj(json!({"a": 1, "b": 2}));
        assert_eq!(add_postfix_to_array_keys(&flat, "", true), flat);
        assert_eq!(
            add_postfix_to_array_keys(&flat, "_", true),
            obj(json!({"a_": 1, "b_": 2}))
        );

        let nested = obj(json!({"a": 1, "b": 2, "c": {"a": 11, "b": 22}}));
        assert_eq!(
            add_postfix_to_array_keys(&nested, "_", true),
            obj(json!({"a_": 1, "b_": 2, "c_": {"a_": 11, "b_": 22}}))
        );
        assert_eq!(
            add_postfix_to_array_keys(&nested, "_", false),
            obj(json!({"a_": 1, "b_": 2, "c_": {"a": 11, "b": 22}}))
        );
    }

    #[test]
    fn test_prefix_round_trip() {
        let map = obj(json!({"id": 7, "user": {"name": "Ann", "tags": {"x": true}}}));
        let prefixed = add_prefix_to_array_keys(&map, "tmp_", true);
        assert_eq!(remove_prefix_from_array_keys(&prefixed, "tmp_", true), map);
    }

    #[test]
    fn test_insert_after_key() {
        let map = obj(json!({"one": "first", "three": "third"}));
        let result = insert_after_key(&map, "one", "two", json!("second"));
        assert_eq!(
            result.iter().collect::<Vec<_>>(),
            vec![
                (&"one".to_string(), &json!("first")),
                (&"two".to_string(), &json!("second")),
                (&"three".to_string(), &json!("third")),
            ]
        );

        // After the last entry
        let result = insert_after_key(&map, "three", "four", json!("fourth"));
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["one", "three", "four"]);
    }

    #[test]
    fn test_insert_after_missing_key() {
        let map = obj(json!({"a": 1, "b": 2, "c": 3}));
        let result = insert_after_key(&map, "zzz", "new", json!(0));
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["a", "new", "b", "c"]);

        let result = insert_after_key(&Map::new(), "zzz", "new", json!(0));
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["new"]);
    }

    #[test]
    fn test_insert_existing_key_keeps_position() {
        let map = obj(json!({"a": 1, "b": 2, "c": 3}));
        let result = insert_after_key(&map, "c", "a", json!(9));
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(result["a"], json!(9));
    }

    #[test]
    fn test_filter_list_of_arrays() {
        let rows = vec![
            obj(json!({"firstname": "John", "lastname": "Doe"})),
            obj(json!({"firstname": "Вася", "lastname": "Пупкин"})),
        ];

        assert_eq!(
            filter_list_of_arrays_by_key_value_pairs(&rows, &[("firstname", "Jo")]),
            vec![rows[0].clone()]
        );
        assert!(filter_list_of_arrays_by_key_value_pairs(&rows, &[("firstname", "jo")]).is_empty());
        assert_eq!(
            filter_list_of_arrays_by_key_value_pairs(&rows, &[("lastname", "пкин")]),
            vec![rows[1].clone()]
        );
    }

    #[test]
    fn test_filter_skips_unknown_and_empty_criteria() {
        let rows = vec![
            obj(json!({"name": "alpha", "n": 10})),
            obj(json!({"name": "beta", "n": 21})),
            obj(json!({"name": "alphabet", "n": 12})),
        ];

        let all = filter_list_of_arrays_by_key_value_pairs(&rows, &[("missing", "x"), ("name", "")]);
        assert_eq!(all, rows);

        // AND across criteria, numbers compared by their text
        let found = filter_list_of_arrays_by_key_value_pairs(&rows, &[("name", "alpha"), ("n", "1")]);
        assert_eq!(found, vec![rows[0].clone(), rows[2].clone()]);
        let found = filter_list_of_arrays_by_key_value_pairs(&rows, &[("name", "alpha"), ("n", "2")]);
        assert_eq!(found, vec![rows[2].clone()]);
    }

    #[test]
    fn test_remove_duplicates() {
        let rows = vec![
            json!({"a": 1, "b": 2}),
            json!({"a": 3, "b": 4}),
            json!({"a": 1, "b": 2}),
        ];
        assert_eq!(
            remove_duplicates_from_multi_dimensional_array(rows),
            vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": 4})]
        );

        let nested = vec![json!([1, [2, 3]]), json!([1, [2, 3]]), json!([1, [3, 2]])];
        assert_eq!(
            remove_duplicates_from_multi_dimensional_array(nested),
            vec![json!([1, [2, 3]]), json!([1, [3, 2]])]
        );

        assert!(remove_duplicates_from_multi_dimensional_array(vec![]).is_empty());
    }

    #[test]
    fn test_create_sql_values_string() {
        assert_eq!(
            create_sql_values_string(&[json!(1), json!("one"), json!("\"")], DEFAULT_SQL_QUOTE),
            r#"(1, "one", "\"")"#
        );
        assert_eq!(
            create_sql_values_string(&[json!(1), json!("one"), json!("'")], '\''),
            r"(1, 'one', '\'')"
        );
        assert_eq!(
            create_sql_values_string(&[json!(null), json!(true), json!(2.5)], '"'),
            "(NULL, 1, 2.5)"
        );
        assert_eq!(create_sql_values_string(&[], '"'), "()");
    }
}
