//! String utility functions
//!
//! Padding, capitalization, repetition, type-name shortening and a
//! source-literal style dump of nested maps.

use crate::types::is_container;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Default order of magnitude used by [`add_zero_prefix`]
pub const DEFAULT_ZERO_PREFIX_ORDER: u32 = 1;

static NESTED_ARRAY_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" => \r?\n {2,}array \(").expect("NESTED_ARRAY_OPEN: invalid regex pattern")
});
static ROOT_ARRAY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^array \(").expect("ROOT_ARRAY_OPEN: invalid regex pattern"));
static ROOT_ARRAY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)$").expect("ROOT_ARRAY_CLOSE: invalid regex pattern"));
static NESTED_ARRAY_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\r?\n {2,})\),").expect("NESTED_ARRAY_CLOSE: invalid regex pattern")
});

/// Left-pad a decimal integer string with zeros when it is below `10^order`
///
/// The padded result is `order + 1` characters long (the width of `10^order`).
/// Values at or above the threshold, and strings that are not integers, are
/// returned unchanged. Padding is computed from the string length, so `"01"`
/// with order 1 stays `"01"`.
///
/// # Example
///
/// ```rust
/// use helperbox::strings::add_zero_prefix;
///
/// assert_eq!(add_zero_prefix("0", 1), "00");
/// assert_eq!(add_zero_prefix("11", 1), "11");
/// assert_eq!(add_zero_prefix("11", 3), "0011");
/// assert_eq!(add_zero_prefix("100", 2), "100");
/// ```
pub fn add_zero_prefix(value: &str, order: u32) -> String {
    let Ok(number) = value.parse::<i128>() else {
        return value.to_string();
    };

    let below_threshold = 10_i128.checked_pow(order).map_or(true, |limit| number < limit);
    if !below_threshold {
        return value.to_string();
    }

    let width = order as usize + 1;
    let padding = width.saturating_sub(value.len());
    format!("{}{value}", "0".repeat(padding))
}

/// Uppercase the first character of a string, leaving the rest untouched
///
/// Works on Unicode scalar values, so Cyrillic and other multi-byte scripts
/// are handled. Characters whose uppercase form is several characters long
/// (`ß` → `SS`) expand.
///
/// # Example
///
/// ```rust
/// use helperbox::strings::mb_ucfirst;
///
/// assert_eq!(mb_ucfirst("привет"), "Привет");
/// assert_eq!(mb_ucfirst("hello"), "Hello");
/// ```
pub fn mb_ucfirst(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Repeat `unit` `count` times, joined by `separator`
///
/// # Example
///
/// ```rust
/// use helperbox::strings::str_repeat_with_separator;
///
/// assert_eq!(str_repeat_with_separator("a", 2, "|"), "a|a");
/// assert_eq!(str_repeat_with_separator("a", 0, "|"), "");
/// ```
pub fn str_repeat_with_separator(unit: &str, count: usize, separator: &str) -> String {
    vec![unit; count].join(separator)
}

/// Unqualified name of a value's type
///
/// Module path and generic arguments are dropped, so `alloc::vec::Vec<u8>`
/// becomes `Vec`.
///
/// # Example
///
/// ```rust
/// use helperbox::strings::get_class_name_from_object;
///
/// struct Invoice;
/// assert_eq!(get_class_name_from_object(&Invoice), "Invoice");
/// assert_eq!(get_class_name_from_object(&String::new()), "String");
/// ```
pub fn get_class_name_from_object<T: ?Sized>(_object: &T) -> &'static str {
    get_class_name_from_string(std::any::type_name::<T>())
}

/// Last segment of a qualified type name
///
/// Both `::` and `\` are accepted as namespace separators.
///
/// # Example
///
/// ```rust
/// use helperbox::strings::get_class_name_from_string;
///
/// assert_eq!(get_class_name_from_string(r"w3lifer\PhpHelper\PhpHelper"), "PhpHelper");
/// assert_eq!(get_class_name_from_string("std::collections::HashMap<K, V>"), "HashMap");
/// assert_eq!(get_class_name_from_string("MainTest"), "MainTest");
/// ```
pub fn get_class_name_from_string(class_name: &str) -> &str {
    let path = class_name.split('<').next().unwrap_or(class_name);
    path.rsplit(['\\', ':']).next().unwrap_or(path)
}

/// Dump a value as a nested `array (...)` literal
///
/// Maps and lists print one entry per line with two-space indentation and a
/// trailing comma. Strings are single-quoted with `\` and `'` escaped, `null`
/// prints as `NULL`. Integer-like keys are printed bare.
pub fn var_export(value: &Value) -> String {
    let mut out = String::new();
    write_export(value, 0, &mut out);
    out
}

fn write_export(value: &Value, indent: usize, out: &mut String) {
    match value {
        Value::Object(map) => {
            write_array(map.iter().map(|(k, v)| (export_key(k), v)), indent, out);
        }
        Value::Array(items) => {
            write_array(items.iter().enumerate().map(|(i, v)| (i.to_string(), v)), indent, out);
        }
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&quote(s)),
    }
}

fn write_array<'a>(entries: impl Iterator<Item = (String, &'a Value)>, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent + 2);
    out.push_str("array (\n");
    for (key, value) in entries {
        out.push_str(&pad);
        out.push_str(&key);
        out.push_str(" => ");
        if is_container(value) {
            out.push('\n');
            out.push_str(&pad);
            write_export(value, indent + 2, out);
        } else {
            write_export(value, indent + 2, out);
        }
        out.push_str(",\n");
    }
    out.push_str(&" ".repeat(indent));
    out.push(')');
}

fn export_key(key: &str) -> String {
    let canonical_int = key.parse::<i64>().is_ok_and(|n| n.to_string() == key);
    if canonical_int {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Dump a value with nested `array (` pulled onto the key line
///
/// # Example
///
/// ```rust
/// use helperbox::strings::pretty_var_export_soft;
/// use serde_json::json;
///
/// let dump = pretty_var_export_soft(&json!({"a": 1, "b": {"c": 3}}));
/// assert_eq!(dump, "array (\n  'a' => 1,\n  'b' => array (\n    'c' => 3,\n  ),\n)");
/// ```
pub fn pretty_var_export_soft(value: &Value) -> String {
    NESTED_ARRAY_OPEN
        .replace_all(&var_export(value), " => array (")
        .into_owned()
}

/// Dump a value using short `[ ... ]` bracket notation throughout
///
/// # Example
///
/// ```rust
/// use helperbox::strings::pretty_var_export_hard;
/// use serde_json::json;
///
/// let dump = pretty_var_export_hard(&json!({"a": 1, "b": {"c": 3}}));
/// assert_eq!(dump, "[\n  'a' => 1,\n  'b' => [\n    'c' => 3,\n  ],\n]");
/// ```
pub fn pretty_var_export_hard(value: &Value) -> String {
    let dump = var_export(value);
    let dump = ROOT_ARRAY_OPEN.replace(&dump, "[");
    let dump = ROOT_ARRAY_CLOSE.replace(&dump, "]");
    let dump = NESTED_ARRAY_OPEN.replace_all(&dump, " => [");
    NESTED_ARRAY_CLOSE.replace_all(&dump, "${1}],").into_owned()
}
