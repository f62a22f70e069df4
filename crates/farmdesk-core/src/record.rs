//! Loosely-typed backend rows and their string coercion
//!
//! The backend owns the data model; the dashboard only mirrors rows as
//! ordered JSON objects and renders them through [`display_value`].

use serde_json::{Map, Value};

/// A backend row, keys kept in insertion order.
pub type Record = Map<String, Value>;

/// Coerce a JSON value to the string shown in tables, diffs and CSV.
///
/// Follows default string coercion:
/// - `null` becomes `""`
/// - strings are returned verbatim
/// - numbers and booleans use their textual form
/// - arrays join their coerced elements with `,` (nulls become empty)
/// - objects become `"[object Object]"`
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Coerce an optional field, treating a missing key like `null`.
pub fn display_field(record: &Record, key: &str) -> String {
    record.get(key).map(display_value).unwrap_or_default()
}

/// Extract a record id as a path segment.
///
/// Ids arrive as numbers or strings depending on the endpoint.
pub fn record_id(record: &Record, id_field: &str) -> Option<String> {
    match record.get(id_field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(display_value(other)),
    }
}

/// Build a record from `(key, value)` pairs, keeping the given order.
pub fn record_from_pairs<K, I>(pairs: I) -> Record
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_missing_are_empty() {
        assert_eq!(display_value(&Value::Null), "");
        let record = Record::new();
        assert_eq!(display_field(&record, "Name"), "");
    }

    #[test]
    fn test_primitives() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_arrays_join_with_commas() {
        assert_eq!(display_value(&json!(["a", 1, null])), "a,1,");
        assert_eq!(display_value(&json!([])), "");
    }

    #[test]
    fn test_objects_use_default_coercion() {
        assert_eq!(display_value(&json!({"x": 1})), "[object Object]");
    }

    #[test]
    fn test_record_id_number_or_string() {
        let rec = record_from_pairs([("Id", json!(7))]);
        assert_eq!(record_id(&rec, "Id").as_deref(), Some("7"));

        let rec = record_from_pairs([("Id", json!("abc-1"))]);
        assert_eq!(record_id(&rec, "Id").as_deref(), Some("abc-1"));

        let rec = record_from_pairs([("Id", json!(null))]);
        assert_eq!(record_id(&rec, "Id"), None);
        assert_eq!(record_id(&rec, "Missing"), None);
    }

    #[test]
    fn test_record_from_pairs_keeps_order() {
        let rec = record_from_pairs([("b", json!(1)), ("a", json!(2))]);
        let keys: Vec<&String> = rec.keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
