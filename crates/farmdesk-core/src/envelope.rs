//! Response envelopes used by the backend for list and record payloads
//!
//! The backend is inconsistent about how it wraps rows. Every shape is
//! normalised here, once, into a [`Page`] so screens only ever see
//! `(rows, total)`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::record::Record;

/// A normalised page of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub rows: Vec<Record>,
    /// Total rows across all pages
    pub total: u64,
}

impl Page {
    pub fn new(rows: Vec<Record>, total: u64) -> Self {
        Self { rows, total }
    }

    /// Page built from rows alone; the total is the row count.
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let total = rows.len() as u64;
        Self { rows, total }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every list shape the backend is known to return.
///
/// Variant order matters for untagged matching: stored procedure results
/// carry both `recordsets` and `recordset`, and the former holds the count.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    /// `[row, ...]`
    Bare(Vec<Record>),
    /// `{ "items": [...], "total": n }`
    Items {
        items: Vec<Record>,
        #[serde(default)]
        total: Option<Value>,
    },
    /// `{ "recordsets": [[...rows], [{ "TotalCount": n }]] }`
    Recordsets { recordsets: Vec<Vec<Record>> },
    /// `{ "recordset": [...] }`
    Recordset { recordset: Vec<Record> },
}

impl From<ListEnvelope> for Page {
    fn from(envelope: ListEnvelope) -> Self {
        match envelope {
            ListEnvelope::Bare(rows) => Page::from_rows(rows),
            ListEnvelope::Items { items, total } => {
                let total = total.as_ref().and_then(parse_count);
                match total {
                    Some(total) => Page::new(items, total),
                    None => Page::from_rows(items),
                }
            }
            ListEnvelope::Recordsets { mut recordsets } => {
                let total = recordsets
                    .get(1)
                    .and_then(|set| set.first())
                    .and_then(|row| row.get("TotalCount"))
                    .and_then(parse_count);
                let rows = if recordsets.is_empty() {
                    Vec::new()
                } else {
                    recordsets.swap_remove(0)
                };
                match total {
                    Some(total) => Page::new(rows, total),
                    None => Page::from_rows(rows),
                }
            }
            ListEnvelope::Recordset { recordset } => Page::from_rows(recordset),
        }
    }
}

/// Normalise a raw list response body.
pub fn normalize_list(body: Value) -> Result<Page> {
    serde_json::from_value::<ListEnvelope>(body)
        .map(Page::from)
        .map_err(|e| Error::decode(format!("unrecognised list envelope: {e}")))
}

/// Normalise a single-record response body.
///
/// Accepts a bare object, `{ "recordset": [row] }`, `{ "data": row }` or a
/// one-element array. Empty bodies (`null`, `""`, `{}`) yield an empty record
/// since several endpoints answer writes with no content.
pub fn normalize_record(body: Value) -> Result<Record> {
    match body {
        Value::Null => Ok(Record::new()),
        Value::String(s) if s.is_empty() => Ok(Record::new()),
        Value::Array(mut items) => {
            if items.is_empty() {
                Ok(Record::new())
            } else {
                into_record(items.swap_remove(0))
            }
        }
        Value::Object(mut map) => {
            if let Some(Value::Array(mut set)) = map.remove("recordset") {
                if set.is_empty() {
                    return Ok(Record::new());
                }
                return into_record(set.swap_remove(0));
            }
            if let Some(data @ Value::Object(_)) = map.remove("data") {
                return into_record(data);
            }
            Ok(map)
        }
        other => Err(Error::decode(format!("expected a record, got {other}"))),
    }
}

fn into_record(value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::decode(format!("expected a record, got {other}"))),
    }
}

/// Read a count that may be a JSON number or a numeric string.
pub fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three_rows() -> Value {
        json!([
            {"FarmerId": 1, "FullName": "Ana"},
            {"FarmerId": 2, "FullName": "Bo"},
            {"FarmerId": 3, "FullName": "Cy"}
        ])
    }

    #[test]
    fn test_all_shapes_normalise_to_same_page() {
        let shapes = vec![
            three_rows(),
            json!({"items": three_rows(), "total": 3}),
            json!({"recordset": three_rows()}),
            json!({"recordsets": [three_rows(), [{"TotalCount": 3}]]}),
        ];
        for shape in shapes {
            let page = normalize_list(shape.clone()).unwrap();
            assert_eq!(page.rows.len(), 3, "shape {shape}");
            assert_eq!(page.total, 3, "shape {shape}");
            assert_eq!(page.rows[2]["FullName"], "Cy");
        }
    }

    #[test]
    fn test_total_exceeds_page_rows() {
        let page = normalize_list(json!({"items": three_rows(), "total": 120})).unwrap();
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.total, 120);

        let page =
            normalize_list(json!({"recordsets": [three_rows(), [{"TotalCount": "57"}]]})).unwrap();
        assert_eq!(page.total, 57);
    }

    #[test]
    fn test_missing_total_falls_back_to_row_count() {
        let page = normalize_list(json!({"items": three_rows()})).unwrap();
        assert_eq!(page.total, 3);

        let page = normalize_list(json!({"recordsets": [three_rows()]})).unwrap();
        assert_eq!(page.total, 3);

        let page = normalize_list(json!({"recordsets": []})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_stored_procedure_result_prefers_recordsets() {
        let body = json!({
            "recordsets": [three_rows(), [{"TotalCount": 40}]],
            "recordset": three_rows(),
            "rowsAffected": [3, 1]
        });
        assert_eq!(normalize_list(body).unwrap().total, 40);
    }

    #[test]
    fn test_unknown_shape_is_decode_error() {
        let err = normalize_list(json!({"rows": []})).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(normalize_list(json!("nope")).is_err());
    }

    #[test]
    fn test_normalize_record_shapes() {
        let bare = normalize_record(json!({"Id": 1})).unwrap();
        assert_eq!(bare["Id"], 1);

        let set = normalize_record(json!({"recordset": [{"Id": 2}]})).unwrap();
        assert_eq!(set["Id"], 2);

        let data = normalize_record(json!({"data": {"Id": 3}})).unwrap();
        assert_eq!(data["Id"], 3);

        let arr = normalize_record(json!([{"Id": 4}])).unwrap();
        assert_eq!(arr["Id"], 4);

        assert!(normalize_record(Value::Null).unwrap().is_empty());
        assert!(normalize_record(json!(5)).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&json!(5)), Some(5));
        assert_eq!(parse_count(&json!(5.0)), Some(5));
        assert_eq!(parse_count(&json!(" 12 ")), Some(12));
        assert_eq!(parse_count(&json!(-1)), None);
        assert_eq!(parse_count(&json!("x")), None);
        assert_eq!(parse_count(&json!(null)), None);
    }
}
