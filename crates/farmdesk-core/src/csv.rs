//! CSV export and upload templates (RFC 4180 style)
//!
//! Lines are joined with `\r\n` and the output has no trailing line break.

use std::borrow::Cow;

use crate::record::{display_field, Record};
use crate::resource::ColumnDef;

const LINE_BREAK: &str = "\r\n";

/// Quote a field when it contains a comma, quote, CR or LF.
///
/// Embedded quotes are doubled. Fields without special characters are
/// returned unchanged (borrowed).
pub fn escape_csv(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn join_line<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = Cow<'a, str>>,
{
    fields.into_iter().collect::<Vec<_>>().join(",")
}

/// Serialize rows using the union of their keys (first-seen order) as header.
pub fn to_csv(rows: &[Record]) -> String {
    let mut headers: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_line(headers.iter().map(|h| escape_csv(h))));
    for row in rows {
        let values: Vec<String> = headers.iter().map(|h| display_field(row, h)).collect();
        lines.push(join_line(values.iter().map(|v| escape_csv(v))));
    }
    lines.join(LINE_BREAK)
}

/// Serialize rows restricted to `columns`, using their labels as header.
pub fn to_csv_with_columns(rows: &[Record], columns: &[&ColumnDef]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_line(columns.iter().map(|c| escape_csv(c.label))));
    for row in rows {
        let values: Vec<String> = columns.iter().map(|c| display_field(row, c.key)).collect();
        lines.push(join_line(values.iter().map(|v| escape_csv(v))));
    }
    lines.join(LINE_BREAK)
}

/// Header-only CSV used as a bulk upload template.
pub fn template(keys: &[&str]) -> String {
    join_line(keys.iter().map(|k| escape_csv(k)))
}
