//! Field-level change diff shown before committing a create or update.

use serde::Serialize;

use crate::record::{display_value, Record};

/// One field whose string representation differs between two records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub key: String,
    pub label: String,
    pub old_value: String,
    pub new_value: String,
}

impl FieldChange {
    /// True when the field had no previous value (typical for creates).
    pub fn is_addition(&self) -> bool {
        self.old_value.is_empty() && !self.new_value.is_empty()
    }

    /// True when the field is being cleared.
    pub fn is_removal(&self) -> bool {
        !self.old_value.is_empty() && self.new_value.is_empty()
    }
}

/// Compute the changes between `original` and `pending`.
///
/// Keys are visited as the union of both records: every key of `original` in
/// its order, then keys only present in `pending`. Values are compared after
/// string coercion, so `1` and `"1"` are equal and `null` equals a missing key.
/// `label_for` maps a key to its display label; return `None` to use the key.
pub fn compute_changes<F>(original: &Record, pending: &Record, label_for: F) -> Vec<FieldChange>
where
    F: Fn(&str) -> Option<String>,
{
    let keys = original
        .keys()
        .chain(pending.keys().filter(|k| !original.contains_key(*k)));

    let mut changes = Vec::new();
    for key in keys {
        let old_value = original.get(key).map(display_value).unwrap_or_default();
        let new_value = pending.get(key).map(display_value).unwrap_or_default();
        if old_value != new_value {
            changes.push(FieldChange {
                key: key.clone(),
                label: label_for(key).unwrap_or_else(|| key.clone()),
                old_value,
                new_value,
            });
        }
    }
    changes
}

/// [`compute_changes`] using keys as labels.
pub fn compute_changes_unlabeled(original: &Record, pending: &Record) -> Vec<FieldChange> {
    compute_changes(original, pending, |_| None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_pairs;
    use serde_json::json;

    fn sample() -> Record {
        record_from_pairs([
            ("Name", json!("Ana")),
            ("Age", json!(31)),
            ("Active", json!(true)),
            ("Notes", json!(null)),
            ("Tags", json!(["a", "b"])),
            ("Meta", json!({"x": 1})),
        ])
    }

    #[test]
    fn test_identical_records_have_no_changes() {
        let a = sample();
        assert!(compute_changes_unlabeled(&a, &a).is_empty());
        assert!(compute_changes_unlabeled(&Record::new(), &Record::new()).is_empty());
    }

    #[test]
    fn test_string_coercion_equalities() {
        let a = record_from_pairs([("Age", json!(31)), ("Notes", json!(null))]);
        let b = record_from_pairs([("Age", json!("31"))]);
        // 31 == "31" and null == missing
        assert!(compute_changes_unlabeled(&a, &b).is_empty());
    }

    #[test]
    fn test_create_lists_every_non_empty_field() {
        let pending = record_from_pairs([
            ("Name", json!("Ana")),
            ("Phone", json!("")),
            ("Region", json!("North")),
        ]);
        let changes = compute_changes_unlabeled(&Record::new(), &pending);
        let keys: Vec<&str> = changes.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["Name", "Region"]);
        assert!(changes.iter().all(FieldChange::is_addition));
    }

    #[test]
    fn test_union_order_original_first_then_pending_only() {
        let original = record_from_pairs([("b", json!(1)), ("a", json!(1))]);
        let pending = record_from_pairs([("z", json!(1)), ("a", json!(2)), ("b", json!(2))]);
        let changes = compute_changes_unlabeled(&original, &pending);
        let keys: Vec<&str> = changes.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["b", "a", "z"]);
    }

    #[test]
    fn test_each_differing_key_appears_once_with_source_values() {
        let original = sample();
        let mut pending = sample();
        pending.insert("Name".into(), json!("Bea"));
        pending.insert("Notes".into(), json!("met on site"));
        pending.remove("Age");

        let changes = compute_changes_unlabeled(&original, &pending);
        assert_eq!(changes.len(), 3);

        let name = changes.iter().find(|c| c.key == "Name").unwrap();
        assert_eq!(name.old_value, "Ana");
        assert_eq!(name.new_value, "Bea");

        let age = changes.iter().find(|c| c.key == "Age").unwrap();
        assert_eq!(age.old_value, "31");
        assert_eq!(age.new_value, "");
        assert!(age.is_removal());

        let notes = changes.iter().find(|c| c.key == "Notes").unwrap();
        assert_eq!(notes.old_value, "");
        assert_eq!(notes.new_value, "met on site");
    }

    #[test]
    fn test_objects_compare_as_object_string() {
        // Both sides coerce to "[object Object]" so a nested edit is invisible.
        let a = record_from_pairs([("Meta", json!({"x": 1}))]);
        let b = record_from_pairs([("Meta", json!({"x": 2}))]);
        assert!(compute_changes_unlabeled(&a, &b).is_empty());
    }

    #[test]
    fn test_labels_from_lookup_with_key_fallback() {
        let original = record_from_pairs([("FirstName", json!("A")), ("Zip", json!("1"))]);
        let pending = record_from_pairs([("FirstName", json!("B")), ("Zip", json!("2"))]);
        let changes = compute_changes(&original, &pending, |key| {
            (key == "FirstName").then(|| "First name".to_string())
        });
        assert_eq!(changes[0].label, "First name");
        assert_eq!(changes[1].label, "Zip");
    }
}
