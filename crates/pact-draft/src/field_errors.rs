// field_errors.rs — FieldErrors: the shared field → message map.
//
// Both local validation and failed submits report through this one type.
// Server-side field errors arrive in DRF shape (string or list of strings
// per field) and are normalized to a single message; they overwrite any
// stale local message for the same field. A distinguished "general" slot
// holds banner-level messages that aren't tied to a field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key used for messages not tied to a specific field.
pub const GENERAL: &str = "general";

/// Ordered map from field name to a single human-readable message.
///
/// Empty map ⇔ the draft is submittable. `BTreeMap` keeps iteration
/// deterministic for display and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    map: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, replacing any existing one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.map.insert(field.into(), message.into());
    }

    /// Drop the message for a field, if any. Used when the user edits a
    /// field so the stale error disappears immediately.
    pub fn clear(&mut self, field: &str) {
        self.map.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.map.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set the banner-level message.
    pub fn set_general(&mut self, message: impl Into<String>) {
        self.insert(GENERAL, message);
    }

    pub fn general(&self) -> Option<&str> {
        self.get(GENERAL)
    }

    /// Merge another error set in, overwriting on collision. Server errors
    /// win over stale local ones.
    pub fn merge(&mut self, other: FieldErrors) {
        self.map.extend(other.map);
    }

    /// Build from a wire-shape error object. Values may be a string or a
    /// list of strings (DRF serializer errors); lists collapse to their
    /// first entry. Non-object input yields an empty set.
    pub fn from_wire(value: &Value) -> Self {
        let mut errors = FieldErrors::new();
        let Some(object) = value.as_object() else {
            return errors;
        };
        for (field, raw) in object {
            let message = match raw {
                Value::String(s) => s.clone(),
                Value::Array(items) => match items.first() {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => continue,
                },
                other => other.to_string(),
            };
            errors.insert(field, message);
        }
        errors
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_get_clear() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Title is required");
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert!(!errors.is_empty());
        errors.clear("title");
        assert!(errors.is_empty());
    }

    #[test]
    fn merge_overwrites_stale_entries() {
        let mut local = FieldErrors::new();
        local.insert("agreement_reference", "Reference is required");
        let mut server = FieldErrors::new();
        server.insert("agreement_reference", "duplicate");
        local.merge(server);
        assert_eq!(local.get("agreement_reference"), Some("duplicate"));
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn from_wire_accepts_strings_and_lists() {
        let wire = json!({
            "agreement_reference": "duplicate",
            "title": ["This field may not be blank.", "second"],
        });
        let errors = FieldErrors::from_wire(&wire);
        assert_eq!(errors.get("agreement_reference"), Some("duplicate"));
        assert_eq!(errors.get("title"), Some("This field may not be blank."));
    }

    #[test]
    fn from_wire_non_object_is_empty() {
        assert!(FieldErrors::from_wire(&json!("oops")).is_empty());
        assert!(FieldErrors::from_wire(&json!(null)).is_empty());
    }

    #[test]
    fn general_slot() {
        let mut errors = FieldErrors::new();
        errors.set_general("Failed to submit agreement");
        assert_eq!(errors.general(), Some("Failed to submit agreement"));
    }

    #[test]
    fn iteration_is_ordered() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "a");
        errors.insert("department", "b");
        let keys: Vec<&str> = errors.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["department", "title"]);
    }
}
