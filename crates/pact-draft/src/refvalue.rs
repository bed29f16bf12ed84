// refvalue.rs — RefValue: the reference-or-scalar accessor.
//
// Reference fields (agreement type, department, vendor) arrive in different
// shapes depending on which endpoint produced them: a bare integer id, a
// numeric string (form inputs), or an expanded `{id, name}` object. Every
// place that needs the scalar id goes through `RefValue::id()` instead of
// unwrapping ad hoc at the call site.

use serde::{Deserialize, Serialize};

/// A reference field as it appears on the wire.
///
/// `#[serde(untagged)]` tries the variants in order: a JSON number becomes
/// `Id`, a string becomes `Text`, an object becomes `Named`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefValue {
    /// Bare integer id — the canonical shape.
    Id(i64),
    /// Numeric string, e.g. `"5"` from a form input.
    Text(String),
    /// Expanded object, e.g. `{"id": 5, "name": "Legal"}`.
    Named(NamedRef),
}

/// The expanded object shape of a reference field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RefValue {
    /// Unwrap to the scalar id, whatever shape the value arrived in.
    ///
    /// Returns `None` for a `Text` value that does not parse as an integer.
    pub fn id(&self) -> Option<i64> {
        match self {
            RefValue::Id(id) => Some(*id),
            RefValue::Text(s) => s.trim().parse().ok(),
            RefValue::Named(named) => Some(named.id),
        }
    }

    /// The display name, if this value carried one.
    pub fn name(&self) -> Option<&str> {
        match self {
            RefValue::Named(named) => named.name.as_deref(),
            _ => None,
        }
    }

    /// Whether this reference points at the given id.
    pub fn is(&self, id: i64) -> bool {
        self.id() == Some(id)
    }
}

impl From<i64> for RefValue {
    fn from(id: i64) -> Self {
        RefValue::Id(id)
    }
}
