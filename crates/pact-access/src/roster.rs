// roster.rs — the user roster as the backend actually serves it.
//
// Different endpoints flatten the user → department relation differently:
// some send a scalar `department` id, some a `department_id`, some the
// expanded `{"id": ..}` object. AccessUser tolerates every shape and
// funnels the "which department is this user in" question through one
// accessor.

use serde::{Deserialize, Serialize};

use pact_draft::RefValue;

/// One account from the available-users roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessUser {
    pub id: i64,

    #[serde(default)]
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Direct department, as a scalar id or an expanded object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<RefValue>,

    /// The `_id`-suffixed flat shape some list endpoints use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,

    /// Denormalized department name for display (wire name
    /// `department__name`, the ORM join spelling).
    #[serde(
        default,
        rename = "department__name",
        skip_serializing_if = "Option::is_none"
    )]
    pub department_name: Option<String>,

    /// Explicit per-department permission grants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub department_permissions: Vec<PermissionGrant>,
}

/// A single permission grant row. Same field-shape tolerance as the
/// user's own department.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<RefValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
}

impl AccessUser {
    /// Whether the user's direct department is `department_id`, checking
    /// every wire shape the roster endpoints produce.
    pub fn belongs_to(&self, department_id: i64) -> bool {
        if self
            .department
            .as_ref()
            .is_some_and(|d| d.is(department_id))
        {
            return true;
        }
        self.department_id == Some(department_id)
    }

    /// Whether the user holds an explicit grant for `department_id`.
    pub fn has_grant_for(&self, department_id: i64) -> bool {
        self.department_permissions.iter().any(|grant| {
            grant
                .department
                .as_ref()
                .is_some_and(|d| d.is(department_id))
                || grant.department_id == Some(department_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_department_shape() {
        let user: AccessUser =
            serde_json::from_value(json!({"id": 1, "full_name": "A", "department": 5})).unwrap();
        assert!(user.belongs_to(5));
        assert!(!user.belongs_to(6));
    }

    #[test]
    fn id_suffixed_department_shape() {
        let user: AccessUser =
            serde_json::from_value(json!({"id": 1, "full_name": "A", "department_id": 5})).unwrap();
        assert!(user.belongs_to(5));
    }

    #[test]
    fn nested_object_department_shape() {
        let user: AccessUser = serde_json::from_value(
            json!({"id": 1, "full_name": "A", "department": {"id": 5, "name": "Legal"}}),
        )
        .unwrap();
        assert!(user.belongs_to(5));
    }

    #[test]
    fn orm_join_name_is_captured() {
        let user: AccessUser = serde_json::from_value(
            json!({"id": 1, "full_name": "A", "department__name": "Legal"}),
        )
        .unwrap();
        assert_eq!(user.department_name.as_deref(), Some("Legal"));
        assert!(!user.belongs_to(5));
    }

    #[test]
    fn grants_match_either_shape() {
        let user: AccessUser = serde_json::from_value(json!({
            "id": 1,
            "full_name": "A",
            "department": 2,
            "department_permissions": [
                {"department": 5},
                {"department_id": 6}
            ]
        }))
        .unwrap();
        assert!(user.has_grant_for(5));
        assert!(user.has_grant_for(6));
        assert!(!user.has_grant_for(7));
    }

    #[test]
    fn no_department_matches_nothing() {
        let user: AccessUser =
            serde_json::from_value(json!({"id": 1, "full_name": "A"})).unwrap();
        assert!(!user.belongs_to(5));
        assert!(!user.has_grant_for(5));
    }
}
