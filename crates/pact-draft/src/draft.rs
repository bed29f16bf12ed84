// draft.rs — AgreementDraft: the mutable working copy of one agreement.
//
// A draft is created empty (create mode) or hydrated from a persisted
// record fetched from the backend (edit mode). It is mutated only by the
// workflow controller in response to field-change and phase-transition
// events, and discarded once a submit succeeds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::refvalue::RefValue;

/// Whether the workflow is creating a new agreement or editing a
/// persisted one. Decides payload encoding and attachment requiredness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Create,
    Edit,
}

/// The in-progress agreement record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgreementDraft {
    /// Database id — absent until the agreement has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Server-assigned human-readable code (wire name `agreement_id`).
    /// Read-only; present only after persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_code: Option<String>,

    /// Who created the persisted record. Read-only on edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,

    pub title: String,

    /// Caller-assigned reference; uniqueness is a server-side business rule.
    pub agreement_reference: String,

    /// Agreement type reference — may hold any wire shape until submit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_type: Option<RefValue>,

    /// Owning department reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<RefValue>,

    /// Counterparty: id into the vendor roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_name: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,

    /// The date reminders should go out (wire name `reminder_time`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,

    /// Original upload name of a stored attachment, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,

    /// Free text; empty string means no remarks.
    #[serde(default)]
    pub remarks: String,
}

impl AgreementDraft {
    /// An empty draft for create mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this draft is backed by a persisted record.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether the draft still has its stored attachment and no pending
    /// replacement upload.
    pub fn has_stored_attachment(&self) -> bool {
        matches!(self.attachment, Some(Attachment::Stored { .. }))
    }

    /// Build a draft from a fetched record. Reference fields keep whatever
    /// shape the backend returned; `RefValue` unwraps them on read. A
    /// missing department falls back to `default_department` (the caller's
    /// own department).
    pub fn hydrate(record: PersistedAgreement, default_department: Option<i64>) -> Self {
        let department = record
            .department
            .or(default_department.map(RefValue::Id));
        let attachment = record
            .attachment
            .filter(|path| !path.is_empty())
            .map(Attachment::stored);
        AgreementDraft {
            id: Some(record.id),
            agreement_code: record.agreement_id,
            creator_name: record.creator_name,
            title: record.title,
            agreement_reference: record.agreement_reference,
            agreement_type: record.agreement_type,
            department,
            party_name: record.party_name.as_ref().and_then(RefValue::id),
            start_date: record.start_date,
            expiry_date: record.expiry_date,
            reminder_date: record.reminder_time,
            attachment,
            original_filename: record.original_filename,
            remarks: record.remarks.unwrap_or_default(),
        }
    }
}

/// An agreement as returned by the backend's fetch-by-id endpoint.
///
/// Reference fields are `RefValue` because different backend paths return
/// either scalar ids or expanded `{id, name}` objects for the same field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedAgreement {
    pub id: i64,
    /// Human-readable code, e.g. "AGR-2025-0042".
    #[serde(default)]
    pub agreement_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub agreement_reference: String,
    #[serde(default)]
    pub agreement_type: Option<RefValue>,
    #[serde(default)]
    pub department: Option<RefValue>,
    #[serde(default)]
    pub party_name: Option<RefValue>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_time: Option<NaiveDate>,
    /// Server-side storage path of the attachment, if any.
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub creator_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PersistedAgreement {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "agreement_id": "AGR-2025-0042",
            "title": "MSA",
            "agreement_reference": "REF-1",
            "agreement_type": {"id": 2, "name": "Service"},
            "department": 5,
            "party_name": 9,
            "start_date": "2025-01-01",
            "expiry_date": "2025-12-31",
            "reminder_time": "2025-06-01",
            "attachment": "agreements/2/ab12.pdf",
            "original_filename": "contract.pdf",
            "remarks": "renewal",
            "creator_name": "Dana Li"
        }))
        .unwrap()
    }

    #[test]
    fn empty_draft_is_not_persisted() {
        let draft = AgreementDraft::new();
        assert!(!draft.is_persisted());
        assert!(draft.attachment.is_none());
        assert_eq!(draft.remarks, "");
    }

    #[test]
    fn hydrate_carries_all_fields() {
        let draft = AgreementDraft::hydrate(record(), None);
        assert_eq!(draft.id, Some(42));
        assert_eq!(draft.agreement_code.as_deref(), Some("AGR-2025-0042"));
        assert_eq!(draft.title, "MSA");
        assert_eq!(draft.agreement_type.as_ref().and_then(RefValue::id), Some(2));
        assert_eq!(draft.department.as_ref().and_then(RefValue::id), Some(5));
        assert_eq!(draft.party_name, Some(9));
        assert_eq!(
            draft.start_date,
            Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        );
        assert!(draft.has_stored_attachment());
        assert_eq!(draft.original_filename.as_deref(), Some("contract.pdf"));
        assert_eq!(draft.creator_name.as_deref(), Some("Dana Li"));
        assert!(draft.is_persisted());
    }

    #[test]
    fn hydrate_defaults_missing_department_to_callers() {
        let mut rec = record();
        rec.department = None;
        let draft = AgreementDraft::hydrate(rec, Some(7));
        assert_eq!(draft.department.as_ref().and_then(RefValue::id), Some(7));
    }

    #[test]
    fn hydrate_ignores_empty_attachment_path() {
        let mut rec = record();
        rec.attachment = Some(String::new());
        let draft = AgreementDraft::hydrate(rec, None);
        assert!(draft.attachment.is_none());
    }

    #[test]
    fn hydrate_tolerates_object_party() {
        let mut rec = record();
        rec.party_name = Some(RefValue::Named(crate::refvalue::NamedRef {
            id: 9,
            name: Some("Acme Corp".into()),
        }));
        let draft = AgreementDraft::hydrate(rec, None);
        assert_eq!(draft.party_name, Some(9));
    }

    #[test]
    fn draft_serialization_round_trip() {
        let draft = AgreementDraft::hydrate(record(), None);
        let json = serde_json::to_string(&draft).unwrap();
        let restored: AgreementDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(draft, restored);
    }
}
