// preview.rs — the normalized preview read-model.
//
// The preview is recomputed from the draft and the fetched rosters on
// every request, never patched incrementally. Reference fields resolve to
// display names no matter which shape the draft currently holds (scalar
// id, numeric string, or expanded object).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pact_access::AccessUser;
use pact_client::{AgreementType, Department, FormMetadata, Vendor};
use pact_draft::{AgreementDraft, RefValue};

/// What the confirmation view shows, field by field, fully resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgreementSummary {
    /// Server-assigned code; `None` reads as "not assigned yet".
    pub agreement_code: Option<String>,
    pub creator_name: Option<String>,
    pub title: String,
    pub agreement_reference: String,
    pub agreement_type_name: Option<String>,
    pub department_name: Option<String>,
    pub party_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub reminder_date: Option<NaiveDate>,
    /// Display name of the attachment, if any.
    pub attachment_name: Option<String>,
    pub remarks: String,
    /// Accounts entitled to see this agreement.
    pub users_with_access: Vec<AccessUser>,
}

impl AgreementSummary {
    /// Assemble the summary from the draft plus fetched rosters.
    ///
    /// `fallback_creator` is the caller's own name, used while the record
    /// has no persisted creator yet.
    pub fn assemble(
        draft: &AgreementDraft,
        metadata: &FormMetadata,
        vendors: &[Vendor],
        users_with_access: Vec<AccessUser>,
        fallback_creator: Option<&str>,
    ) -> Self {
        AgreementSummary {
            agreement_code: draft.agreement_code.clone(),
            creator_name: draft
                .creator_name
                .clone()
                .or_else(|| fallback_creator.map(str::to_string)),
            title: draft.title.clone(),
            agreement_reference: draft.agreement_reference.clone(),
            agreement_type_name: resolve_type(&draft.agreement_type, &metadata.agreement_types),
            department_name: resolve_department(&draft.department, &metadata.departments),
            party_name: draft.party_name.and_then(|id| {
                vendors
                    .iter()
                    .find(|v| v.id == id)
                    .map(|v| v.name.clone())
            }),
            start_date: draft.start_date,
            expiry_date: draft.expiry_date,
            reminder_date: draft.reminder_date,
            attachment_name: draft
                .original_filename
                .clone()
                .or_else(|| draft.attachment.as_ref().map(|a| a.display_name().to_string())),
            remarks: draft.remarks.clone(),
            users_with_access,
        }
    }
}

fn resolve_type(value: &Option<RefValue>, types: &[AgreementType]) -> Option<String> {
    let value = value.as_ref()?;
    // An expanded object already carries its name.
    if let Some(name) = value.name() {
        return Some(name.to_string());
    }
    if let Some(id) = value.id() {
        if let Some(found) = types.iter().find(|t| t.id == id) {
            return Some(found.name.clone());
        }
    }
    // A non-numeric string that matches nothing is shown as-is.
    match value {
        RefValue::Text(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn resolve_department(value: &Option<RefValue>, departments: &[Department]) -> Option<String> {
    let value = value.as_ref()?;
    if let Some(name) = value.name() {
        return Some(name.to_string());
    }
    if let Some(id) = value.id() {
        if let Some(found) = departments.iter().find(|d| d.id == id) {
            return Some(found.name.clone());
        }
    }
    match value {
        RefValue::Text(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_draft::{Attachment, NamedRef};
    use serde_json::json;

    fn metadata() -> FormMetadata {
        serde_json::from_value(json!({
            "departments": [{"id": 5, "name": "Legal"}],
            "agreement_types": [{"id": 2, "name": "Service"}],
        }))
        .unwrap()
    }

    fn vendors() -> Vec<Vendor> {
        vec![Vendor {
            id: 9,
            name: "Acme Corp".into(),
        }]
    }

    fn draft() -> AgreementDraft {
        AgreementDraft {
            title: "MSA".into(),
            agreement_reference: "REF-1".into(),
            agreement_type: Some(RefValue::Id(2)),
            department: Some(RefValue::Id(5)),
            party_name: Some(9),
            ..AgreementDraft::default()
        }
    }

    #[test]
    fn names_resolve_from_scalar_ids() {
        let summary =
            AgreementSummary::assemble(&draft(), &metadata(), &vendors(), Vec::new(), None);
        assert_eq!(summary.agreement_type_name.as_deref(), Some("Service"));
        assert_eq!(summary.department_name.as_deref(), Some("Legal"));
        assert_eq!(summary.party_name.as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn names_resolve_from_numeric_strings() {
        let mut d = draft();
        d.agreement_type = Some(RefValue::Text("2".into()));
        d.department = Some(RefValue::Text("5".into()));
        let summary = AgreementSummary::assemble(&d, &metadata(), &vendors(), Vec::new(), None);
        assert_eq!(summary.agreement_type_name.as_deref(), Some("Service"));
        assert_eq!(summary.department_name.as_deref(), Some("Legal"));
    }

    #[test]
    fn expanded_object_name_wins_without_lookup() {
        let mut d = draft();
        d.department = Some(RefValue::Named(NamedRef {
            id: 99,
            name: Some("Procurement".into()),
        }));
        let summary = AgreementSummary::assemble(&d, &metadata(), &vendors(), Vec::new(), None);
        assert_eq!(summary.department_name.as_deref(), Some("Procurement"));
    }

    #[test]
    fn unmatched_text_value_is_shown_raw() {
        let mut d = draft();
        d.agreement_type = Some(RefValue::Text("Framework".into()));
        let summary = AgreementSummary::assemble(&d, &metadata(), &vendors(), Vec::new(), None);
        assert_eq!(summary.agreement_type_name.as_deref(), Some("Framework"));
    }

    #[test]
    fn unknown_id_resolves_to_none() {
        let mut d = draft();
        d.party_name = Some(77);
        let summary = AgreementSummary::assemble(&d, &metadata(), &vendors(), Vec::new(), None);
        assert!(summary.party_name.is_none());
    }

    #[test]
    fn attachment_name_prefers_original_filename() {
        let mut d = draft();
        d.attachment = Some(Attachment::stored("agreements/2/ab12.pdf"));
        d.original_filename = Some("contract.pdf".into());
        let summary = AgreementSummary::assemble(&d, &metadata(), &vendors(), Vec::new(), None);
        assert_eq!(summary.attachment_name.as_deref(), Some("contract.pdf"));

        d.original_filename = None;
        let summary = AgreementSummary::assemble(&d, &metadata(), &vendors(), Vec::new(), None);
        assert_eq!(summary.attachment_name.as_deref(), Some("ab12.pdf"));
    }

    #[test]
    fn creator_falls_back_to_caller() {
        let summary =
            AgreementSummary::assemble(&draft(), &metadata(), &vendors(), Vec::new(), Some("Dana"));
        assert_eq!(summary.creator_name.as_deref(), Some("Dana"));

        let mut d = draft();
        d.creator_name = Some("Original Author".into());
        let summary =
            AgreementSummary::assemble(&d, &metadata(), &vendors(), Vec::new(), Some("Dana"));
        assert_eq!(summary.creator_name.as_deref(), Some("Original Author"));
    }
}
