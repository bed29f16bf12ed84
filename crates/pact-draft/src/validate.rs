// validate.rs — client-side validation of an AgreementDraft.
//
// All rules run on every call (no short-circuiting) and each produces at
// most one message per field. The date rules reproduce the backend's
// accepted behavior exactly: expiry may equal start, but the reminder must
// fall strictly between the two.

use crate::draft::AgreementDraft;
use crate::field_errors::FieldErrors;
use crate::refvalue::RefValue;

/// Wire-level field names. Validation, server errors and payload parts all
/// use these, so a server error for `agreement_reference` lands on the
/// same key a local error would.
pub mod field {
    pub const TITLE: &str = "title";
    pub const REFERENCE: &str = "agreement_reference";
    pub const AGREEMENT_TYPE: &str = "agreement_type";
    pub const DEPARTMENT: &str = "department";
    pub const START_DATE: &str = "start_date";
    pub const EXPIRY_DATE: &str = "expiry_date";
    pub const REMINDER: &str = "reminder_time";
    pub const PARTY: &str = "party_name";
    pub const ATTACHMENT: &str = "attachment";
}

/// Validate a draft. Empty result ⇔ submittable.
///
/// Pure and idempotent: same draft in, same errors out, no I/O.
pub fn validate(draft: &AgreementDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.title.trim().is_empty() {
        errors.insert(field::TITLE, "Title is required");
    }
    if draft.agreement_reference.trim().is_empty() {
        errors.insert(field::REFERENCE, "Reference is required");
    }
    if missing_ref(&draft.agreement_type) {
        errors.insert(field::AGREEMENT_TYPE, "Agreement Type is required");
    }
    if missing_ref(&draft.department) {
        errors.insert(field::DEPARTMENT, "Department is required");
    }
    if draft.start_date.is_none() {
        errors.insert(field::START_DATE, "Start date is required");
    }
    if draft.expiry_date.is_none() {
        errors.insert(field::EXPIRY_DATE, "Expiry date is required");
    }
    if draft.reminder_date.is_none() {
        errors.insert(field::REMINDER, "Reminder date is required");
    }
    if draft.party_name.is_none() {
        errors.insert(field::PARTY, "Vendor is required");
    }

    // An attachment must always be present. In edit mode the stored file
    // carried over from the persisted record satisfies this; the user only
    // has to pick a file when creating or when the record never had one.
    if draft.attachment.is_none() {
        errors.insert(field::ATTACHMENT, "Attachment is required");
    }

    if let (Some(start), Some(expiry)) = (draft.start_date, draft.expiry_date) {
        if expiry < start {
            errors.insert(
                field::EXPIRY_DATE,
                "Expiry date cannot be before start date",
            );
        }
    }
    if let (Some(start), Some(expiry), Some(reminder)) =
        (draft.start_date, draft.expiry_date, draft.reminder_date)
    {
        if reminder <= start || reminder >= expiry {
            errors.insert(
                field::REMINDER,
                "Reminder date must be after start date and before expiry date",
            );
        }
    }

    errors
}

fn missing_ref(value: &Option<RefValue>) -> bool {
    match value {
        None => true,
        // A blank string from a form select counts as unset.
        Some(RefValue::Text(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::Attachment;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn complete_draft() -> AgreementDraft {
        AgreementDraft {
            title: "MSA".into(),
            agreement_reference: "REF-1".into(),
            agreement_type: Some(RefValue::Id(2)),
            department: Some(RefValue::Id(5)),
            party_name: Some(9),
            start_date: Some(date(2025, 1, 1)),
            expiry_date: Some(date(2025, 12, 31)),
            reminder_date: Some(date(2025, 6, 1)),
            attachment: Some(Attachment::upload("contract.pdf", vec![0u8; 4])),
            ..AgreementDraft::default()
        }
    }

    #[test]
    fn complete_draft_passes() {
        assert!(validate(&complete_draft()).is_empty());
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let errors = validate(&AgreementDraft::new());
        for name in [
            field::TITLE,
            field::REFERENCE,
            field::AGREEMENT_TYPE,
            field::DEPARTMENT,
            field::START_DATE,
            field::EXPIRY_DATE,
            field::REMINDER,
            field::PARTY,
            field::ATTACHMENT,
        ] {
            assert!(errors.get(name).is_some(), "expected error for {name}");
        }
        assert_eq!(errors.len(), 9);
    }

    #[test]
    fn blank_select_value_counts_as_missing() {
        let mut draft = complete_draft();
        draft.department = Some(RefValue::Text("".into()));
        let errors = validate(&draft);
        assert_eq!(errors.get(field::DEPARTMENT), Some("Department is required"));
    }

    #[test]
    fn expiry_before_start_errors_on_expiry_only() {
        let mut draft = complete_draft();
        draft.start_date = Some(date(2025, 6, 1));
        draft.expiry_date = Some(date(2025, 1, 1));
        draft.reminder_date = None;
        let errors = validate(&draft);
        assert_eq!(
            errors.get(field::EXPIRY_DATE),
            Some("Expiry date cannot be before start date")
        );
        // The reminder error is the required-field one, not suppressed.
        assert_eq!(errors.get(field::REMINDER), Some("Reminder date is required"));
        assert!(errors.get(field::START_DATE).is_none());
    }

    #[test]
    fn expiry_equal_to_start_is_accepted() {
        let mut draft = complete_draft();
        draft.start_date = Some(date(2025, 1, 1));
        draft.expiry_date = Some(date(2025, 1, 1));
        draft.reminder_date = None;
        let errors = validate(&draft);
        assert!(errors.get(field::EXPIRY_DATE).is_none());
    }

    #[test]
    fn reminder_on_start_date_is_rejected() {
        let mut draft = complete_draft();
        draft.reminder_date = draft.start_date;
        let errors = validate(&draft);
        assert_eq!(
            errors.get(field::REMINDER),
            Some("Reminder date must be after start date and before expiry date")
        );
    }

    #[test]
    fn reminder_on_expiry_date_is_rejected() {
        let mut draft = complete_draft();
        draft.reminder_date = draft.expiry_date;
        let errors = validate(&draft);
        assert!(errors.get(field::REMINDER).is_some());
    }

    #[test]
    fn reminder_strictly_between_passes() {
        let mut draft = complete_draft();
        draft.reminder_date = Some(date(2025, 6, 15));
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn stored_attachment_satisfies_requirement_when_editing() {
        let mut draft = complete_draft();
        draft.id = Some(42);
        draft.attachment = Some(Attachment::stored("agreements/2/ab12.pdf"));
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn attachment_required_on_create() {
        let mut draft = complete_draft();
        draft.attachment = None;
        let errors = validate(&draft);
        assert_eq!(errors.get(field::ATTACHMENT), Some("Attachment is required"));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut draft = complete_draft();
        draft.reminder_date = draft.expiry_date;
        let first = validate(&draft);
        let second = validate(&draft);
        assert_eq!(first, second);
    }

    #[test]
    fn whitespace_only_title_is_rejected() {
        let mut draft = complete_draft();
        draft.title = "   ".into();
        let errors = validate(&draft);
        assert_eq!(errors.get(field::TITLE), Some("Title is required"));
    }
}
