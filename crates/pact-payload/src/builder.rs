// builder.rs — PayloadBuilder: draft + mode → wire payload.
//
// Encoding policy:
//
//   mode   | attachment          | body                       | encoding
//   -------+---------------------+----------------------------+----------
//   create | new binary          | fields + binary part       | multipart
//   create | stored path         | fields + existing path     | multipart
//   edit   | new binary          | fields + binary part       | multipart
//   edit   | unchanged / none    | structured fields only     | json
//
// Reference fields are unwrapped to scalar ids before emission, whatever
// shape the draft currently holds. Remarks are always emitted, as an empty
// string when blank.

use chrono::NaiveDate;
use thiserror::Error;

use pact_draft::{field, AgreementDraft, Attachment, Mode, RefValue};

use crate::parts::{FormPart, Payload, PayloadBody};

/// Errors from payload construction. These indicate a draft that was not
/// validated first; the workflow never submits such a draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("field '{0}' is required for submission")]
    MissingField(&'static str),

    #[error("reference field '{0}' does not hold a usable id")]
    BadReference(&'static str),
}

/// Build the submission payload for a draft.
pub fn build(draft: &AgreementDraft, mode: Mode) -> Result<Payload, PayloadError> {
    let agreement_type = ref_id(&draft.agreement_type, field::AGREEMENT_TYPE)?;
    let department = ref_id(&draft.department, field::DEPARTMENT)?;
    let party = draft
        .party_name
        .ok_or(PayloadError::MissingField(field::PARTY))?;
    let start = date(draft.start_date, field::START_DATE)?;
    let expiry = date(draft.expiry_date, field::EXPIRY_DATE)?;
    let reminder = date(draft.reminder_date, field::REMINDER)?;

    let new_upload = draft
        .attachment
        .as_ref()
        .is_some_and(Attachment::is_upload);

    let body = if mode == Mode::Create || new_upload {
        let mut parts = vec![
            FormPart::text(field::TITLE, &draft.title),
            FormPart::text(field::REFERENCE, &draft.agreement_reference),
            FormPart::text(field::AGREEMENT_TYPE, agreement_type.to_string()),
            FormPart::text(field::DEPARTMENT, department.to_string()),
            FormPart::text(field::START_DATE, start),
            FormPart::text(field::EXPIRY_DATE, expiry),
            FormPart::text(field::REMINDER, reminder),
            FormPart::text(field::PARTY, party.to_string()),
            FormPart::text("remarks", &draft.remarks),
        ];
        match &draft.attachment {
            Some(Attachment::Upload { file_name, bytes }) => {
                parts.push(FormPart::file(
                    field::ATTACHMENT,
                    file_name.clone(),
                    bytes.clone(),
                ));
            }
            // An already-persisted file re-submitted through the create
            // endpoint travels as its path.
            Some(Attachment::Stored { path }) => {
                parts.push(FormPart::text("existing_attachment", path.clone()));
            }
            None => return Err(PayloadError::MissingField(field::ATTACHMENT)),
        }
        PayloadBody::Multipart(parts)
    } else {
        // Edit without a replacement upload: structured fields only, the
        // stored attachment is preserved server-side. Department goes out
        // as a number, not a string.
        PayloadBody::Json(serde_json::json!({
            "title": draft.title,
            "agreement_reference": draft.agreement_reference,
            "agreement_type": agreement_type,
            "department": department,
            "start_date": start,
            "expiry_date": expiry,
            "reminder_time": reminder,
            "party_name": party,
            "remarks": draft.remarks,
        }))
    };

    Ok(Payload { body })
}

fn ref_id(value: &Option<RefValue>, name: &'static str) -> Result<i64, PayloadError> {
    value
        .as_ref()
        .ok_or(PayloadError::MissingField(name))?
        .id()
        .ok_or(PayloadError::BadReference(name))
}

fn date(value: Option<NaiveDate>, name: &'static str) -> Result<String, PayloadError> {
    value
        .map(|d| d.to_string())
        .ok_or(PayloadError::MissingField(name))
}
