// controller.rs — WorkflowController: orchestrates Draft → Preview → Submit.
//
// The controller exclusively owns the draft. It is mutated only here, in
// response to discrete user events (field changes, phase requests) and
// network completions. Validation guards the exit from Drafting;
// PayloadBuilder and the backend guard the exit from Previewing. A failed
// submit returns control to Previewing with the server's field errors
// merged in; there is no failed phase.
//
// Two submission styles exist:
// - `save` blocks in Submitting until the backend answers (create + edit).
// - `submit_and_continue` (create only) advances to Done immediately and
//   lets the backend call run detached; its outcome arrives as a Notice.
//   The navigation and the submission race by design — no ordering
//   guarantee exists between them.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use pact_access::{resolve, AccessUser};
use pact_client::{AgreementApi, ApiError, FormMetadata, SubmitOutcome, Vendor};
use pact_draft::{
    field, validate, AgreementDraft, Attachment, FieldErrors, Mode, RefValue,
};
use pact_payload::build;

use crate::error::WorkflowError;
use crate::notice::{Notice, NoticeBus};
use crate::phase::Phase;
use crate::preview::AgreementSummary;

/// Message used when a submit fails without any server-provided detail.
const SUBMIT_FAILED: &str = "Failed to submit agreement";

/// Outcome of a blocking save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Persisted; the workflow is Done.
    Saved,
    /// Refused; the workflow is back in Previewing with errors populated.
    Rejected,
}

/// Orchestrates one agreement through drafting, preview and submission.
pub struct WorkflowController<A: AgreementApi> {
    api: Arc<A>,
    notices: Arc<NoticeBus>,
    workflow_id: Uuid,
    mode: Mode,
    phase: Phase,
    draft: AgreementDraft,
    errors: FieldErrors,
    metadata: FormMetadata,
    vendors: Vec<Vendor>,
    /// Roster feeding local access resolution for unsaved drafts.
    available_users: Vec<AccessUser>,
    /// The backend's access list for a persisted agreement.
    granted_users: Vec<AccessUser>,
}

impl<A: AgreementApi> WorkflowController<A> {
    /// Start a create-mode workflow: fetch the option rosters and open an
    /// empty draft, defaulting the department to the caller's own.
    pub async fn create(api: Arc<A>, notices: Arc<NoticeBus>) -> Result<Self, WorkflowError> {
        let metadata = api.form_metadata().await?;
        let vendors = api.vendors().await?;
        let available_users = fetch_roster(api.as_ref()).await;

        let mut draft = AgreementDraft::new();
        draft.department = metadata.caller_department().map(RefValue::Id);

        let workflow_id = Uuid::new_v4();
        tracing::info!(%workflow_id, "starting create workflow");
        Ok(Self {
            api,
            notices,
            workflow_id,
            mode: Mode::Create,
            phase: Phase::Drafting,
            draft,
            errors: FieldErrors::new(),
            metadata,
            vendors,
            available_users,
            granted_users: Vec::new(),
        })
    }

    /// Start an edit-mode workflow: fetch the rosters plus the persisted
    /// record and its access list, then hydrate the draft from it.
    pub async fn edit(
        api: Arc<A>,
        notices: Arc<NoticeBus>,
        agreement_id: i64,
    ) -> Result<Self, WorkflowError> {
        let metadata = api.form_metadata().await?;
        let vendors = api.vendors().await?;
        let available_users = fetch_roster(api.as_ref()).await;
        let record = api.agreement(agreement_id).await?;
        let granted_users = match api.users_with_access(agreement_id).await {
            Ok(users) => users,
            Err(error) => {
                tracing::warn!(%error, agreement_id, "could not fetch access list");
                Vec::new()
            }
        };

        let draft = AgreementDraft::hydrate(record, metadata.caller_department());

        let workflow_id = Uuid::new_v4();
        tracing::info!(%workflow_id, agreement_id, "starting edit workflow");
        Ok(Self {
            api,
            notices,
            workflow_id,
            mode: Mode::Edit,
            phase: Phase::Drafting,
            draft,
            errors: FieldErrors::new(),
            metadata,
            vendors,
            available_users,
            granted_users,
        })
    }

    pub fn workflow_id(&self) -> Uuid {
        self.workflow_id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn draft(&self) -> &AgreementDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn metadata(&self) -> &FormMetadata {
        &self.metadata
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    // ----- field-change events ------------------------------------------
    //
    // Each setter drops the stale error for its field so the message
    // disappears as soon as the user starts fixing it.

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.errors.clear(field::TITLE);
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.draft.agreement_reference = reference.into();
        self.errors.clear(field::REFERENCE);
    }

    pub fn set_agreement_type(&mut self, value: impl Into<RefValue>) {
        self.draft.agreement_type = Some(value.into());
        self.errors.clear(field::AGREEMENT_TYPE);
    }

    pub fn set_department(&mut self, value: impl Into<RefValue>) {
        self.draft.department = Some(value.into());
        self.errors.clear(field::DEPARTMENT);
    }

    /// Select the counterparty. Also legal from the preview, which lets
    /// the user switch vendors without going back to the form.
    pub fn set_party(&mut self, vendor_id: i64) {
        self.draft.party_name = Some(vendor_id);
        self.errors.clear(field::PARTY);
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.draft.start_date = Some(date);
        self.errors.clear(field::START_DATE);
    }

    pub fn set_expiry_date(&mut self, date: NaiveDate) {
        self.draft.expiry_date = Some(date);
        self.errors.clear(field::EXPIRY_DATE);
    }

    pub fn set_reminder_date(&mut self, date: NaiveDate) {
        self.draft.reminder_date = Some(date);
        self.errors.clear(field::REMINDER);
    }

    /// Attach a file. A new upload also becomes the display filename,
    /// replacing the one carried over from the persisted record.
    pub fn attach(&mut self, attachment: Attachment) {
        if let Attachment::Upload { file_name, .. } = &attachment {
            self.draft.original_filename = Some(file_name.clone());
        }
        self.draft.attachment = Some(attachment);
        self.errors.clear(field::ATTACHMENT);
    }

    pub fn set_remarks(&mut self, remarks: impl Into<String>) {
        self.draft.remarks = remarks.into();
    }

    // ----- phase transitions --------------------------------------------

    /// Leave Drafting for Previewing if the draft validates. On failure
    /// the workflow stays in Drafting with the error map replaced
    /// wholesale; no network call happens either way.
    pub fn request_preview(&mut self) -> Result<bool, WorkflowError> {
        self.expect(Phase::Drafting)?;
        let errors = validate(&self.draft);
        let passed = errors.is_empty();
        // Replaced wholesale either way; a stale general banner does not
        // survive a clean validation run.
        self.errors = errors;
        if passed {
            self.transition(Phase::Previewing)?;
        } else {
            tracing::debug!(count = self.errors.len(), "validation failed");
        }
        Ok(passed)
    }

    /// Back from Previewing to Drafting. No validation, no network.
    pub fn request_edit(&mut self) -> Result<(), WorkflowError> {
        self.expect(Phase::Previewing)?;
        self.transition(Phase::Drafting)
    }

    /// The normalized confirmation view for the current draft.
    ///
    /// For a persisted agreement the backend's access list is shown; an
    /// unsaved draft falls back to local resolution over the roster.
    pub fn preview(&self) -> AgreementSummary {
        let users = if self.draft.is_persisted() {
            self.granted_users.clone()
        } else {
            resolve(
                self.draft.department.as_ref().and_then(RefValue::id),
                &self.available_users,
            )
        };
        let caller_name = self
            .metadata
            .caller
            .as_ref()
            .map(|c| c.full_name.as_str());
        AgreementSummary::assemble(&self.draft, &self.metadata, &self.vendors, users, caller_name)
    }

    /// Blocking submission: Previewing → Submitting → Done on success, or
    /// back to Previewing with errors on refusal.
    ///
    /// Authorization and session failures propagate as errors for the
    /// transport collaborator; any other transport failure becomes a
    /// general banner message with a retry path.
    pub async fn save(&mut self) -> Result<SaveResult, WorkflowError> {
        self.expect(Phase::Previewing)?;
        self.transition(Phase::Submitting)?;

        let payload = match build(&self.draft, self.mode) {
            Ok(payload) => payload,
            Err(error) => {
                self.transition(Phase::Previewing)?;
                return Err(error.into());
            }
        };

        let result = match self.mode {
            Mode::Create => self.api.create_agreement(&payload).await,
            Mode::Edit => match self.draft.id {
                Some(id) => self.api.edit_agreement(id, &payload).await,
                None => {
                    self.transition(Phase::Previewing)?;
                    return Err(WorkflowError::NotPersisted);
                }
            },
        };

        match result {
            Ok(SubmitOutcome::Saved { data }) => {
                self.transition(Phase::Done)?;
                let agreement_id = saved_id(data.as_ref()).or(self.draft.id);
                tracing::info!(workflow_id = %self.workflow_id, ?agreement_id, "agreement saved");
                self.notices.dispatch(&Notice::SubmitSucceeded {
                    title: self.draft.title.clone(),
                    agreement_id,
                });
                Ok(SaveResult::Saved)
            }
            Ok(SubmitOutcome::Rejected {
                field_errors,
                message,
            }) => {
                self.transition(Phase::Previewing)?;
                if field_errors.is_empty() {
                    self.errors
                        .set_general(message.unwrap_or_else(|| SUBMIT_FAILED.to_string()));
                } else {
                    self.errors.merge(field_errors);
                }
                Ok(SaveResult::Rejected)
            }
            Err(error @ (ApiError::AccessDenied { .. } | ApiError::SessionInvalid { .. })) => {
                self.transition(Phase::Previewing)?;
                Err(error.into())
            }
            Err(error) => {
                tracing::error!(%error, "submit failed");
                self.transition(Phase::Previewing)?;
                self.errors.set_general(SUBMIT_FAILED);
                Ok(SaveResult::Rejected)
            }
        }
    }

    /// Detached create-mode submission: the workflow advances to Done
    /// right away and the backend call runs on its own task. Success or
    /// failure is only ever reported through the notice bus — by the time
    /// it resolves, the form is gone.
    pub fn submit_and_continue(&mut self) -> Result<(), WorkflowError>
    where
        A: 'static,
    {
        if self.mode == Mode::Edit {
            return Err(WorkflowError::DetachedEditUnsupported);
        }
        self.expect(Phase::Previewing)?;
        let payload = build(&self.draft, Mode::Create)?;
        self.transition(Phase::Done)?;

        let api = Arc::clone(&self.api);
        let notices = Arc::clone(&self.notices);
        let title = self.draft.title.clone();
        tracing::info!(workflow_id = %self.workflow_id, "detached submission started");
        tokio::spawn(async move {
            match api.create_agreement(&payload).await {
                Ok(SubmitOutcome::Saved { data }) => {
                    notices.dispatch(&Notice::SubmitSucceeded {
                        title,
                        agreement_id: saved_id(data.as_ref()),
                    });
                }
                Ok(SubmitOutcome::Rejected {
                    field_errors,
                    message,
                }) => {
                    let message = message
                        .or_else(|| {
                            field_errors
                                .iter()
                                .next()
                                .map(|(name, text)| format!("{name}: {text}"))
                        })
                        .unwrap_or_else(|| SUBMIT_FAILED.to_string());
                    notices.dispatch(&Notice::SubmitFailed { title, message });
                }
                Err(error) => {
                    notices.dispatch(&Notice::SubmitFailed {
                        title,
                        message: error.to_string(),
                    });
                }
            }
        });
        Ok(())
    }

    /// Fire-and-forget reminder diagnostic for a persisted agreement.
    /// The outcome is a transient notice; the phase never changes.
    pub async fn send_test_reminder(&self) -> Result<(), WorkflowError> {
        let Some(id) = self.draft.id else {
            return Err(WorkflowError::NotPersisted);
        };
        match self.api.test_reminder(id).await {
            Ok(receipt) if receipt.success => {
                self.notices.dispatch(&Notice::ReminderSent {
                    email: receipt.email,
                });
            }
            Ok(receipt) => {
                self.notices.dispatch(&Notice::ReminderFailed {
                    message: receipt
                        .message
                        .or(receipt.error)
                        .unwrap_or_else(|| "Test reminder failed".to_string()),
                });
            }
            Err(error) => {
                self.notices.dispatch(&Notice::ReminderFailed {
                    message: error.to_string(),
                });
            }
        }
        Ok(())
    }

    fn expect(&self, expected: Phase) -> Result<(), WorkflowError> {
        if self.phase != expected {
            return Err(WorkflowError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: Phase) -> Result<(), WorkflowError> {
        if !self.phase.can_transition_to(next) {
            return Err(WorkflowError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!(workflow_id = %self.workflow_id, from = %self.phase, to = %next, "phase");
        self.phase = next;
        Ok(())
    }
}

/// The new record's id out of a submit response's `data`, when present.
fn saved_id(data: Option<&serde_json::Value>) -> Option<i64> {
    data?.get("id")?.as_i64()
}

/// Roster fetch failures are logged, not fatal: the preview simply shows
/// an empty access list until the roster loads on a later attempt.
async fn fetch_roster<A: AgreementApi>(api: &A) -> Vec<AccessUser> {
    match api.available_users().await {
        Ok(users) => users,
        Err(error) => {
            tracing::warn!(%error, "could not fetch available users");
            Vec::new()
        }
    }
}
