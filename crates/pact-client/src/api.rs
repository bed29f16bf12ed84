// api.rs — the AgreementApi trait and the backend's response shapes.
//
// The trait is the seam between the workflow and the transport: the
// controller only ever sees these types, so tests drive it with in-memory
// implementations and the CLI plugs in the reqwest client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pact_access::AccessUser;
use pact_draft::{FieldErrors, NamedRef, PersistedAgreement};
use pact_payload::Payload;

use crate::error::ApiError;
use crate::stats::DashboardStats;

/// A selectable department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    /// Executive departments are barred from creating agreements.
    #[serde(default)]
    pub executive: bool,
}

/// A selectable agreement type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementType {
    pub id: i64,
    pub name: String,
}

/// A selectable counterparty from the vendor roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
}

/// The caller's identity as reported by the form-metadata endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub department: Option<NamedRef>,
}

/// Everything the drafting form needs up front: the selectable option
/// lists plus who is asking (used for the department default).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormMetadata {
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub agreement_types: Vec<AgreementType>,
    #[serde(default, rename = "user_info")]
    pub caller: Option<CallerInfo>,
}

impl FormMetadata {
    /// The caller's own department id, if known — the default department
    /// for a fresh draft.
    pub fn caller_department(&self) -> Option<i64> {
        self.caller
            .as_ref()
            .and_then(|c| c.department.as_ref())
            .map(|d| d.id)
    }
}

/// Raw create/edit response envelope: `{success, errors|message|error, data}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl SubmitResponse {
    /// Collapse the envelope into the outcome the workflow acts on.
    pub fn into_outcome(self) -> SubmitOutcome {
        if self.success {
            return SubmitOutcome::Saved { data: self.data };
        }
        let field_errors = self
            .errors
            .as_ref()
            .map(FieldErrors::from_wire)
            .unwrap_or_default();
        SubmitOutcome::Rejected {
            field_errors,
            message: self.message.or(self.error),
        }
    }
}

/// The interpreted result of a create/edit submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The backend accepted and persisted the agreement.
    Saved { data: Option<Value> },
    /// The backend refused; field errors and/or a general message follow.
    Rejected {
        field_errors: FieldErrors,
        message: Option<String>,
    },
}

/// Result of the test-reminder diagnostic call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Recipient address, when the backend reports one.
    #[serde(default, alias = "to")]
    pub email: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The backend operations the workflow consumes.
///
/// Exact paths are the HTTP implementation's concern; these are the
/// conceptual contracts.
#[async_trait]
pub trait AgreementApi: Send + Sync {
    /// Department list, agreement-type list and caller identity. This is
    /// also the privileged probe the capability gate uses: executives get
    /// an authorization-denied rejection here.
    async fn form_metadata(&self) -> Result<FormMetadata, ApiError>;

    /// Selectable counterparties.
    async fn vendors(&self) -> Result<Vec<Vendor>, ApiError>;

    /// The roster feeding local access resolution for unsaved drafts.
    async fn available_users(&self) -> Result<Vec<AccessUser>, ApiError>;

    /// The backend's already-computed access list for a persisted
    /// agreement.
    async fn users_with_access(&self, agreement_id: i64) -> Result<Vec<AccessUser>, ApiError>;

    /// Fetch one persisted agreement for edit-mode hydration.
    async fn agreement(&self, agreement_id: i64) -> Result<PersistedAgreement, ApiError>;

    /// Create a new agreement (multipart payload).
    async fn create_agreement(&self, payload: &Payload) -> Result<SubmitOutcome, ApiError>;

    /// Edit a persisted agreement (multipart or structured payload).
    async fn edit_agreement(
        &self,
        agreement_id: i64,
        payload: &Payload,
    ) -> Result<SubmitOutcome, ApiError>;

    /// Fire-and-forget reminder diagnostic.
    async fn test_reminder(&self, agreement_id: i64) -> Result<ReminderReceipt, ApiError>;

    /// Aggregate statistics for the dashboard poller.
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}
