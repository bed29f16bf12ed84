// http.rs — the reqwest-backed AgreementApi implementation.
//
// Paths mirror the agreements backend. Status mapping: 403 becomes
// AccessDenied (the gate's signal), 401 becomes SessionInvalid, any other
// non-2xx becomes Api — except create/edit, where a non-2xx body may still
// carry the `{success, errors}` envelope with field-level detail and is
// parsed before falling back to a status error.

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use pact_access::AccessUser;
use pact_draft::PersistedAgreement;
use pact_payload::{FormPart, Payload, PayloadBody};

use crate::api::{
    AgreementApi, FormMetadata, ReminderReceipt, SubmitOutcome, SubmitResponse, Vendor,
};
use crate::error::ApiError;
use crate::stats::DashboardStats;

/// Explicit session identity, established at sign-in and passed in rather
/// than read from ambient storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Base URL of the backend API, e.g. `https://host/api/`.
    pub base_url: String,
    /// Bearer token; absent for anonymous probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Production AgreementApi over HTTP.
pub struct HttpAgreementApi {
    session: Session,
    client: reqwest::Client,
}

impl HttpAgreementApi {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        let base = self.session.base_url.trim_end_matches('/');
        format!("{base}/{path}")
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a non-success status to the error taxonomy. Returns the
    /// response untouched when the status is fine.
    async fn checked(path: &str, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::AccessDenied {
                endpoint: path.to_string(),
            });
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionInvalid {
                endpoint: path.to_string(),
            });
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Api {
            endpoint: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let response = self
            .authorized(self.client.get(self.url(path)))
            .send()
            .await?;
        let response = Self::checked(path, response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }

    /// Send a create/edit payload and interpret the envelope. Field-level
    /// rejections often ride on a 400 status, so the body is parsed before
    /// any status-based error except the authorization ones.
    async fn send_submit(
        &self,
        path: &str,
        builder: RequestBuilder,
        payload: &Payload,
    ) -> Result<SubmitOutcome, ApiError> {
        tracing::debug!(path, content_type = payload.content_type(), "submit");
        let builder = match &payload.body {
            PayloadBody::Multipart(parts) => builder.multipart(to_multipart(parts)),
            PayloadBody::Json(value) => builder.json(value),
        };
        let response = self.authorized(builder).send().await?;
        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::AccessDenied {
                endpoint: path.to_string(),
            });
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionInvalid {
                endpoint: path.to_string(),
            });
        }
        let body = response.text().await?;
        match serde_json::from_str::<SubmitResponse>(&body) {
            Ok(envelope) => Ok(envelope.into_outcome()),
            Err(_) if !status.is_success() => Err(ApiError::Api {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message: body,
            }),
            Err(source) => Err(ApiError::Decode {
                endpoint: path.to_string(),
                source,
            }),
        }
    }
}

fn to_multipart(parts: &[FormPart]) -> multipart::Form {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                bytes,
            } => form.part(
                name.clone(),
                multipart::Part::bytes(bytes.clone()).file_name(file_name.clone()),
            ),
        };
    }
    form
}

/// Wrapper shape of the available-users endpoint.
#[derive(Deserialize)]
struct AvailableUsersEnvelope {
    #[serde(default)]
    available_users: Vec<AccessUser>,
}

/// Wrapper shape of the users-with-access endpoint.
#[derive(Deserialize)]
struct AssignedUsersEnvelope {
    #[serde(default)]
    assigned_users: Vec<AccessUser>,
}

#[async_trait]
impl AgreementApi for HttpAgreementApi {
    async fn form_metadata(&self) -> Result<FormMetadata, ApiError> {
        self.get_json("agreements/form-data/").await
    }

    async fn vendors(&self) -> Result<Vec<Vendor>, ApiError> {
        self.get_json("accounts/vendors/").await
    }

    async fn available_users(&self) -> Result<Vec<AccessUser>, ApiError> {
        let envelope: AvailableUsersEnvelope = self.get_json("agreements/users/available/").await?;
        Ok(envelope.available_users)
    }

    async fn users_with_access(&self, agreement_id: i64) -> Result<Vec<AccessUser>, ApiError> {
        let path = format!("agreements/{agreement_id}/users-with-access/");
        let envelope: AssignedUsersEnvelope = self.get_json(&path).await?;
        Ok(envelope.assigned_users)
    }

    async fn agreement(&self, agreement_id: i64) -> Result<PersistedAgreement, ApiError> {
        self.get_json(&format!("agreements/{agreement_id}/")).await
    }

    async fn create_agreement(&self, payload: &Payload) -> Result<SubmitOutcome, ApiError> {
        let path = "agreements/submit/";
        let builder = self.client.post(self.url(path));
        self.send_submit(path, builder, payload).await
    }

    async fn edit_agreement(
        &self,
        agreement_id: i64,
        payload: &Payload,
    ) -> Result<SubmitOutcome, ApiError> {
        let path = format!("agreements/edit/{agreement_id}/");
        let builder = self.client.put(self.url(&path));
        self.send_submit(&path, builder, payload).await
    }

    async fn test_reminder(&self, agreement_id: i64) -> Result<ReminderReceipt, ApiError> {
        let path = format!("agreements/{agreement_id}/test-reminder/");
        tracing::debug!(path = path.as_str(), "POST");
        let response = self
            .authorized(self.client.post(self.url(&path)))
            .send()
            .await?;
        let response = Self::checked(&path, response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: path.clone(),
            source,
        })
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("agreements/dashboard-stats/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_doubled_slash() {
        let api = HttpAgreementApi::new(Session::new("http://localhost:8000/api/"));
        assert_eq!(
            api.url("agreements/form-data/"),
            "http://localhost:8000/api/agreements/form-data/"
        );
        let api = HttpAgreementApi::new(Session::new("http://localhost:8000/api"));
        assert_eq!(
            api.url("agreements/form-data/"),
            "http://localhost:8000/api/agreements/form-data/"
        );
    }

    #[test]
    fn session_token_is_optional() {
        let session = Session::new("http://x/api/");
        assert!(session.token.is_none());
        let session = session.with_token("abc");
        assert_eq!(session.token.as_deref(), Some("abc"));
    }
}
