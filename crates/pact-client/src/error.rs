// error.rs — the client-side error taxonomy.
//
// AccessDenied (403) is deliberately separate from the general Api case:
// it is the sole trigger for the workflow's capability gate, and for
// session handling it must stay distinguishable from validation failures.
// SessionInvalid (401) is only surfaced here — clearing the session and
// redirecting is the transport collaborator's job, never this crate's.

use thiserror::Error;

/// Errors produced by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the call with an authorization-denied status.
    #[error("access denied by '{endpoint}'")]
    AccessDenied { endpoint: String },

    /// The session is no longer accepted (expired or revoked token).
    #[error("session is no longer valid (rejected by '{endpoint}')")]
    SessionInvalid { endpoint: String },

    /// Any other non-success status.
    #[error("backend returned {status} for '{endpoint}': {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("could not decode response from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Whether this is the authorization-denied outcome the capability
    /// gate probes for.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ApiError::AccessDenied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_access_denied_reads_as_denied() {
        assert!(ApiError::AccessDenied {
            endpoint: "agreements/form-data/".into()
        }
        .is_access_denied());
        assert!(!ApiError::SessionInvalid {
            endpoint: "x".into()
        }
        .is_access_denied());
        assert!(!ApiError::Api {
            endpoint: "x".into(),
            status: 500,
            message: "boom".into()
        }
        .is_access_denied());
    }
}
