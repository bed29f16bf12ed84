// gate.rs — the capability gate for the create/edit phases.
//
// The restricted ("executive") role is not a declared claim anywhere the
// client can read; it is detected by probing the privileged form-metadata
// endpoint and interpreting an authorization-denied rejection as the role
// signal. Any other failure — timeouts, server errors — defaults to
// allowed so a flaky backend never locks regular users out.

use pact_client::AgreementApi;

/// Outcome of the capability probe, including the not-yet-known state a
/// caller renders as neutral loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Probe not finished — render neither allowed nor denied content.
    Pending,
    Allowed,
    /// Restricted role: create/edit entry must be refused with a
    /// dedicated denied view, not an error banner.
    Denied,
}

/// Session-derived capability check for entering create/edit.
#[derive(Debug)]
pub struct AccessGate {
    state: GateState,
}

impl AccessGate {
    /// A gate that has not probed yet.
    pub fn new() -> Self {
        Self {
            state: GateState::Pending,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Run the probe and settle the gate. Only an authorization-denied
    /// rejection denies; everything else allows.
    pub async fn probe<A: AgreementApi>(&mut self, api: &A) -> GateState {
        self.state = match api.form_metadata().await {
            Ok(_) => GateState::Allowed,
            Err(error) if error.is_access_denied() => {
                tracing::info!("create/edit denied for restricted role");
                GateState::Denied
            }
            Err(error) => {
                // Transient or unrelated failure: do not deny eagerly.
                tracing::debug!(%error, "gate probe failed for an unrelated reason");
                GateState::Allowed
            }
        };
        self.state
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pact_access::AccessUser;
    use pact_client::{
        ApiError, DashboardStats, FormMetadata, ReminderReceipt, SubmitOutcome, Vendor,
    };
    use pact_draft::PersistedAgreement;
    use pact_payload::Payload;

    /// Probe-only fake: every other operation is unreachable.
    struct ProbeApi {
        result: fn() -> Result<FormMetadata, ApiError>,
    }

    #[async_trait]
    impl AgreementApi for ProbeApi {
        async fn form_metadata(&self) -> Result<FormMetadata, ApiError> {
            (self.result)()
        }
        async fn vendors(&self) -> Result<Vec<Vendor>, ApiError> {
            unreachable!()
        }
        async fn available_users(&self) -> Result<Vec<AccessUser>, ApiError> {
            unreachable!()
        }
        async fn users_with_access(&self, _: i64) -> Result<Vec<AccessUser>, ApiError> {
            unreachable!()
        }
        async fn agreement(&self, _: i64) -> Result<PersistedAgreement, ApiError> {
            unreachable!()
        }
        async fn create_agreement(&self, _: &Payload) -> Result<SubmitOutcome, ApiError> {
            unreachable!()
        }
        async fn edit_agreement(&self, _: i64, _: &Payload) -> Result<SubmitOutcome, ApiError> {
            unreachable!()
        }
        async fn test_reminder(&self, _: i64) -> Result<ReminderReceipt, ApiError> {
            unreachable!()
        }
        async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn successful_probe_allows() {
        let api = ProbeApi {
            result: || Ok(FormMetadata::default()),
        };
        let mut gate = AccessGate::new();
        assert_eq!(gate.state(), GateState::Pending);
        assert_eq!(gate.probe(&api).await, GateState::Allowed);
    }

    #[tokio::test]
    async fn authorization_denied_probe_denies() {
        let api = ProbeApi {
            result: || {
                Err(ApiError::AccessDenied {
                    endpoint: "agreements/form-data/".into(),
                })
            },
        };
        let mut gate = AccessGate::new();
        assert_eq!(gate.probe(&api).await, GateState::Denied);
        assert_eq!(gate.state(), GateState::Denied);
    }

    #[tokio::test]
    async fn unrelated_error_defaults_to_allowed() {
        let api = ProbeApi {
            result: || {
                Err(ApiError::Api {
                    endpoint: "agreements/form-data/".into(),
                    status: 500,
                    message: "boom".into(),
                })
            },
        };
        let mut gate = AccessGate::new();
        assert_eq!(gate.probe(&api).await, GateState::Allowed);
    }
}
