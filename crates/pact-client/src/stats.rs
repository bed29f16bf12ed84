// stats.rs — dashboard aggregate statistics and the fixed-interval poller.
//
// The poller repeats on a fixed period with no backoff and no overlap
// suppression; stopping it prevents future ticks but does not abort a
// request already in flight. Failures are logged and the previous snapshot
// stands until the next successful tick.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::AgreementApi;

/// One labelled slice of a breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub name: String,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Aggregate agreement statistics for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub active: i64,
    #[serde(default, rename = "expiringSoon")]
    pub expiring_soon: i64,
    #[serde(default)]
    pub expired: i64,
    #[serde(default, rename = "agreementDeptData")]
    pub by_department: Vec<BreakdownRow>,
    #[serde(default, rename = "agreementStatusData")]
    pub by_status: Vec<BreakdownRow>,
}

/// Repeatedly fetches [`DashboardStats`] on a fixed interval and forwards
/// each snapshot to a channel.
pub struct StatsPoller {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl StatsPoller {
    /// Start polling. The first fetch happens immediately, then every
    /// `period`. Snapshots go out on the returned channel; when the
    /// channel is full the snapshot is skipped rather than blocking.
    pub fn spawn<A>(api: Arc<A>, period: Duration) -> (Self, mpsc::Receiver<DashboardStats>)
    where
        A: AgreementApi + 'static,
    {
        let (tx, rx) = mpsc::channel(8);
        let (stop, mut stopped) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = stopped.changed() => {
                        // A dropped sender means the poller handle is gone;
                        // stop polling in that case too.
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                        continue;
                    }
                }
                match api.dashboard_stats().await {
                    Ok(stats) => {
                        // A full channel means nobody is listening right
                        // now; skip the snapshot rather than block the tick.
                        let _ = tx.try_send(stats);
                    }
                    Err(error) => {
                        tracing::warn!(%error, "dashboard stats poll failed");
                    }
                }
            }
        });
        (Self { stop, handle }, rx)
    }

    /// Stop future ticks. An in-flight request is not aborted.
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }

    /// Stop and wait for the polling task to wind down.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FormMetadata, ReminderReceipt, SubmitOutcome, Vendor};
    use crate::error::ApiError;
    use async_trait::async_trait;
    use pact_access::AccessUser;
    use pact_draft::PersistedAgreement;
    use pact_payload::Payload;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AgreementApi for CountingApi {
        async fn form_metadata(&self) -> Result<FormMetadata, ApiError> {
            unimplemented!()
        }
        async fn vendors(&self) -> Result<Vec<Vendor>, ApiError> {
            unimplemented!()
        }
        async fn available_users(&self) -> Result<Vec<AccessUser>, ApiError> {
            unimplemented!()
        }
        async fn users_with_access(&self, _: i64) -> Result<Vec<AccessUser>, ApiError> {
            unimplemented!()
        }
        async fn agreement(&self, _: i64) -> Result<PersistedAgreement, ApiError> {
            unimplemented!()
        }
        async fn create_agreement(&self, _: &Payload) -> Result<SubmitOutcome, ApiError> {
            unimplemented!()
        }
        async fn edit_agreement(&self, _: i64, _: &Payload) -> Result<SubmitOutcome, ApiError> {
            unimplemented!()
        }
        async fn test_reminder(&self, _: i64) -> Result<ReminderReceipt, ApiError> {
            unimplemented!()
        }
        async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
            Ok(DashboardStats {
                active: n,
                ..DashboardStats::default()
            })
        }
    }

    #[tokio::test]
    async fn poller_emits_snapshots_until_stopped() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let (poller, mut rx) = StatsPoller::spawn(api.clone(), Duration::from_millis(5));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.active, 0);
        assert_eq!(second.active, 1);

        poller.shutdown().await;
        let after_stop = api.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(api.calls.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn stats_deserialize_from_wire_names() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "active": 3,
            "expiringSoon": 1,
            "expired": 2,
            "agreementDeptData": [{"name": "Legal", "value": 2}],
            "agreementStatusData": [{"name": "Expired", "value": 2, "color": "#e74c3c"}]
        }))
        .unwrap();
        assert_eq!(stats.expiring_soon, 1);
        assert_eq!(stats.by_department[0].name, "Legal");
        assert_eq!(stats.by_status[0].color.as_deref(), Some("#e74c3c"));
    }
}
