// notice.rs — out-of-band notifications.
//
// The detached create path finishes after the workflow has already moved
// on, so its outcome cannot land in the field-error map — it arrives here
// instead, as a toast-style notice. The reminder diagnostic reports the
// same way. Sinks are pluggable; sink failures never stop the workflow.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A transient, user-facing notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// A submission (blocking or detached) was accepted.
    SubmitSucceeded {
        title: String,
        agreement_id: Option<i64>,
    },

    /// A detached submission failed after the workflow moved on.
    SubmitFailed { title: String, message: String },

    /// The test reminder went out.
    ReminderSent { email: Option<String> },

    /// The test reminder could not be sent.
    ReminderFailed { message: String },
}

impl Notice {
    /// The notice kind as a stable string (for logs and filtering).
    pub fn kind(&self) -> &str {
        match self {
            Notice::SubmitSucceeded { .. } => "submit_succeeded",
            Notice::SubmitFailed { .. } => "submit_failed",
            Notice::ReminderSent { .. } => "reminder_sent",
            Notice::ReminderFailed { .. } => "reminder_failed",
        }
    }
}

/// Receives notices. Implementations decide presentation: log line,
/// terminal toast, channel to a UI task.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Always-available sink that logs through tracing.
pub struct LogSink;

impl NoticeSink for LogSink {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::SubmitFailed { title, message } => {
                tracing::warn!(kind = notice.kind(), title, message, "notice");
            }
            Notice::ReminderFailed { message } => {
                tracing::warn!(kind = notice.kind(), message, "notice");
            }
            _ => {
                tracing::info!(kind = notice.kind(), "notice");
            }
        }
    }
}

/// Forwards notices into an unbounded channel. Used by the CLI to print
/// toasts and by tests to observe the detached path.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NoticeSink for ChannelSink {
    fn notify(&self, notice: &Notice) {
        // A dropped receiver just means nobody is watching anymore.
        let _ = self.tx.send(notice.clone());
    }
}

/// Fans notices out to every registered sink.
#[derive(Default)]
pub struct NoticeBus {
    sinks: Vec<Box<dyn NoticeSink>>,
}

impl NoticeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn NoticeSink>) {
        self.sinks.push(sink);
    }

    pub fn dispatch(&self, notice: &Notice) {
        for sink in &self.sinks {
            sink.notify(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new();
        let mut bus = NoticeBus::new();
        bus.add_sink(Box::new(sink));
        bus.add_sink(Box::new(LogSink));

        bus.dispatch(&Notice::ReminderSent {
            email: Some("dana@example.com".into()),
        });

        let got = rx.try_recv().unwrap();
        assert_eq!(got.kind(), "reminder_sent");
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.notify(&Notice::SubmitFailed {
            title: "MSA".into(),
            message: "boom".into(),
        });
    }

    #[test]
    fn notice_serialization_uses_kind_tag() {
        let json = serde_json::to_string(&Notice::SubmitSucceeded {
            title: "MSA".into(),
            agreement_id: Some(42),
        })
        .unwrap();
        assert!(json.contains("\"submit_succeeded\""));
    }
}
