//! # pact-workflow
//!
//! The agreement drafting workflow: Draft → Preview → Submit.
//!
//! [`WorkflowController`] owns the in-progress draft and is the only thing
//! that mutates it, in response to discrete user and network-completion
//! events. Leaving the drafting phase is guarded by validation; leaving
//! the preview phase builds the wire payload and calls the backend; a
//! failed submit returns control to the preview with server errors merged
//! into the field-error map.
//!
//! ## Key components
//!
//! - [`Phase`] — the phase machine (Drafting → Previewing → Submitting → Done)
//! - [`WorkflowController`] — orchestration over an [`AgreementApi`](pact_client::AgreementApi)
//! - [`AgreementSummary`] — the normalized preview read-model
//! - [`AccessGate`] — capability probe barring the restricted role from
//!   create/edit
//! - [`Notice`] / [`NoticeSink`] — out-of-band notifications for the
//!   fire-and-forget submission path

pub mod controller;
pub mod error;
pub mod gate;
pub mod notice;
pub mod phase;
pub mod preview;

pub use controller::{SaveResult, WorkflowController};
pub use error::WorkflowError;
pub use gate::{AccessGate, GateState};
pub use notice::{ChannelSink, LogSink, Notice, NoticeBus, NoticeSink};
pub use phase::Phase;
pub use preview::AgreementSummary;
