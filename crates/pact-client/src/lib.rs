//! # pact-client
//!
//! The backend seam of the Pact workflow.
//!
//! [`AgreementApi`] is the trait the workflow controller talks to; the
//! reqwest-backed [`HttpAgreementApi`] is the production implementation,
//! and tests substitute in-memory fakes. Session identity (base URL +
//! bearer token) is threaded in explicitly as a [`Session`] value — there
//! is no ambient global state.
//!
//! The response contract is uniform: submits answer with a `success` flag
//! plus either a per-field error map or a single message. Authorization
//! failures surface as [`ApiError::AccessDenied`], which is a role signal
//! for the workflow's gate, not a transport failure.

pub mod api;
pub mod error;
pub mod http;
pub mod stats;

pub use api::{
    AgreementApi, AgreementType, CallerInfo, Department, FormMetadata, ReminderReceipt,
    SubmitOutcome, SubmitResponse, Vendor,
};
pub use error::ApiError;
pub use http::{HttpAgreementApi, Session};
pub use stats::{BreakdownRow, DashboardStats, StatsPoller};
