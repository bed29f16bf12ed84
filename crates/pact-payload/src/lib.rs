//! # pact-payload
//!
//! Turns a validated [`AgreementDraft`](pact_draft::AgreementDraft) into the
//! wire payload the backend expects. The payload is transport-agnostic: a
//! multipart submission is an ordered list of [`FormPart`]s and a
//! structured submission is a JSON value; the HTTP layer maps either onto
//! its client types.
//!
//! Encoding selection is the one branchy part: any pending binary upload
//! forces multipart regardless of mode, create mode is always multipart,
//! and only an edit that leaves the attachment untouched goes out as JSON.

pub mod builder;
pub mod parts;

pub use builder::{build, PayloadError};
pub use parts::{FormPart, Payload, PayloadBody};
