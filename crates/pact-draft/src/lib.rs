//! # pact-draft
//!
//! The working model of an agreement before it reaches the backend.
//!
//! An [`AgreementDraft`] is the mutable in-progress copy of one agreement:
//! either empty (create mode) or hydrated from a fetched persisted record
//! (edit mode). Validation is a pure function from draft to a
//! [`FieldErrors`] map — an empty map means the draft is submittable.
//!
//! ## Key components
//!
//! - [`AgreementDraft`] — the draft itself, plus hydration from a
//!   [`PersistedAgreement`]
//! - [`RefValue`] — the single "reference-or-scalar" accessor used everywhere
//!   a reference id is read (backends hand back both `5` and `{id: 5, name}`)
//! - [`Attachment`] — pending binary upload vs. already-persisted file path
//! - [`validate`] — the client-side rule set (required fields, date ordering)
//! - [`FieldErrors`] — ordered field → message map shared with server errors

pub mod attachment;
pub mod draft;
pub mod field_errors;
pub mod refvalue;
pub mod validate;

pub use attachment::Attachment;
pub use draft::{AgreementDraft, Mode, PersistedAgreement};
pub use field_errors::FieldErrors;
pub use refvalue::{NamedRef, RefValue};
pub use validate::{field, validate};
