// error.rs — workflow error types.

use thiserror::Error;

use pact_client::ApiError;
use pact_payload::PayloadError;

use crate::phase::Phase;

/// Errors from workflow orchestration.
///
/// Submission rejections are not errors — they are ordinary outcomes that
/// return control to the preview phase. These variants cover misuse of the
/// phase machine and the failures the transport collaborator must see.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requested operation is not legal in the current phase.
    #[error("invalid phase transition from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },

    /// The operation is bound to a specific phase.
    #[error("operation requires phase {expected}, but workflow is {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    /// The operation needs a persisted agreement (e.g. test reminder
    /// before the first save).
    #[error("agreement has not been saved yet")]
    NotPersisted,

    /// Detached submission is a create-mode path only.
    #[error("detached submission is only available when creating")]
    DetachedEditUnsupported,

    /// The draft could not be encoded — it was never validated.
    #[error("payload construction failed: {0}")]
    Payload(#[from] PayloadError),

    /// A backend call failed in a way the workflow does not absorb
    /// (authorization and session failures, initial-load failures).
    #[error(transparent)]
    Api(#[from] ApiError),
}
