// attachment.rs — the two lives of an agreement attachment.
//
// While drafting, an attachment is either a pending binary the user just
// picked (not yet uploaded) or the server-side path of a file persisted by
// an earlier save. Edit mode keeps the stored path until the user replaces
// it with a new upload.

use serde::{Deserialize, Serialize};

/// An agreement attachment in one of its two states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    /// A new binary picked by the user, pending upload.
    Upload { file_name: String, bytes: Vec<u8> },
    /// A file already persisted by the backend, referenced by path.
    Stored { path: String },
}

impl Attachment {
    pub fn upload(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Attachment::Upload {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn stored(path: impl Into<String>) -> Self {
        Attachment::Stored { path: path.into() }
    }

    /// Whether this is a new binary that still needs uploading.
    pub fn is_upload(&self) -> bool {
        matches!(self, Attachment::Upload { .. })
    }

    /// Name suitable for display: the upload's file name, or the last
    /// path segment of a stored file.
    pub fn display_name(&self) -> &str {
        match self {
            Attachment::Upload { file_name, .. } => file_name,
            Attachment::Stored { path } => path.rsplit('/').next().unwrap_or(path),
        }
    }
}
