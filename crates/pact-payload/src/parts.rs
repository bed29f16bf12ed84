// parts.rs — transport-agnostic payload shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One part of a multipart submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// The body of a submission in one of the two supported encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadBody {
    Multipart(Vec<FormPart>),
    Json(Value),
}

/// A complete submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub body: PayloadBody,
}

impl Payload {
    /// The content type the transport should declare.
    pub fn content_type(&self) -> &'static str {
        match self.body {
            PayloadBody::Multipart(_) => "multipart/form-data",
            PayloadBody::Json(_) => "application/json",
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, PayloadBody::Multipart(_))
    }

    /// The multipart parts, if this is a multipart payload.
    pub fn parts(&self) -> Option<&[FormPart]> {
        match &self.body {
            PayloadBody::Multipart(parts) => Some(parts),
            PayloadBody::Json(_) => None,
        }
    }

    /// The JSON body, if this is a structured payload.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            PayloadBody::Json(value) => Some(value),
            PayloadBody::Multipart(_) => None,
        }
    }

    /// Look up a text part by name (test and logging helper).
    pub fn text_part(&self, name: &str) -> Option<&str> {
        self.parts()?.iter().find_map(|p| match p {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }
}
