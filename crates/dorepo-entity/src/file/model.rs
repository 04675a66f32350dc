//! File value object.

use serde::{Deserialize, Serialize};

/// A binary payload reference inside a representation.
///
/// At submission time `uri` points wherever the client keeps the payload;
/// after ingest it points at this server's `/file/{key}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    identifier: String,
    uri: String,
    #[serde(rename = "mimetype", default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
}

impl File {
    /// Create a file reference.
    pub fn new(identifier: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            uri: uri.into(),
            mime_type: None,
        }
    }

    /// Return a copy with the MIME type set.
    pub fn with_mime_type(self, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            ..self
        }
    }

    /// Return a copy pointing at `uri`; every other field is kept.
    pub fn with_uri(&self, uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..self.clone()
        }
    }

    /// File identifier, unique within its representation.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Source or rewritten URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Declared MIME type.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}
