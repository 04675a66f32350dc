//! Composite storage keys.
//!
//! A binary is addressed by `entity/representation/file`. The key is the
//! only address a binary has, so it must be derivable from request path
//! segments alone. Segments travel percent-encoded in URIs and are
//! decoded before they are used as keys.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = '/';

/// Bytes escaped in a URI path segment: everything but RFC 3986 unreserved.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode an identifier for use as one URI path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Decode one raw URI path segment into an identifier. Returns `None` when
/// the decoded text is not valid UTF-8 or not a valid key segment.
pub fn decode_segment(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    is_valid_segment(&decoded).then(|| decoded.into_owned())
}

/// Check whether `segment` can be used as one component of a storage key.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(KEY_SEPARATOR)
        && !segment.contains('\\')
        && !segment.chars().any(char::is_control)
}

/// Validate an identifier that will become a key segment.
pub fn validate_segment(kind: &str, segment: &str) -> AppResult<()> {
    if is_valid_segment(segment) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Invalid {kind} identifier '{segment}': must be non-empty, must not be '.' or '..', \
             and must not contain path separators"
        )))
    }
}

/// Composite key of a stored binary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    entity_id: String,
    representation_id: String,
    file_id: String,
}

impl FileKey {
    /// Build a key from its three identifiers.
    pub fn new(
        entity_id: impl Into<String>,
        representation_id: impl Into<String>,
        file_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            representation_id: representation_id.into(),
            file_id: file_id.into(),
        }
    }

    /// Parse a raw `entity/representation/file` URI path, decoding each
    /// segment. Returns `None` unless there are exactly three valid segments.
    pub fn parse(path: &str) -> Option<Self> {
        let mut parts = path.split(KEY_SEPARATOR);
        let entity_id = decode_segment(parts.next()?)?;
        let representation_id = decode_segment(parts.next()?)?;
        let file_id = decode_segment(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(entity_id, representation_id, file_id))
    }

    /// Entity identifier.
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Representation identifier.
    pub fn representation_id(&self) -> &str {
        &self.representation_id
    }

    /// File identifier.
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// The URI under which a server rooted at `public_url` serves this binary.
    pub fn public_uri(&self, public_url: &str) -> String {
        format!(
            "{}/file/{}/{}/{}",
            public_url.trim_end_matches('/'),
            encode_segment(&self.entity_id),
            encode_segment(&self.representation_id),
            encode_segment(&self.file_id)
        )
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.entity_id, self.representation_id, self.file_id
        )
    }
}
