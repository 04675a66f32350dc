//! Representation value object.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;

use crate::file::File;
use crate::file::key::validate_segment;

/// One rendering of an entity (e.g. "original", "derived").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(rename = "file", default)]
    files: Vec<File>,
}

impl Representation {
    /// Create an empty representation.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            files: Vec::new(),
        }
    }

    /// Return a copy with the title set.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    /// Return a copy holding `files` in place of the current ones.
    pub fn with_files(&self, files: Vec<File>) -> Self {
        Self {
            identifier: self.identifier.clone(),
            title: self.title.clone(),
            files,
        }
    }

    /// Representation identifier, unique within its entity.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Optional human-readable title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Files in submission order.
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Check that identifiers are usable as key segments and that file
    /// identifiers are unique.
    pub fn validate(&self) -> AppResult<()> {
        validate_segment("representation", &self.identifier)?;

        let mut seen = HashSet::new();
        for file in &self.files {
            validate_segment("file", file.identifier())?;
            if !seen.insert(file.identifier()) {
                return Err(AppError::validation(format!(
                    "Duplicate file identifier '{}' in representation '{}'",
                    file.identifier(),
                    self.identifier
                )));
            }
        }
        Ok(())
    }
}
