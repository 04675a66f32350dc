//! Intellectual entity value object.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;

use crate::entity::descriptive::DescriptiveMetadata;
use crate::entity::lifecycle::LifecycleState;
use crate::file::key::validate_segment;
use crate::representation::Representation;

/// The root unit of preservation.
///
/// The identifier is fixed at construction. Changing anything else goes
/// through a `with_*` method that returns a new entity and leaves every
/// other field as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntellectualEntity {
    identifier: String,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(rename = "lifecycle", default, skip_serializing_if = "Option::is_none")]
    lifecycle: Option<LifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    descriptive: Option<DescriptiveMetadata>,
    #[serde(rename = "representation", default)]
    representations: Vec<Representation>,
}

fn default_version() -> u32 {
    1
}

impl IntellectualEntity {
    /// Create an entity with no metadata and no representations.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: default_version(),
            lifecycle: None,
            descriptive: None,
            representations: Vec::new(),
        }
    }

    /// Return a copy with the version number set.
    pub fn with_version(&self, version: u32) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    /// Return a copy carrying `state` as its lifecycle.
    pub fn with_lifecycle(&self, state: LifecycleState) -> Self {
        Self {
            lifecycle: Some(state),
            ..self.clone()
        }
    }

    /// Return a copy with the descriptive metadata block set.
    pub fn with_descriptive(&self, descriptive: DescriptiveMetadata) -> Self {
        Self {
            descriptive: Some(descriptive),
            ..self.clone()
        }
    }

    /// Return a copy holding `representations` in place of the current ones.
    pub fn with_representations(&self, representations: Vec<Representation>) -> Self {
        Self {
            identifier: self.identifier.clone(),
            version: self.version,
            lifecycle: self.lifecycle.clone(),
            descriptive: self.descriptive.clone(),
            representations,
        }
    }

    /// Entity identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Version number (1 for a first submission).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Lifecycle state; `None` before the first ingest.
    pub fn lifecycle(&self) -> Option<&LifecycleState> {
        self.lifecycle.as_ref()
    }

    /// Descriptive metadata block.
    pub fn descriptive(&self) -> Option<&DescriptiveMetadata> {
        self.descriptive.as_ref()
    }

    /// Representations in submission order.
    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    /// First representation whose identifier equals `id`.
    pub fn representation(&self, id: &str) -> Option<&Representation> {
        self.representations.iter().find(|r| r.identifier() == id)
    }

    /// Total number of files across all representations.
    pub fn file_count(&self) -> usize {
        self.representations.iter().map(|r| r.files().len()).sum()
    }

    /// Check that every identifier can serve as a key segment and that
    /// representation identifiers are unique.
    pub fn validate(&self) -> AppResult<()> {
        validate_segment("entity", &self.identifier)?;

        let mut seen = HashSet::new();
        for rep in &self.representations {
            rep.validate()?;
            if !seen.insert(rep.identifier()) {
                return Err(AppError::validation(format!(
                    "Duplicate representation identifier '{}' in entity '{}'",
                    rep.identifier(),
                    self.identifier
                )));
            }
        }
        Ok(())
    }
}
