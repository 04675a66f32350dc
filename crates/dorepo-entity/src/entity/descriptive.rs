//! Descriptive metadata block.

use serde::{Deserialize, Serialize};

/// A typed descriptive metadata block (e.g. Dublin Core), passed through
/// ingest unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptiveMetadata {
    #[serde(rename = "@type")]
    kind: String,
    #[serde(rename = "element", default)]
    elements: Vec<MetadataElement>,
}

/// One named metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "$text", default)]
    value: String,
}

impl DescriptiveMetadata {
    /// Create an empty block of the given type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            elements: Vec::new(),
        }
    }

    /// Return a copy with one more element appended.
    pub fn with_element(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.elements.push(MetadataElement {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Metadata schema type.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Elements in document order.
    pub fn elements(&self) -> &[MetadataElement] {
        &self.elements
    }

    /// First value recorded under `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }
}

impl MetadataElement {
    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element text.
    pub fn value(&self) -> &str {
        &self.value
    }
}
