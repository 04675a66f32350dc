//! XML marshalling via quick-xml's serde support.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use dorepo_core::error::{AppError, ErrorKind};
use dorepo_core::result::AppResult;

use crate::entity::IntellectualEntity;
use crate::marshal::Marshaller;
use crate::representation::Representation;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Root element of an entity document.
pub const ENTITY_ROOT: &str = "entity";
/// Root element of a standalone representation document.
pub const REPRESENTATION_ROOT: &str = "representation";

/// XML marshaller. Stateless; clone freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlMarshaller;

impl XmlMarshaller {
    /// Create a marshaller.
    pub fn new() -> Self {
        Self
    }

    fn encode<T: Serialize>(root: &str, value: &T) -> AppResult<Bytes> {
        let body = quick_xml::se::to_string_with_root(root, value).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to encode <{root}> document"),
                e,
            )
        })?;

        let mut out = String::with_capacity(XML_DECLARATION.len() + body.len() + 1);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        out.push_str(&body);
        Ok(Bytes::from(out))
    }

    fn decode<T: DeserializeOwned>(what: &str, bytes: &[u8]) -> AppResult<T> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| AppError::serialization(format!("{what} document is not UTF-8: {e}")))?;

        quick_xml::de::from_str(text).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Malformed {what} document: {e}"),
                e,
            )
        })
    }
}

impl Marshaller for XmlMarshaller {
    fn content_type(&self) -> &'static str {
        "application/xml"
    }

    fn deserialize_entity(&self, bytes: &[u8]) -> AppResult<IntellectualEntity> {
        Self::decode("entity", bytes)
    }

    fn serialize_entity(&self, entity: &IntellectualEntity) -> AppResult<Bytes> {
        Self::encode(ENTITY_ROOT, entity)
    }

    fn deserialize_representation(&self, bytes: &[u8]) -> AppResult<Representation> {
        Self::decode("representation", bytes)
    }

    fn serialize_representation(&self, representation: &Representation) -> AppResult<Bytes> {
        Self::encode(REPRESENTATION_ROOT, representation)
    }
}
