//! Conversion between the entity object graph and its wire bytes.

pub mod xml;

pub use xml::XmlMarshaller;

use bytes::Bytes;

use dorepo_core::result::AppResult;

use crate::entity::IntellectualEntity;
use crate::representation::Representation;

/// Encodes and decodes domain values.
///
/// Malformed input and values that cannot be encoded both surface as
/// `Serialization` errors.
pub trait Marshaller: Send + Sync + std::fmt::Debug + 'static {
    /// Media type of the produced bytes.
    fn content_type(&self) -> &'static str;

    /// Decode a submitted entity document.
    fn deserialize_entity(&self, bytes: &[u8]) -> AppResult<IntellectualEntity>;

    /// Encode an entity document.
    fn serialize_entity(&self, entity: &IntellectualEntity) -> AppResult<Bytes>;

    /// Decode a standalone representation fragment.
    fn deserialize_representation(&self, bytes: &[u8]) -> AppResult<Representation>;

    /// Encode a single representation as a standalone document.
    fn serialize_representation(&self, representation: &Representation) -> AppResult<Bytes>;
}
