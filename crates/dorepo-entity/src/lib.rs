//! # dorepo-entity
//!
//! Domain model for dorepo: intellectual entities, their representations
//! and files, lifecycle states, and the composite keys under which stored
//! payloads are addressed. Every type here is an immutable value object;
//! transformations return new values.
//!
//! The [`marshal`] module converts the object graph to and from its XML
//! wire representation.

pub mod entity;
pub mod file;
pub mod marshal;
pub mod representation;

pub use entity::{
    DescriptiveMetadata, IntellectualEntity, LifecycleState, LifecycleStatus, MetadataElement,
};
pub use file::{File, FileKey};
pub use marshal::{Marshaller, XmlMarshaller};
pub use representation::Representation;
