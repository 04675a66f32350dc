//! Intellectual entity domain types.

pub mod descriptive;
pub mod lifecycle;
pub mod model;

pub use descriptive::{DescriptiveMetadata, MetadataElement};
pub use lifecycle::{LifecycleState, LifecycleStatus};
pub use model::IntellectualEntity;
