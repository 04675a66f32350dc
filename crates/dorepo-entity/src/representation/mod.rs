//! Representation domain types.

pub mod model;

pub use model::Representation;
