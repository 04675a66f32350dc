//! Request handlers, one module per resource.

pub mod entity;
pub mod file;
pub mod representation;
pub mod reserved;
