//! File domain types and composite storage keys.

pub mod key;
pub mod model;

pub use key::FileKey;
pub use model::File;
