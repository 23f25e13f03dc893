//! JSON file backup
//!
//! The file holds a single JSON array of `{types, name, value}` records. Every
//! write rewrites the whole array through a temporary file and a rename.

mod local;
mod types;

pub use local::FileStorage;
pub use types::StorageRecord;
