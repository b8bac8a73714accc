//! Database models.

mod file;

pub use file::{NewFile, StoredFile, UpdateFile};
