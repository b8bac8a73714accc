//! Repository traits for database access.

mod file;

pub use file::FileRepository;
