#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;
mod error;

pub use backend::{BlobMetadata, StorageBackend};
pub use config::{FsConfig, S3Config, StorageConfig};
pub use error::{StorageError, StorageResult};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "paperbot_opendal";
