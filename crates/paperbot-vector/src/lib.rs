#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod memory;
pub mod pinecone;

mod config;
mod error;
mod index;

pub use config::VectorIndexConfig;
pub use error::{VectorError, VectorResult};
pub use index::{VectorIndexBackend, VectorIndexManager, VectorMatch, VectorRecord};
pub use memory::MemoryBackend;
pub use pinecone::{PineconeBackend, PineconeConfig};

/// Tracing target for vector index operations.
pub const TRACING_TARGET: &str = "paperbot_vector";
