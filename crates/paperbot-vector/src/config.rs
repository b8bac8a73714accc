//! Vector index configuration types.

use serde::{Deserialize, Serialize};

pub use crate::pinecone::PineconeConfig;

/// Vector index backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum VectorIndexConfig {
    /// Pinecone managed vector database.
    Pinecone(PineconeConfig),
    /// In-memory index (tests and local development).
    Memory,
}

impl VectorIndexConfig {
    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Pinecone(_) => "pinecone",
            Self::Memory => "memory",
        }
    }
}
