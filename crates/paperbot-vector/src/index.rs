//! Vector index trait and unified manager.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;
use crate::config::VectorIndexConfig;
use crate::error::VectorResult;
use crate::memory::MemoryBackend;
use crate::pinecone::PineconeBackend;

/// A vector record to be upserted into an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier for the vector.
    pub id: String,
    /// The embedding values.
    pub values: Vec<f32>,
    /// Attached metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorRecord {
    /// Creates a new vector record with an ID and embedding values.
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            metadata: HashMap::new(),
        }
    }

    /// Adds a single metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A match returned from a nearest-neighbor query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMatch {
    /// Vector ID.
    pub id: String,
    /// Similarity score.
    pub score: f32,
    /// Associated metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorMatch {
    /// Returns the `text` metadata field, if present.
    pub fn text(&self) -> Option<&str> {
        self.metadata.get("text").and_then(|v| v.as_str())
    }
}

/// Trait for vector index backends.
#[async_trait]
pub trait VectorIndexBackend: Send + Sync {
    /// Creates an index if it does not already exist.
    ///
    /// Idempotent: an existing index of the same name is left untouched.
    async fn ensure_index(&self, name: &str, dimensions: usize) -> VectorResult<()>;

    /// Deletes an index. Irreversible.
    async fn delete_index(&self, name: &str) -> VectorResult<()>;

    /// Bulk upserts vectors into an index.
    ///
    /// The call is atomic from the caller's perspective: a partial-batch
    /// failure surfaces as a single error covering the whole call.
    async fn upsert(&self, index: &str, vectors: Vec<VectorRecord>) -> VectorResult<()>;

    /// Queries an index for the `top_k` nearest vectors.
    ///
    /// Matches are ordered by descending similarity.
    async fn query(
        &self,
        index: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> VectorResult<Vec<VectorMatch>>;
}

/// Unified vector index manager that wraps backend implementations.
pub struct VectorIndexManager {
    config: VectorIndexConfig,
    backend: Box<dyn VectorIndexBackend>,
}

impl VectorIndexManager {
    /// Creates a new manager from configuration.
    pub fn new(config: VectorIndexConfig) -> VectorResult<Self> {
        let backend: Box<dyn VectorIndexBackend> = match &config {
            VectorIndexConfig::Pinecone(cfg) => Box::new(PineconeBackend::new(cfg)?),
            VectorIndexConfig::Memory => Box::new(MemoryBackend::new()),
        };

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_name(),
            "Vector index manager initialized"
        );

        Ok(Self { config, backend })
    }

    /// Creates an index if it does not already exist.
    pub async fn ensure_index(&self, name: &str, dimensions: usize) -> VectorResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            index = %name,
            dimensions = %dimensions,
            "Ensuring index"
        );
        self.backend.ensure_index(name, dimensions).await
    }

    /// Deletes an index.
    pub async fn delete_index(&self, name: &str) -> VectorResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            index = %name,
            "Deleting index"
        );
        self.backend.delete_index(name).await
    }

    /// Bulk upserts vectors into an index.
    pub async fn upsert(&self, index: &str, vectors: Vec<VectorRecord>) -> VectorResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            index = %index,
            count = %vectors.len(),
            "Upserting vectors"
        );
        self.backend.upsert(index, vectors).await
    }

    /// Queries an index for the `top_k` nearest vectors.
    pub async fn query(
        &self,
        index: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> VectorResult<Vec<VectorMatch>> {
        tracing::debug!(
            target: TRACING_TARGET,
            index = %index,
            top_k = %top_k,
            "Querying index"
        );
        self.backend.query(index, vector, top_k).await
    }
}

impl std::fmt::Debug for VectorIndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndexManager")
            .field("backend", &self.config.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manager_round_trip_over_memory_backend() {
        let manager = VectorIndexManager::new(VectorIndexConfig::Memory).unwrap();
        manager.ensure_index("docs", 3).await.unwrap();

        let record = VectorRecord::new("a", vec![1.0, 0.0, 0.0])
            .with_field("text", serde_json::json!("hello"));
        manager.upsert("docs", vec![record]).await.unwrap();

        let matches = manager.query("docs", vec![1.0, 0.0, 0.0], 5).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "a");
        assert_eq!(matches[0].text(), Some("hello"));
    }
}
