//! In-memory backend implementation.
//!
//! Brute-force cosine similarity over an in-process map. Used by the test
//! suites and for local development without a remote index service.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{VectorError, VectorResult};
use crate::index::{VectorIndexBackend, VectorMatch, VectorRecord};

struct MemoryIndex {
    dimensions: usize,
    records: HashMap<String, VectorRecord>,
}

/// In-memory vector index backend.
#[derive(Default)]
pub struct MemoryBackend {
    indexes: RwLock<HashMap<String, MemoryIndex>>,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl VectorIndexBackend for MemoryBackend {
    async fn ensure_index(&self, name: &str, dimensions: usize) -> VectorResult<()> {
        let mut indexes = self.indexes.write().await;
        indexes.entry(name.to_string()).or_insert_with(|| MemoryIndex {
            dimensions,
            records: HashMap::new(),
        });
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> VectorResult<()> {
        let mut indexes = self.indexes.write().await;
        indexes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| VectorError::index_not_found(name))
    }

    async fn upsert(&self, index: &str, vectors: Vec<VectorRecord>) -> VectorResult<()> {
        let mut indexes = self.indexes.write().await;
        let entry = indexes
            .get_mut(index)
            .ok_or_else(|| VectorError::index_not_found(index))?;

        for vector in &vectors {
            if vector.values.len() != entry.dimensions {
                return Err(VectorError::dimension_mismatch(
                    entry.dimensions,
                    vector.values.len(),
                ));
            }
        }

        for vector in vectors {
            entry.records.insert(vector.id.clone(), vector);
        }

        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> VectorResult<Vec<VectorMatch>> {
        let indexes = self.indexes.read().await;
        let entry = indexes
            .get(index)
            .ok_or_else(|| VectorError::index_not_found(index))?;

        if vector.len() != entry.dimensions {
            return Err(VectorError::dimension_mismatch(
                entry.dimensions,
                vector.len(),
            ));
        }

        let mut matches: Vec<VectorMatch> = entry
            .records
            .values()
            .map(|record| VectorMatch {
                id: record.id.clone(),
                score: cosine_similarity(&vector, &record.values),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);

        Ok(matches)
    }
}

/// Cosine similarity of two equal-length vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, values: Vec<f32>, text: &str) -> VectorRecord {
        VectorRecord::new(id, values).with_field("text", serde_json::json!(text))
    }

    #[tokio::test]
    async fn ensure_index_is_idempotent() {
        let backend = MemoryBackend::new();
        backend.ensure_index("idx", 3).await.unwrap();
        backend
            .upsert("idx", vec![record("a", vec![1.0, 0.0, 0.0], "a")])
            .await
            .unwrap();

        // Re-ensuring must not wipe existing records.
        backend.ensure_index("idx", 3).await.unwrap();
        let matches = backend.query("idx", vec![1.0, 0.0, 0.0], 5).await.unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn upsert_into_missing_index_fails() {
        let backend = MemoryBackend::new();
        let result = backend
            .upsert("missing", vec![record("a", vec![1.0], "a")])
            .await;
        assert!(matches!(result, Err(VectorError::IndexNotFound(_))));
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let backend = MemoryBackend::new();
        backend.ensure_index("idx", 768).await.unwrap();

        let result = backend
            .upsert("idx", vec![record("a", vec![0.5; 512], "a")])
            .await;
        assert!(matches!(
            result,
            Err(VectorError::DimensionMismatch {
                expected: 768,
                actual: 512
            })
        ));
    }

    #[tokio::test]
    async fn query_orders_by_descending_similarity() {
        let backend = MemoryBackend::new();
        backend.ensure_index("idx", 2).await.unwrap();
        backend
            .upsert(
                "idx",
                vec![
                    record("far", vec![0.0, 1.0], "far"),
                    record("near", vec![1.0, 0.1], "near"),
                    record("exact", vec![1.0, 0.0], "exact"),
                ],
            )
            .await
            .unwrap();

        let matches = backend.query("idx", vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "exact");
        assert_eq!(matches[1].id, "near");
        assert!(matches[0].score >= matches[1].score);
    }

    #[tokio::test]
    async fn upsert_overwrites_by_id() {
        let backend = MemoryBackend::new();
        backend.ensure_index("idx", 2).await.unwrap();
        backend
            .upsert("idx", vec![record("a", vec![1.0, 0.0], "old")])
            .await
            .unwrap();
        backend
            .upsert("idx", vec![record("a", vec![1.0, 0.0], "new")])
            .await
            .unwrap();

        let matches = backend.query("idx", vec![1.0, 0.0], 5).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text(), Some("new"));
    }

    #[tokio::test]
    async fn delete_index_removes_it() {
        let backend = MemoryBackend::new();
        backend.ensure_index("idx", 2).await.unwrap();
        backend.delete_index("idx").await.unwrap();

        let result = backend.query("idx", vec![1.0, 0.0], 5).await;
        assert!(matches!(result, Err(VectorError::IndexNotFound(_))));
    }
}
