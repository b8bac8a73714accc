//! Pinecone backend implementation.
//!
//! Talks to the Pinecone serverless REST API: the control plane for index
//! lifecycle (`/indexes`) and the per-index data plane host (resolved by
//! index name on every call) for upserts and queries.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::PineconeConfig;
use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};
use crate::index::{VectorIndexBackend, VectorMatch, VectorRecord};

/// Pinecone backend implementation.
pub struct PineconeBackend {
    http: reqwest::Client,
    config: PineconeConfig,
}

/// Index description from the control plane listing.
#[derive(Debug, Clone, Deserialize)]
struct IndexMeta {
    name: String,
    host: String,
    dimension: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponseMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryResponseMatch>,
}

impl PineconeBackend {
    /// Creates a new Pinecone backend.
    pub fn new(config: &PineconeConfig) -> VectorResult<Self> {
        if config.api_key.is_empty() {
            return Err(VectorError::invalid_config("pinecone api key is empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorError::connection(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            api_base = %config.api_base,
            region = %config.region,
            "Pinecone backend initialized"
        );

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Lists all indexes known to the control plane.
    ///
    /// A response whose `indexes` field is missing or not an array is an
    /// [`VectorError::IndexListing`] rather than a panic.
    async fn list_indexes(&self) -> VectorResult<Vec<IndexMeta>> {
        let url = format!("{}/indexes", self.config.api_base);
        let response = self
            .http
            .get(&url)
            .header("Api-Key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::backend(format!(
                "list indexes failed with {status}: {body}"
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let entries = body
            .get("indexes")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                VectorError::index_listing("indexes list is not in the expected format")
            })?;

        let indexes = entries
            .iter()
            .filter_map(|entry| serde_json::from_value::<IndexMeta>(entry.clone()).ok())
            .collect();

        Ok(indexes)
    }

    /// Resolves an index's data plane host and dimensionality by name.
    async fn resolve(&self, name: &str) -> VectorResult<IndexMeta> {
        self.list_indexes()
            .await?
            .into_iter()
            .find(|idx| idx.name == name)
            .ok_or_else(|| VectorError::index_not_found(name))
    }

    /// Builds the data plane URL for a resolved index host.
    fn data_plane_url(host: &str, path: &str) -> String {
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}{path}")
        } else {
            format!("https://{host}{path}")
        }
    }
}

#[async_trait]
impl VectorIndexBackend for PineconeBackend {
    async fn ensure_index(&self, name: &str, dimensions: usize) -> VectorResult<()> {
        let existing = self.list_indexes().await?;
        if existing.iter().any(|idx| idx.name == name) {
            tracing::debug!(
                target: TRACING_TARGET,
                index = %name,
                "Index already exists"
            );
            return Ok(());
        }

        let url = format!("{}/indexes", self.config.api_base);
        let body = json!({
            "name": name,
            "dimension": dimensions,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": self.config.cloud,
                    "region": self.config.region,
                }
            },
            "deletion_protection": "disabled",
        });

        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        // CONFLICT means another caller created the index concurrently.
        if !status.is_success() && status != StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::backend(format!(
                "create index '{name}' failed with {status}: {body}"
            )));
        }

        tracing::info!(
            target: TRACING_TARGET,
            index = %name,
            dimensions = %dimensions,
            "Created Pinecone index"
        );

        Ok(())
    }

    async fn delete_index(&self, name: &str) -> VectorResult<()> {
        let url = format!("{}/indexes/{}", self.config.api_base, name);
        let response = self
            .http
            .delete(&url)
            .header("Api-Key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(VectorError::index_not_found(name));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::backend(format!(
                "delete index '{name}' failed with {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn upsert(&self, index: &str, vectors: Vec<VectorRecord>) -> VectorResult<()> {
        if vectors.is_empty() {
            return Ok(());
        }

        let meta = self.resolve(index).await?;

        for vector in &vectors {
            if vector.values.len() != meta.dimension {
                return Err(VectorError::dimension_mismatch(
                    meta.dimension,
                    vector.values.len(),
                ));
            }
        }

        let url = Self::data_plane_url(&meta.host, "/vectors/upsert");
        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .json(&json!({ "vectors": vectors }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::backend(format!(
                "upsert into '{index}' failed with {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> VectorResult<Vec<VectorMatch>> {
        let meta = self.resolve(index).await?;

        if vector.len() != meta.dimension {
            return Err(VectorError::dimension_mismatch(meta.dimension, vector.len()));
        }

        let url = Self::data_plane_url(&meta.host, "/query");
        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .json(&json!({
                "vector": vector,
                "topK": top_k,
                "includeValues": false,
                "includeMetadata": true,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::backend(format!(
                "query of '{index}' failed with {status}: {body}"
            )));
        }

        let body: QueryResponse = response.json().await?;
        let matches = body
            .matches
            .into_iter()
            .map(|m| VectorMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect();

        Ok(matches)
    }
}

impl std::fmt::Debug for PineconeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeBackend")
            .field("api_base", &self.config.api_base)
            .field("region", &self.config.region)
            .finish()
    }
}
