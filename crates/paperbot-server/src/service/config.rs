//! Service configuration types.

use paperbot_opendal::StorageConfig;
use paperbot_postgres::PgConfig;
use paperbot_rig::{CompletionModel, Credentials, EmbeddingModel};
use paperbot_vector::VectorIndexConfig;
use serde::{Deserialize, Serialize};

/// AI provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Credentials shared by the embedding and completion providers.
    pub credentials: Credentials,
    /// Embedding model.
    pub embedding_model: EmbeddingModel,
    /// Completion model.
    pub completion_model: CompletionModel,
}

impl AiConfig {
    /// Gemini configuration with the default models.
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::Gemini(paperbot_rig::provider::ApiKeyCredentials::new(
                api_key,
            )),
            embedding_model: EmbeddingModel::default_gemini(),
            completion_model: CompletionModel::default_gemini(),
        }
    }
}

/// Tunable pipeline constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum chunk size in bytes, safely below the embedding service's
    /// input ceiling.
    pub chunk_max_bytes: usize,
    /// Number of nearest chunks fetched per document during retrieval.
    pub retrieval_top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_max_bytes: paperbot_rig::DEFAULT_CHUNK_MAX_BYTES,
            retrieval_top_k: 5,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Document metadata database.
    pub postgres: PgConfig,
    /// Object storage for uploaded blobs.
    pub storage: StorageConfig,
    /// Vector index service.
    pub vector: VectorIndexConfig,
    /// Embedding and completion providers.
    pub ai: AiConfig,
    /// Pipeline constants.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}
