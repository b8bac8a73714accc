//! External service configuration (database, storage, vector index, AI).

use clap::{Args, ValueEnum};
use paperbot_opendal::{FsConfig, S3Config, StorageConfig};
use paperbot_postgres::PgConfig;
use paperbot_rig::provider::ApiKeyCredentials;
use paperbot_rig::{
    CompletionModel, Credentials, EmbeddingModel, OpenAiCompletionModel, OpenAiEmbeddingModel,
};
use paperbot_server::service::{AiConfig, PipelineConfig, ServiceConfig};
use paperbot_vector::{PineconeConfig, VectorIndexConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Object storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackendKind {
    /// Amazon S3 compatible storage.
    S3,
    /// Local filesystem.
    Fs,
    /// In-memory storage (local development only).
    Memory,
}

/// Vector index backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorBackendKind {
    /// Pinecone serverless.
    Pinecone,
    /// In-memory index (local development only).
    Memory,
}

/// AI provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiProviderKind {
    /// Google Gemini.
    Gemini,
    /// OpenAI.
    OpenAi,
}

/// External service configuration.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ServiceCliConfig {
    /// PostgreSQL connection URL.
    #[arg(long, env = "POSTGRES_URL")]
    pub postgres_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "POSTGRES_MAX_CONNECTIONS", default_value_t = 16)]
    pub postgres_max_connections: u32,

    /// Object storage backend.
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value_t = StorageBackendKind::S3)]
    pub storage_backend: StorageBackendKind,

    /// S3 bucket for uploaded blobs.
    #[arg(long, env = "S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// AWS region for the S3 bucket.
    #[arg(long, env = "AWS_REGION")]
    pub s3_region: Option<String>,

    /// Custom S3 endpoint (for S3-compatible services).
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS access key id.
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub aws_secret_access_key: Option<String>,

    /// Root directory for the filesystem storage backend.
    #[arg(long, env = "FS_ROOT", default_value = "./data")]
    pub fs_root: String,

    /// Vector index backend.
    #[arg(long, env = "VECTOR_BACKEND", value_enum, default_value_t = VectorBackendKind::Pinecone)]
    pub vector_backend: VectorBackendKind,

    /// Pinecone API key.
    #[arg(long, env = "PINECONE_API_KEY")]
    pub pinecone_api_key: Option<String>,

    /// Serverless cloud for created Pinecone indexes.
    #[arg(long, env = "PINECONE_CLOUD", default_value = "aws")]
    pub pinecone_cloud: String,

    /// Serverless region for created Pinecone indexes.
    #[arg(long, env = "PINECONE_REGION", default_value = "us-east-1")]
    pub pinecone_region: String,

    /// AI provider for embeddings and completions.
    #[arg(long, env = "AI_PROVIDER", value_enum, default_value_t = AiProviderKind::Gemini)]
    pub ai_provider: AiProviderKind,

    /// Google Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// Maximum chunk size in bytes.
    #[arg(long, env = "CHUNK_MAX_BYTES", default_value_t = paperbot_rig::DEFAULT_CHUNK_MAX_BYTES)]
    pub chunk_max_bytes: usize,

    /// Number of nearest chunks fetched per document during retrieval.
    #[arg(long, env = "RETRIEVAL_TOP_K", default_value_t = 5)]
    pub retrieval_top_k: usize,
}

impl ServiceCliConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage_backend == StorageBackendKind::S3 && self.s3_bucket.is_none() {
            anyhow::bail!("--s3-bucket is required with the s3 storage backend");
        }

        if self.vector_backend == VectorBackendKind::Pinecone
            && self.pinecone_api_key.as_deref().unwrap_or("").is_empty()
        {
            anyhow::bail!("--pinecone-api-key is required with the pinecone vector backend");
        }

        match self.ai_provider {
            AiProviderKind::Gemini if self.gemini_api_key.is_none() => {
                anyhow::bail!("--gemini-api-key is required with the gemini provider");
            }
            AiProviderKind::OpenAi if self.openai_api_key.is_none() => {
                anyhow::bail!("--openai-api-key is required with the openai provider");
            }
            _ => Ok(()),
        }
    }

    /// Builds the service configuration.
    pub fn to_service_config(&self) -> anyhow::Result<ServiceConfig> {
        Ok(ServiceConfig {
            postgres: self.postgres_config(),
            storage: self.storage_config()?,
            vector: self.vector_config()?,
            ai: self.ai_config()?,
            pipeline: PipelineConfig {
                chunk_max_bytes: self.chunk_max_bytes,
                retrieval_top_k: self.retrieval_top_k,
            },
        })
    }

    /// Logs the configuration (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            storage_backend = ?self.storage_backend,
            vector_backend = ?self.vector_backend,
            ai_provider = ?self.ai_provider,
            postgres_max_connections = self.postgres_max_connections,
            chunk_max_bytes = self.chunk_max_bytes,
            retrieval_top_k = self.retrieval_top_k,
            "service configuration"
        );
    }

    fn postgres_config(&self) -> PgConfig {
        PgConfig {
            postgres_url: self.postgres_url.clone(),
            postgres_max_connections: self.postgres_max_connections,
            ..PgConfig::default()
        }
    }

    fn storage_config(&self) -> anyhow::Result<StorageConfig> {
        Ok(match self.storage_backend {
            StorageBackendKind::S3 => StorageConfig::S3(S3Config {
                bucket: self
                    .s3_bucket
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("missing s3 bucket"))?,
                region: self.s3_region.clone(),
                endpoint: self.s3_endpoint.clone(),
                access_key_id: self.aws_access_key_id.clone(),
                secret_access_key: self.aws_secret_access_key.clone(),
            }),
            StorageBackendKind::Fs => StorageConfig::Fs(FsConfig {
                root: self.fs_root.clone(),
            }),
            StorageBackendKind::Memory => StorageConfig::Memory,
        })
    }

    fn vector_config(&self) -> anyhow::Result<VectorIndexConfig> {
        Ok(match self.vector_backend {
            VectorBackendKind::Pinecone => {
                let api_key = self
                    .pinecone_api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("missing pinecone api key"))?;
                let mut config = PineconeConfig::new(api_key);
                config.cloud = self.pinecone_cloud.clone();
                config.region = self.pinecone_region.clone();
                VectorIndexConfig::Pinecone(config)
            }
            VectorBackendKind::Memory => VectorIndexConfig::Memory,
        })
    }

    fn ai_config(&self) -> anyhow::Result<AiConfig> {
        Ok(match self.ai_provider {
            AiProviderKind::Gemini => {
                let api_key = self
                    .gemini_api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("missing gemini api key"))?;
                AiConfig::gemini(api_key)
            }
            AiProviderKind::OpenAi => {
                let api_key = self
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("missing openai api key"))?;
                AiConfig {
                    credentials: Credentials::OpenAi(ApiKeyCredentials::new(api_key)),
                    embedding_model: EmbeddingModel::OpenAi(
                        OpenAiEmbeddingModel::TextEmbedding3Small,
                    ),
                    completion_model: CompletionModel::OpenAi(OpenAiCompletionModel::Gpt4oMini),
                }
            }
        })
    }
}
