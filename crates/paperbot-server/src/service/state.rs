//! Application state and dependency injection.

use std::sync::Arc;

use paperbot_core::IntoProvider;
use paperbot_extract::ExtractorRegistry;
use paperbot_opendal::StorageBackend;
use paperbot_postgres::PgClient;
use paperbot_rig::{CompletionProvider, EmbeddingProvider};
use paperbot_vector::VectorIndexManager;

use crate::service::{PipelineConfig, ServiceConfig};
use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). All external
/// collaborators are constructor-injected so handlers and pipelines can be
/// exercised with in-memory substitutes.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    storage: StorageBackend,
    vectors: Arc<VectorIndexManager>,
    embeddings: EmbeddingProvider,
    completions: CompletionProvider,
    extractors: Arc<ExtractorRegistry>,
    pipeline_config: PipelineConfig,
    http_client: reqwest::Client,
}

impl ServiceState {
    /// Creates application state from pre-built collaborators.
    pub fn new(
        pg_client: PgClient,
        storage: StorageBackend,
        vectors: VectorIndexManager,
        embeddings: EmbeddingProvider,
        completions: CompletionProvider,
        pipeline_config: PipelineConfig,
    ) -> Self {
        Self {
            pg_client,
            storage,
            vectors: Arc::new(vectors),
            embeddings,
            completions,
            extractors: Arc::new(ExtractorRegistry::with_defaults()),
            pipeline_config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Connects to all external services and loads required resources.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let pg_client = PgClient::new(config.postgres.clone())
            .map_err(|e| Error::external("postgres", e.to_string()).with_source(e))?;

        let storage = StorageBackend::new(config.storage.clone())
            .map_err(|e| Error::external("storage", e.to_string()).with_source(e))?;

        let vectors = VectorIndexManager::new(config.vector.clone())
            .map_err(|e| Error::external("vector index", e.to_string()).with_source(e))?;

        let embeddings = EmbeddingProvider::create(
            config.ai.embedding_model.clone(),
            config.ai.credentials.clone(),
        )
        .await
        .map_err(|e| Error::external("embedding provider", e.to_string()).with_source(e))?;

        let completions = CompletionProvider::create(
            config.ai.completion_model.clone(),
            config.ai.credentials.clone(),
        )
        .await
        .map_err(|e| Error::external("completion provider", e.to_string()).with_source(e))?;

        Ok(Self::new(
            pg_client,
            storage,
            vectors,
            embeddings,
            completions,
            config.pipeline.clone(),
        ))
    }

    /// Returns the database client.
    pub fn pg_client(&self) -> &PgClient {
        &self.pg_client
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &StorageBackend {
        &self.storage
    }

    /// Returns the vector index manager.
    pub fn vectors(&self) -> &VectorIndexManager {
        &self.vectors
    }

    /// Returns the embedding provider.
    pub fn embeddings(&self) -> &EmbeddingProvider {
        &self.embeddings
    }

    /// Returns the completion provider.
    pub fn completions(&self) -> &CompletionProvider {
        &self.completions
    }

    /// Returns the HTTP client used for remote-link uploads.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Returns the extractor registry.
    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    /// Returns the pipeline constants.
    pub fn pipeline_config(&self) -> &PipelineConfig {
        &self.pipeline_config
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(storage: StorageBackend);
impl_di!(vectors: Arc<VectorIndexManager>);
impl_di!(embeddings: EmbeddingProvider);
impl_di!(completions: CompletionProvider);
impl_di!(extractors: Arc<ExtractorRegistry>);
impl_di!(pipeline_config: PipelineConfig);
impl_di!(http_client: reqwest::Client);
