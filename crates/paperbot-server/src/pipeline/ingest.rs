//! Batch ingestion orchestrator.
//!
//! Coordinates extractor, chunker, embedding client and vector index for a
//! batch of document ids. Failure isolation is per document: one document's
//! error never aborts its siblings, and the batch result preserves input
//! order.

use paperbot_extract::ExtractorRegistry;
use paperbot_opendal::StorageBackend;
use paperbot_postgres::model::StoredFile;
use paperbot_rig::{Chunker, EmbeddingProvider};
use paperbot_vector::{VectorIndexManager, VectorRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TRACING_TARGET;
use super::error::{PipelineError, PipelineResult};
use super::stage::DocumentIngest;
use super::store::MetadataStore;

/// Terminal status of one document in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    /// All chunks embedded and upserted; the processed flag is set.
    Processed,
    /// The pipeline aborted for this document.
    Error,
}

/// Per-document outcome reported back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    /// Document id.
    pub file_id: Uuid,
    /// Terminal status.
    pub status: IngestStatus,
    /// Failure message for `Error` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IngestOutcome {
    fn processed(file_id: Uuid) -> Self {
        Self {
            file_id,
            status: IngestStatus::Processed,
            message: None,
        }
    }

    fn error(file_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            file_id,
            status: IngestStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// Ingestion orchestrator over constructor-injected collaborators.
pub struct IngestPipeline<'a, S: MetadataStore> {
    store: &'a S,
    storage: &'a StorageBackend,
    extractors: &'a ExtractorRegistry,
    embeddings: &'a EmbeddingProvider,
    vectors: &'a VectorIndexManager,
    chunker: Chunker,
}

impl<'a, S: MetadataStore> IngestPipeline<'a, S> {
    /// Creates a new ingestion pipeline.
    pub fn new(
        store: &'a S,
        storage: &'a StorageBackend,
        extractors: &'a ExtractorRegistry,
        embeddings: &'a EmbeddingProvider,
        vectors: &'a VectorIndexManager,
        chunker: Chunker,
    ) -> Self {
        Self {
            store,
            storage,
            extractors,
            embeddings,
            vectors,
            chunker,
        }
    }

    /// Processes a batch of document ids.
    ///
    /// Documents are processed one after another; the returned outcomes are
    /// in input order and every id has reached a terminal state when this
    /// returns. No automatic retries: failed ids must be resubmitted by the
    /// caller.
    pub async fn run_batch(&self, ids: &[Uuid]) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::with_capacity(ids.len());
        for &id in ids {
            outcomes.push(self.run_one(id).await);
        }
        outcomes
    }

    /// Processes a single document to a terminal state.
    async fn run_one(&self, id: Uuid) -> IngestOutcome {
        let mut ingest = DocumentIngest::new(id);

        // Entry guards: the record must exist and be unprocessed.
        let file = match self.store.find(id).await {
            Ok(Some(file)) => file,
            Ok(None) => {
                ingest.fail(PipelineError::NotFound.to_string());
                return IngestOutcome::error(id, PipelineError::NotFound.to_string());
            }
            Err(err) => {
                ingest.fail(err.to_string());
                return IngestOutcome::error(id, err.to_string());
            }
        };

        if file.is_processed {
            ingest.fail(PipelineError::AlreadyProcessed.to_string());
            return IngestOutcome::error(id, PipelineError::AlreadyProcessed.to_string());
        }

        match self.process_document(&mut ingest, &file).await {
            Ok(()) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    file_id = %id,
                    file_name = %file.display_name,
                    "Document processed"
                );
                IngestOutcome::processed(id)
            }
            Err(err) => {
                ingest.fail(err.to_string());
                tracing::error!(
                    target: TRACING_TARGET,
                    file_id = %id,
                    file_name = %file.display_name,
                    stage = ingest.stage().as_str(),
                    error = %err,
                    "Document ingestion failed"
                );
                IngestOutcome::error(id, err.to_string())
            }
        }
    }

    /// Runs extract -> chunk -> embed -> upsert for one document.
    async fn process_document(
        &self,
        ingest: &mut DocumentIngest,
        file: &StoredFile,
    ) -> PipelineResult<()> {
        ingest.advance(); // Extracting
        let blob = self.storage.read(&file.storage_path).await?;
        let text = self.extractors.extract(&blob, &file.mime_type).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            file_id = %file.id,
            chars = text.len(),
            "Extracted document text"
        );

        ingest.advance(); // Chunking
        let chunks = self.chunker.split_owned(&text);

        ingest.advance(); // Embedding
        // Chunk i+1 is embedded only after chunk i's call returns.
        let mut records = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let embedding = self.embeddings.embed_text(&chunk.text).await?;
            let values: Vec<f32> = embedding.vec.iter().map(|&x| x as f32).collect();

            records.push(
                VectorRecord::new(
                    format!("{}_chunk_{}", file.id, chunk.metadata.chunk_index),
                    values,
                )
                .with_field("text", serde_json::json!(chunk.text))
                .with_field("chunk", serde_json::json!(chunk.metadata.chunk_index)),
            );
        }

        ingest.advance(); // Upserting
        self.vectors
            .ensure_index(&file.vector_index, self.embeddings.dimensions())
            .await?;
        self.vectors.upsert(&file.vector_index, records).await?;

        self.store.mark_processed(file.id).await?;
        ingest.advance(); // Processed

        Ok(())
    }
}
