//! Retrieval and answer orchestrator.

use paperbot_postgres::model::StoredFile;
use paperbot_rig::{CompletionProvider, EmbeddingProvider};
use paperbot_vector::VectorIndexManager;
use uuid::Uuid;

use super::TRACING_TARGET;
use super::error::{PipelineError, PipelineResult};
use super::store::MetadataStore;

/// Fixed instruction preamble for the completion prompt.
const PROMPT_PREAMBLE: &str = "Answer the question based on the context below:\n\n";

/// Separator between chunk texts inside one document's context block.
const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Retrieval orchestrator over constructor-injected collaborators.
pub struct AnswerPipeline<'a, S: MetadataStore> {
    store: &'a S,
    embeddings: &'a EmbeddingProvider,
    completions: &'a CompletionProvider,
    vectors: &'a VectorIndexManager,
    top_k: usize,
}

impl<'a, S: MetadataStore> AnswerPipeline<'a, S> {
    /// Creates a new answer pipeline with the given top-k retrieval depth.
    pub fn new(
        store: &'a S,
        embeddings: &'a EmbeddingProvider,
        completions: &'a CompletionProvider,
        vectors: &'a VectorIndexManager,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            embeddings,
            completions,
            vectors,
            top_k,
        }
    }

    /// Answers a query against the given documents.
    ///
    /// The query is embedded once and each document's index is searched for
    /// the top-k nearest chunks. Per-document query failures are logged and
    /// skipped; the combined context preserves input document order. When no
    /// document yields context the whole request fails with
    /// [`PipelineError::NoContext`].
    pub async fn answer(&self, query: &str, ids: &[Uuid]) -> PipelineResult<String> {
        if query.trim().is_empty() {
            return Err(PipelineError::validation("query must not be empty"));
        }
        if ids.is_empty() {
            return Err(PipelineError::validation("file ids must not be empty"));
        }

        let files = self.resolve_files(ids).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            query_len = query.len(),
            files = files.len(),
            "Answering query"
        );

        let embedding = self.embeddings.embed_text(query).await?;
        let query_vector: Vec<f32> = embedding.vec.iter().map(|&x| x as f32).collect();

        let context = self.collect_context(&files, &query_vector).await;
        if context.is_empty() {
            return Err(PipelineError::NoContext);
        }

        let prompt = format!("{PROMPT_PREAMBLE}{context}\n\nQuestion: {query} \n\nAnswer:");

        tracing::debug!(
            target: TRACING_TARGET,
            prompt_len = prompt.len(),
            "Requesting completion"
        );

        let answer = self.completions.complete(&prompt).await?;
        Ok(answer)
    }

    /// Resolves metadata records, preserving the input id order.
    ///
    /// Unknown ids are dropped; an entirely unresolvable set is rejected.
    async fn resolve_files(&self, ids: &[Uuid]) -> PipelineResult<Vec<StoredFile>> {
        let mut files = self.store.find_many(ids).await?;
        if files.is_empty() {
            return Err(PipelineError::validation("invalid file ids"));
        }

        let mut ordered = Vec::with_capacity(files.len());
        for id in ids {
            if let Some(pos) = files.iter().position(|f| f.id == *id) {
                ordered.push(files.swap_remove(pos));
            }
        }
        Ok(ordered)
    }

    /// Queries each document's index and builds the combined, source-tagged
    /// context in document order.
    async fn collect_context(&self, files: &[StoredFile], query_vector: &[f32]) -> String {
        let mut combined = String::new();

        for file in files {
            let matches = match self
                .vectors
                .query(&file.vector_index, query_vector.to_vec(), self.top_k)
                .await
            {
                Ok(matches) => matches,
                Err(err) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        file_id = %file.id,
                        file_name = %file.display_name,
                        error = %err,
                        "Skipping document after query failure"
                    );
                    continue;
                }
            };

            if matches.is_empty() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    file_id = %file.id,
                    file_name = %file.display_name,
                    "No matches for document"
                );
                continue;
            }

            let contexts = matches
                .iter()
                .filter_map(|m| m.text())
                .collect::<Vec<_>>()
                .join(CHUNK_SEPARATOR);

            combined.push_str(&format!(
                "\n\n### Context from {} ###\n\n{}",
                file.display_name, contexts
            ));

            tracing::debug!(
                target: TRACING_TARGET,
                file_id = %file.id,
                matches = matches.len(),
                "Context added for document"
            );
        }

        combined
    }
}
