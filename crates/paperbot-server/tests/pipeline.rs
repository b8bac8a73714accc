//! End-to-end pipeline tests over in-memory collaborators.

use std::collections::HashMap;

use paperbot_extract::ExtractorRegistry;
use paperbot_opendal::{StorageBackend, StorageConfig};
use paperbot_postgres::model::StoredFile;
use paperbot_rig::{Chunker, CompletionProvider, EmbeddingProvider};
use paperbot_server::pipeline::{
    AnswerPipeline, IngestPipeline, IngestStatus, MetadataStore, PipelineError, PipelineResult,
};
use paperbot_vector::{VectorIndexConfig, VectorIndexManager};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory metadata store standing in for the document database.
#[derive(Default)]
struct MemoryStore {
    files: Mutex<HashMap<Uuid, StoredFile>>,
}

impl MemoryStore {
    async fn insert(&self, file: StoredFile) {
        self.files.lock().await.insert(file.id, file);
    }

    async fn is_processed(&self, id: Uuid) -> bool {
        self.files
            .lock()
            .await
            .get(&id)
            .map(|f| f.is_processed)
            .unwrap_or(false)
    }
}

impl MetadataStore for MemoryStore {
    async fn find(&self, id: Uuid) -> PipelineResult<Option<StoredFile>> {
        Ok(self.files.lock().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> PipelineResult<Vec<StoredFile>> {
        let files = self.files.lock().await;
        Ok(ids.iter().filter_map(|id| files.get(id).cloned()).collect())
    }

    async fn mark_processed(&self, id: Uuid) -> PipelineResult<()> {
        let mut files = self.files.lock().await;
        match files.get_mut(&id) {
            Some(file) => {
                file.is_processed = true;
                Ok(())
            }
            None => Err(PipelineError::NotFound),
        }
    }
}

/// Everything a pipeline test needs, wired to in-memory backends.
struct Harness {
    store: MemoryStore,
    storage: StorageBackend,
    extractors: ExtractorRegistry,
    embeddings: EmbeddingProvider,
    completions: CompletionProvider,
    vectors: VectorIndexManager,
}

impl Harness {
    fn new() -> Self {
        Self::with_embedding_dimensions(768)
    }

    fn with_embedding_dimensions(dimensions: usize) -> Self {
        Self {
            store: MemoryStore::default(),
            storage: StorageBackend::new(StorageConfig::Memory).expect("storage"),
            extractors: ExtractorRegistry::with_defaults(),
            embeddings: EmbeddingProvider::mock(dimensions),
            completions: CompletionProvider::mock(),
            vectors: VectorIndexManager::new(VectorIndexConfig::Memory).expect("vectors"),
        }
    }

    fn ingest(&self) -> IngestPipeline<'_, MemoryStore> {
        self.ingest_with_chunker(Chunker::default())
    }

    fn ingest_with_chunker(&self, chunker: Chunker) -> IngestPipeline<'_, MemoryStore> {
        IngestPipeline::new(
            &self.store,
            &self.storage,
            &self.extractors,
            &self.embeddings,
            &self.vectors,
            chunker,
        )
    }

    fn answer(&self) -> AnswerPipeline<'_, MemoryStore> {
        AnswerPipeline::new(
            &self.store,
            &self.embeddings,
            &self.completions,
            &self.vectors,
            5,
        )
    }

    /// Simulates an upload: writes the blob, creates the per-document index
    /// and inserts an unprocessed record.
    async fn upload(&self, name: &str, mime_type: &str, content: &[u8]) -> Uuid {
        let id = Uuid::new_v4();
        let storage_path = format!("{name}.bin");

        self.storage.write(&storage_path, content).await.unwrap();
        self.vectors.ensure_index(name, 768).await.unwrap();

        self.store
            .insert(StoredFile {
                id,
                display_name: name.to_string(),
                original_filename: format!("{name}.csv"),
                mime_type: mime_type.to_string(),
                storage_path,
                vector_index: name.to_string(),
                is_processed: false,
                created_at: OffsetDateTime::UNIX_EPOCH,
                updated_at: OffsetDateTime::UNIX_EPOCH,
            })
            .await;

        id
    }
}

#[tokio::test]
async fn batch_isolation_valid_and_missing_ids() {
    let harness = Harness::new();
    let good = harness
        .upload("report", "text/csv", b"Title: Annual Report,2024")
        .await;
    let missing = Uuid::new_v4();

    let outcomes = harness.ingest().run_batch(&[good, missing]).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].file_id, good);
    assert_eq!(outcomes[0].status, IngestStatus::Processed);
    assert_eq!(outcomes[1].file_id, missing);
    assert_eq!(outcomes[1].status, IngestStatus::Error);
    assert!(outcomes[1].message.as_deref().unwrap().contains("not found"));

    assert!(harness.store.is_processed(good).await);
}

#[tokio::test]
async fn reprocessing_is_rejected_without_touching_the_index() {
    let harness = Harness::new();
    let id = harness
        .upload("notes", "text/csv", b"alpha,beta\ngamma,delta")
        .await;

    let first = harness.ingest().run_batch(&[id]).await;
    assert_eq!(first[0].status, IngestStatus::Processed);

    let query = harness.embeddings.embed_text("alpha").await.unwrap();
    let query_vector: Vec<f32> = query.vec.iter().map(|&x| x as f32).collect();
    let before = harness
        .vectors
        .query("notes", query_vector.clone(), 100)
        .await
        .unwrap();

    // Second submission reports the error and leaves the index untouched.
    for _ in 0..2 {
        let again = harness.ingest().run_batch(&[id]).await;
        assert_eq!(again[0].status, IngestStatus::Error);
        assert!(
            again[0]
                .message
                .as_deref()
                .unwrap()
                .contains("already processed")
        );
    }

    let after = harness.vectors.query("notes", query_vector, 100).await.unwrap();
    assert_eq!(before.len(), after.len());
}

#[tokio::test]
async fn long_documents_are_chunked_into_multiple_vectors() {
    let harness = Harness::new();
    let content = "one,two,three\nfour,five,six\nseven,eight,nine".repeat(20);
    let id = harness.upload("big", "text/csv", content.as_bytes()).await;

    let outcomes = harness
        .ingest_with_chunker(Chunker::new(64))
        .run_batch(&[id])
        .await;
    assert_eq!(outcomes[0].status, IngestStatus::Processed);

    let query = harness.embeddings.embed_text("five").await.unwrap();
    let query_vector: Vec<f32> = query.vec.iter().map(|&x| x as f32).collect();
    let matches = harness.vectors.query("big", query_vector, 1000).await.unwrap();

    // Flattened text is shorter than the raw CSV but still far over one chunk.
    assert!(matches.len() > 1);
    for m in &matches {
        assert!(m.id.starts_with(&format!("{id}_chunk_")));
    }
}

#[tokio::test]
async fn round_trip_prompt_contains_document_text() {
    let harness = Harness::new();
    let id = harness
        .upload("annual", "text/csv", b"Title: Annual Report\nRevenue,42")
        .await;

    let outcomes = harness.ingest().run_batch(&[id]).await;
    assert_eq!(outcomes[0].status, IngestStatus::Processed);

    // The mock completion provider echoes the prompt, making the assembled
    // context observable.
    let answer = harness
        .answer()
        .answer("What is the title?", &[id])
        .await
        .unwrap();

    assert!(answer.starts_with("Answer the question based on the context below:"));
    assert!(answer.contains("### Context from annual ###"));
    assert!(answer.contains("Title: Annual Report"));
    assert!(answer.contains("Question: What is the title?"));
    assert!(answer.ends_with("Answer:"));
}

#[tokio::test]
async fn combined_context_preserves_input_document_order() {
    let harness = Harness::new();
    let x = harness
        .upload("x-doc", "text/csv", b"cats,are,mammals")
        .await;
    let y = harness
        .upload("y-doc", "text/csv", b"dogs,are,mammals")
        .await;

    let outcomes = harness.ingest().run_batch(&[x, y]).await;
    assert!(outcomes.iter().all(|o| o.status == IngestStatus::Processed));

    let answer = harness
        .answer()
        .answer("which mammals?", &[x, y])
        .await
        .unwrap();

    let x_pos = answer.find("### Context from x-doc ###").unwrap();
    let y_pos = answer.find("### Context from y-doc ###").unwrap();
    assert!(x_pos < y_pos);

    // Reversed input order reverses the blocks.
    let answer = harness
        .answer()
        .answer("which mammals?", &[y, x])
        .await
        .unwrap();

    let x_pos = answer.find("### Context from x-doc ###").unwrap();
    let y_pos = answer.find("### Context from y-doc ###").unwrap();
    assert!(y_pos < x_pos);
}

#[tokio::test]
async fn empty_context_is_rejected_not_answered() {
    let harness = Harness::new();
    // Uploaded but never ingested: the index exists and is empty.
    let id = harness.upload("empty", "text/csv", b"data,here").await;

    let result = harness.answer().answer("anything?", &[id]).await;

    match result {
        Err(PipelineError::NoContext) => {}
        other => panic!("expected NoContext, got {other:?}"),
    }
    assert_eq!(
        PipelineError::NoContext.to_string(),
        "No relevant context found in the provided files."
    );
}

#[tokio::test]
async fn query_failures_skip_documents_instead_of_aborting() {
    let harness = Harness::new();
    let good = harness
        .upload("good", "text/csv", b"useful,content,here")
        .await;

    // A record whose index was never created: its query fails and is skipped.
    let broken = Uuid::new_v4();
    harness
        .store
        .insert(StoredFile {
            id: broken,
            display_name: "broken".to_string(),
            original_filename: "broken.csv".to_string(),
            mime_type: "text/csv".to_string(),
            storage_path: "broken.bin".to_string(),
            vector_index: "no-such-index".to_string(),
            is_processed: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
        .await;

    let outcomes = harness.ingest().run_batch(&[good]).await;
    assert_eq!(outcomes[0].status, IngestStatus::Processed);

    let answer = harness
        .answer()
        .answer("what content?", &[broken, good])
        .await
        .unwrap();

    assert!(answer.contains("### Context from good ###"));
    assert!(!answer.contains("### Context from broken ###"));
}

#[tokio::test]
async fn dimension_mismatch_fails_the_chunk_upsert() {
    // 512-dimension embeddings against indexes created at 768.
    let harness = Harness::with_embedding_dimensions(512);
    let id = harness
        .upload("narrow", "text/csv", b"some,content")
        .await;

    let outcomes = harness.ingest().run_batch(&[id]).await;

    assert_eq!(outcomes[0].status, IngestStatus::Error);
    let message = outcomes[0].message.as_deref().unwrap();
    assert!(message.contains("dimension mismatch"), "got: {message}");
    assert!(message.contains("768"));
    assert!(message.contains("512"));
    assert!(!harness.store.is_processed(id).await);
}

#[tokio::test]
async fn unsupported_content_type_fails_that_document() {
    let harness = Harness::new();
    let id = harness.upload("movie", "video/mp4", b"not text").await;

    let outcomes = harness.ingest().run_batch(&[id]).await;

    assert_eq!(outcomes[0].status, IngestStatus::Error);
    assert!(
        outcomes[0]
            .message
            .as_deref()
            .unwrap()
            .contains("unsupported content type")
    );
    assert!(!harness.store.is_processed(id).await);
}

#[tokio::test]
async fn empty_extracted_text_fails_that_document() {
    let harness = Harness::new();
    let id = harness.upload("blank", "text/csv", b"").await;

    let outcomes = harness.ingest().run_batch(&[id]).await;

    assert_eq!(outcomes[0].status, IngestStatus::Error);
    assert!(
        outcomes[0]
            .message
            .as_deref()
            .unwrap()
            .contains("empty or invalid")
    );
}

#[tokio::test]
async fn unresolvable_id_set_is_rejected() {
    let harness = Harness::new();
    let result = harness
        .answer()
        .answer("anything?", &[Uuid::new_v4()])
        .await;

    assert!(matches!(result, Err(PipelineError::Validation(_))));
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let harness = Harness::new();
    let id = harness.upload("doc", "text/csv", b"a,b").await;

    let result = harness.answer().answer("   ", &[id]).await;
    assert!(matches!(result, Err(PipelineError::Validation(_))));
}
