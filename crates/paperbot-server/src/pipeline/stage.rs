//! Per-document ingestion state machine.

use uuid::Uuid;

/// Stages a document moves through during ingestion.
///
/// Progression is linear: `Pending -> Extracting -> Chunking -> Embedding ->
/// Upserting -> Processed`. `Failed` is terminal and reachable from any
/// stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    /// Entry guards not yet evaluated.
    Pending,
    /// Fetching the blob and extracting its text.
    Extracting,
    /// Splitting extracted text into bounded segments.
    Chunking,
    /// Generating per-chunk embeddings.
    Embedding,
    /// Upserting chunk vectors into the document's index.
    Upserting,
    /// All chunks stored; the processed flag has been set.
    Processed,
    /// The pipeline aborted for this document.
    Failed,
}

impl IngestStage {
    /// Returns the next stage in the linear progression, or `None` for
    /// terminal stages.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Extracting),
            Self::Extracting => Some(Self::Chunking),
            Self::Chunking => Some(Self::Embedding),
            Self::Embedding => Some(Self::Upserting),
            Self::Upserting => Some(Self::Processed),
            Self::Processed | Self::Failed => None,
        }
    }

    /// Returns whether the stage is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Processed | Self::Failed)
    }

    /// Returns the stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Extracting => "extracting",
            Self::Chunking => "chunking",
            Self::Embedding => "embedding",
            Self::Upserting => "upserting",
            Self::Processed => "processed",
            Self::Failed => "failed",
        }
    }
}

/// Tracks one document's progress through the ingestion pipeline.
#[derive(Debug)]
pub struct DocumentIngest {
    file_id: Uuid,
    stage: IngestStage,
    failure: Option<String>,
}

impl DocumentIngest {
    /// Starts tracking a document in the `Pending` stage.
    pub fn new(file_id: Uuid) -> Self {
        Self {
            file_id,
            stage: IngestStage::Pending,
            failure: None,
        }
    }

    /// Returns the document id.
    pub fn file_id(&self) -> Uuid {
        self.file_id
    }

    /// Returns the current stage.
    pub fn stage(&self) -> IngestStage {
        self.stage
    }

    /// Returns the failure reason, if the document failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Advances to the next stage.
    ///
    /// Has no effect once a terminal stage is reached.
    pub fn advance(&mut self) -> IngestStage {
        if let Some(next) = self.stage.next() {
            self.stage = next;
        }
        self.stage
    }

    /// Moves to the terminal `Failed` stage, recording the reason.
    ///
    /// Has no effect if the document already reached `Processed`.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.stage != IngestStage::Processed {
            self.stage = IngestStage::Failed;
            self.failure = Some(reason.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_progress_linearly_to_processed() {
        let mut ingest = DocumentIngest::new(Uuid::new_v4());
        assert_eq!(ingest.stage(), IngestStage::Pending);

        let expected = [
            IngestStage::Extracting,
            IngestStage::Chunking,
            IngestStage::Embedding,
            IngestStage::Upserting,
            IngestStage::Processed,
        ];
        for stage in expected {
            assert_eq!(ingest.advance(), stage);
        }
        assert!(ingest.stage().is_terminal());
    }

    #[test]
    fn advance_is_a_noop_after_terminal() {
        let mut ingest = DocumentIngest::new(Uuid::new_v4());
        for _ in 0..10 {
            ingest.advance();
        }
        assert_eq!(ingest.stage(), IngestStage::Processed);
    }

    #[test]
    fn failure_is_reachable_from_any_stage() {
        for advances in 0..5 {
            let mut ingest = DocumentIngest::new(Uuid::new_v4());
            for _ in 0..advances {
                ingest.advance();
            }
            ingest.fail("boom");
            assert_eq!(ingest.stage(), IngestStage::Failed);
            assert_eq!(ingest.failure(), Some("boom"));
        }
    }

    #[test]
    fn processed_documents_cannot_fail() {
        let mut ingest = DocumentIngest::new(Uuid::new_v4());
        for _ in 0..5 {
            ingest.advance();
        }
        ingest.fail("late failure");
        assert_eq!(ingest.stage(), IngestStage::Processed);
        assert!(ingest.failure().is_none());
    }
}
