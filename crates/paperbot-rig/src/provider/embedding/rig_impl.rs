//! rig-core trait implementations for EmbeddingProvider.

use rig::embeddings::{Embedding, EmbeddingError, EmbeddingModel as RigEmbeddingModel};

use super::provider::{DEFAULT_MAX_DOCUMENTS, EmbeddingProvider, EmbeddingService};

impl RigEmbeddingModel for EmbeddingProvider {
    type Client = ();

    const MAX_DOCUMENTS: usize = DEFAULT_MAX_DOCUMENTS;

    fn make(_client: &Self::Client, _model: impl Into<String>, _dims: Option<usize>) -> Self {
        // EmbeddingProvider is constructed via IntoProvider::create.
        panic!("EmbeddingProvider should be constructed via IntoProvider::create()")
    }

    fn ndims(&self) -> usize {
        match self.inner() {
            EmbeddingService::OpenAi { model, .. } => model.ndims(),
            EmbeddingService::Gemini { model, .. } => model.ndims(),
            #[cfg(feature = "mock")]
            EmbeddingService::Mock { dimensions } => *dimensions,
        }
    }

    async fn embed_texts(
        &self,
        texts: impl IntoIterator<Item = String> + Send,
    ) -> std::result::Result<Vec<Embedding>, EmbeddingError> {
        match self.inner() {
            EmbeddingService::OpenAi { model, .. } => model.embed_texts(texts).await,
            EmbeddingService::Gemini { model, .. } => model.embed_texts(texts).await,
            #[cfg(feature = "mock")]
            EmbeddingService::Mock { dimensions } => Ok(texts
                .into_iter()
                .map(|text| mock::embed(&text, *dimensions))
                .collect()),
        }
    }
}

#[cfg(feature = "mock")]
mod mock {
    use rig::embeddings::Embedding;
    use sha2::{Digest, Sha256};

    /// Produces a deterministic pseudo-embedding for a text.
    ///
    /// Each component is derived from a hash of the text and the component
    /// index, so equal texts always embed identically and similar-but-unequal
    /// texts land elsewhere in the space.
    pub(super) fn embed(text: &str, dimensions: usize) -> Embedding {
        let vec = (0..dimensions)
            .map(|i| {
                let mut hasher = Sha256::new();
                hasher.update(text.as_bytes());
                hasher.update((i as u64).to_le_bytes());
                let digest = hasher.finalize();
                let raw = u64::from_le_bytes(
                    digest[..8].try_into().expect("digest is at least 8 bytes"),
                );
                (raw as f64 / u64::MAX as f64) * 2.0 - 1.0
            })
            .collect();

        Embedding {
            document: text.to_string(),
            vec,
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use rig::embeddings::EmbeddingModel as RigEmbeddingModel;

    use super::super::provider::EmbeddingProvider;

    #[tokio::test]
    async fn mock_embeddings_are_deterministic() {
        let provider = EmbeddingProvider::mock(8);
        let a = provider.embed_text("hello").await.unwrap();
        let b = provider.embed_text("hello").await.unwrap();
        assert_eq!(a.vec, b.vec);
        assert_eq!(a.vec.len(), 8);
    }

    #[tokio::test]
    async fn mock_embeddings_differ_by_text() {
        let provider = EmbeddingProvider::mock(8);
        let a = provider.embed_text("hello").await.unwrap();
        let b = provider.embed_text("world").await.unwrap();
        assert_ne!(a.vec, b.vec);
    }

    #[test]
    fn mock_ndims() {
        let provider = EmbeddingProvider::mock(512);
        assert_eq!(provider.ndims(), 512);
    }
}
