//! Type-safe embedding model references.

use serde::{Deserialize, Serialize};

/// Reference to an embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// OpenAI embedding models.
    OpenAi(OpenAiEmbeddingModel),
    /// Google Gemini embedding models.
    Gemini(GeminiEmbeddingModel),
}

/// OpenAI embedding models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenAiEmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
}

impl OpenAiEmbeddingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbedding3Small => "text-embedding-3-small",
            Self::TextEmbedding3Large => "text-embedding-3-large",
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::TextEmbedding3Small => 1536,
            Self::TextEmbedding3Large => 3072,
        }
    }
}

/// Google Gemini embedding models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeminiEmbeddingModel {
    /// text-embedding-004 (768 dimensions)
    TextEmbedding004,
}

impl GeminiEmbeddingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbedding004 => "text-embedding-004",
        }
    }

    pub fn dimensions(&self) -> usize {
        768
    }
}

impl EmbeddingModel {
    /// Default model for new deployments: Gemini text-embedding-004.
    ///
    /// Its 768 dimensions match the vector index dimensionality used by
    /// the ingestion pipeline.
    pub fn default_gemini() -> Self {
        Self::Gemini(GeminiEmbeddingModel::TextEmbedding004)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi(m) => m.as_str(),
            Self::Gemini(m) => m.as_str(),
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::OpenAi(m) => m.dimensions(),
            Self::Gemini(m) => m.dimensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_dimensions_match_index() {
        assert_eq!(EmbeddingModel::default_gemini().dimensions(), 768);
    }

    #[test]
    fn model_names() {
        assert_eq!(
            EmbeddingModel::default_gemini().as_str(),
            "text-embedding-004"
        );
        assert_eq!(
            OpenAiEmbeddingModel::TextEmbedding3Small.as_str(),
            "text-embedding-3-small"
        );
    }
}
