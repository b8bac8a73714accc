//! Type-safe completion model references.

use serde::{Deserialize, Serialize};

/// Reference to a completion model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum CompletionModel {
    /// OpenAI completion models.
    OpenAi(OpenAiCompletionModel),
    /// Google Gemini completion models.
    Gemini(GeminiCompletionModel),
}

/// OpenAI completion models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenAiCompletionModel {
    /// gpt-4o
    Gpt4o,
    /// gpt-4o-mini
    Gpt4oMini,
}

impl OpenAiCompletionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

/// Google Gemini completion models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeminiCompletionModel {
    /// gemini-1.5-flash
    Gemini15Flash,
    /// gemini-1.5-pro
    Gemini15Pro,
}

impl GeminiCompletionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini15Flash => "gemini-1.5-flash",
            Self::Gemini15Pro => "gemini-1.5-pro",
        }
    }
}

impl CompletionModel {
    /// Default model for new deployments.
    pub fn default_gemini() -> Self {
        Self::Gemini(GeminiCompletionModel::Gemini15Flash)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi(m) => m.as_str(),
            Self::Gemini(m) => m.as_str(),
        }
    }
}
