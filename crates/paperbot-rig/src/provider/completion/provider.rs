//! Completion provider abstraction.

use std::sync::Arc;

use paperbot_core::IntoProvider;
use rig::completion::{AssistantContent, CompletionError, CompletionModel as RigCompletionModel};
use rig::one_or_many::OneOrMany;
use rig::prelude::CompletionClient;
use rig::providers::{gemini, openai};

use super::super::credentials::Credentials;
use super::model::CompletionModel;
use crate::Error;

/// Completion provider that wraps different rig completion model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<CompletionService>`.
#[derive(Clone)]
pub struct CompletionProvider(Arc<CompletionService>);

pub(crate) enum CompletionService {
    OpenAi {
        model: openai::CompletionModel,
        model_name: String,
    },
    Gemini {
        model: gemini::completion::CompletionModel,
        model_name: String,
    },
    /// Echoes the prompt back; used by pipeline tests to observe the
    /// assembled prompt.
    #[cfg(feature = "mock")]
    Mock,
}

#[async_trait::async_trait]
impl IntoProvider for CompletionProvider {
    type Credentials = Credentials;
    type Params = CompletionModel;

    async fn create(
        params: Self::Params,
        credentials: Self::Credentials,
    ) -> paperbot_core::Result<Self> {
        let inner = match (credentials, params) {
            (Credentials::OpenAi(c), CompletionModel::OpenAi(m)) => {
                let client = openai::Client::new(&c.api_key)
                    .map_err(|e| Error::provider("openai", e.to_string()))?
                    .completions_api();
                CompletionService::OpenAi {
                    model: client.completion_model(m.as_str()),
                    model_name: m.as_str().to_string(),
                }
            }
            (Credentials::Gemini(c), CompletionModel::Gemini(m)) => {
                let client = gemini::Client::new(&c.api_key)
                    .map_err(|e| Error::provider("gemini", e.to_string()))?;
                CompletionService::Gemini {
                    model: client.completion_model(m.as_str()),
                    model_name: m.as_str().to_string(),
                }
            }
            _ => return Err(Error::config("mismatched credentials and model provider").into()),
        };
        Ok(Self(Arc::new(inner)))
    }
}

impl CompletionProvider {
    /// Creates a mock provider that returns the prompt verbatim.
    #[cfg(feature = "mock")]
    pub fn mock() -> Self {
        Self(Arc::new(CompletionService::Mock))
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        match self.0.as_ref() {
            CompletionService::OpenAi { model_name, .. } => model_name,
            CompletionService::Gemini { model_name, .. } => model_name,
            #[cfg(feature = "mock")]
            CompletionService::Mock => "mock-completion",
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            CompletionService::OpenAi { .. } => "openai",
            CompletionService::Gemini { .. } => "gemini",
            #[cfg(feature = "mock")]
            CompletionService::Mock => "mock",
        }
    }

    /// Sends a completion request with the given prompt and returns the
    /// generated text.
    pub async fn complete(&self, prompt: &str) -> paperbot_core::Result<String> {
        let model_name = self.model_name().to_string();
        let map_err = |e: CompletionError| {
            paperbot_core::Error::from(Error::provider(&model_name, e.to_string()))
        };

        match self.0.as_ref() {
            CompletionService::OpenAi { model, .. } => model
                .completion_request(prompt)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
            CompletionService::Gemini { model, .. } => model
                .completion_request(prompt)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
            #[cfg(feature = "mock")]
            CompletionService::Mock => Ok(prompt.to_string()),
        }
    }
}

/// Extracts text content from assistant content choices.
fn extract_text_content(choice: &OneOrMany<AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            CompletionService::OpenAi { model_name, .. } => f
                .debug_struct("CompletionProvider::OpenAi")
                .field("model", model_name)
                .finish(),
            CompletionService::Gemini { model_name, .. } => f
                .debug_struct("CompletionProvider::Gemini")
                .field("model", model_name)
                .finish(),
            #[cfg(feature = "mock")]
            CompletionService::Mock => f.debug_struct("CompletionProvider::Mock").finish(),
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_completion_echoes_prompt() {
        let provider = CompletionProvider::mock();
        let answer = provider.complete("what is the answer?").await.unwrap();
        assert_eq!(answer, "what is the answer?");
    }
}
