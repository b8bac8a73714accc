//! AI provider abstractions for embedding and completion models.

mod completion;
mod credentials;
mod embedding;

pub use completion::{CompletionModel, CompletionProvider, GeminiCompletionModel, OpenAiCompletionModel};
pub use credentials::{ApiKeyCredentials, Credentials};
pub use embedding::{EmbeddingModel, EmbeddingProvider, GeminiEmbeddingModel, OpenAiEmbeddingModel};
