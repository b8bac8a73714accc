#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
pub mod provider;
pub mod splitter;

pub use error::{Error, Result};
pub use provider::{
    CompletionModel, CompletionProvider, Credentials, EmbeddingModel, EmbeddingProvider,
    GeminiCompletionModel, GeminiEmbeddingModel, OpenAiCompletionModel, OpenAiEmbeddingModel,
};
pub use splitter::{Chunker, DEFAULT_CHUNK_MAX_BYTES, OwnedSplitChunk, SplitChunk, SplitMetadata};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "paperbot_rig";
