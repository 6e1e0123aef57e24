//! Embedding provider trait for generating text embeddings

use crate::error::Result;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OpenAiEmbedder`: OpenAI-compatible `/embeddings` API
/// - `OllamaEmbedder`: Local Ollama server (nomic-embed-text)
pub trait EmbeddingProvider {
    /// Generate one embedding per input text, in input order
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model used for embeddings
    fn model(&self) -> &str;
}
