//! Provider abstractions for embeddings and vector storage
//!
//! The pipeline only talks to these traits, so tests can swap in stubs and the
//! binary can pick a backend from configuration.

pub mod embedding;
pub mod local;
pub mod ollama;
pub mod openai;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use local::LocalVectorStore;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use vector_store::VectorStoreProvider;

use crate::config::{EmbeddingBackend, EmbeddingConfig, VectorStoreConfig};
use crate::error::Result;

/// Build the embedding provider selected by `config`
pub fn embedder_from_config(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    let embedder: Box<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::OpenAi => Box::new(OpenAiEmbedder::new(config)?),
        EmbeddingBackend::Ollama => Box::new(OllamaEmbedder::new(config)?),
    };
    tracing::info!("Embedding provider: {} ({})", embedder.name(), embedder.model());
    Ok(embedder)
}

/// Build the local vector store for `config`
pub fn vector_store_from_config(config: &VectorStoreConfig) -> LocalVectorStore {
    LocalVectorStore::new(&config.path, &config.collection_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_follows_backend() {
        let openai = embedder_from_config(&EmbeddingConfig::default()).unwrap();
        assert_eq!(openai.name(), "openai");
        assert_eq!(openai.model(), "text-embedding-ada-002");

        let ollama = embedder_from_config(&EmbeddingConfig {
            backend: EmbeddingBackend::Ollama,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ollama.name(), "ollama");
        assert_eq!(ollama.model(), "nomic-embed-text");
    }

    #[test]
    fn test_vector_store_from_config() {
        let store = vector_store_from_config(&VectorStoreConfig {
            collection_name: "terms".to_string(),
            path: "/srv/vectors".into(),
        });
        assert_eq!(store.collection_name(), "terms");
        assert_eq!(store.path(), std::path::PathBuf::from("/srv/vectors/terms.json"));
        assert!(store.is_empty());
    }
}
