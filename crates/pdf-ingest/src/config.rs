//! Configuration for the ingestion pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ingestion::CleaningStep;

/// Env var naming the target collection
pub const VECTOR_STORE_COLLECTION_NAME: &str = "VECTOR_STORE_COLLECTION_NAME";
/// Env var naming the directory that holds persisted collections
pub const VECTOR_STORE_PATH: &str = "VECTOR_STORE_PATH";
/// Env var naming the PDF to ingest
pub const INPUT_PATH: &str = "PDF_INGEST_INPUT";
/// Env var selecting the embedding backend (`openai` or `ollama`)
pub const EMBEDDING_BACKEND: &str = "EMBEDDING_BACKEND";
/// Env var overriding the embedding model
pub const EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
/// Env var overriding the embedding API base URL
pub const EMBEDDING_BASE_URL: &str = "EMBEDDING_BASE_URL";

/// Main ingestion configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// PDF file to ingest
    pub input: InputConfig,
    /// Vector store destination
    pub vector_store: VectorStoreConfig,
    /// Text cleaning passes
    pub cleaning: CleaningConfig,
    /// Text chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding API configuration
    pub embeddings: EmbeddingConfig,
}

/// Input document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./document.pdf"),
        }
    }
}

/// Where chunks are persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Collection receiving the chunks
    pub collection_name: String,
    /// Directory holding collection files
    pub path: PathBuf,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            collection_name: "documents".to_string(),
            path: PathBuf::from("./vector_store"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Passes in execution order
    pub steps: Vec<CleaningStep>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            steps: CleaningStep::default_order().to_vec(),
        }
    }
}

/// Chunking configuration, in characters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding API flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

impl EmbeddingBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::config(format!("Unknown embedding backend: {}", other))),
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "text-embedding-ada-002",
            Self::Ollama => "nomic-embed-text",
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Ollama => "http://localhost:11434",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which API to call
    pub backend: EmbeddingBackend,
    /// Embedding model name (backend default when unset)
    pub model: Option<String>,
    /// API base URL (backend default when unset)
    pub base_url: Option<String>,
    /// Name of the env var holding the API key
    pub api_key_env: String,
    /// Inputs per request (OpenAI only)
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model: None,
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            batch_size: 1000,
            timeout_secs: 120,
        }
    }
}

impl EmbeddingConfig {
    /// Effective model name
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    /// Effective base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
            .trim_end_matches('/')
    }

    /// Resolve the API key from the environment
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl IngestConfig {
    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse from a TOML string
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(format!("Invalid TOML: {}", e)))
    }

    /// Load from `path` if it exists, fall back to defaults otherwise, then apply
    /// process environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.is_file() => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = get(VECTOR_STORE_COLLECTION_NAME) {
            self.vector_store.collection_name = name;
        }
        if let Some(path) = get(VECTOR_STORE_PATH) {
            self.vector_store.path = PathBuf::from(path);
        }
        if let Some(path) = get(INPUT_PATH) {
            self.input.path = PathBuf::from(path);
        }
        if let Some(backend) = get(EMBEDDING_BACKEND) {
            self.embeddings.backend = EmbeddingBackend::parse(&backend)?;
        }
        if let Some(model) = get(EMBEDDING_MODEL) {
            self.embeddings.model = Some(model);
        }
        if let Some(url) = get(EMBEDDING_BASE_URL) {
            self.embeddings.base_url = Some(url);
        }

        Ok(())
    }

    /// Check invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.vector_store.collection_name.trim().is_empty() {
            return Err(Error::config("collection name must not be empty"));
        }
        if self
            .vector_store
            .collection_name
            .contains(|c: char| c == '/' || c == '\\')
        {
            return Err(Error::config(format!(
                "collection name must not contain path separators: {}",
                self.vector_store.collection_name
            )));
        }
        if self.chunking.chunk_size == 0 {
            return Err(Error::config("chunk_size must be greater than zero"));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::config("embedding batch_size must be greater than zero"));
        }
        Ok(())
    }
}
