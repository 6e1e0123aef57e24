//! Error types for the ingestion pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ingestion errors. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Input path does not reference an existing file
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// PDF structure unreadable or text extraction failed
    #[error("Failed to parse PDF '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Embedding API call failed (auth, network, quota, bad response)
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store write or persist failed
    #[error("Vector store persistence failed: {0}")]
    Persistence(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error for the given file
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
