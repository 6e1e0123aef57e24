//! Ollama embedding provider

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::embedding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/embeddings", config.base_url()),
            model: config.model().to_string(),
        })
    }

    fn request(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .map_err(|e| Error::embedding(format!("Ollama request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::embedding(format!(
                "Ollama embedding failed: HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .map_err(|e| Error::embedding(format!("Malformed Ollama response: {}", e)))?;
        non_empty(parsed.embedding)
    }
}

fn non_empty(embedding: Vec<f32>) -> Result<Vec<f32>> {
    if embedding.is_empty() {
        Err(Error::embedding("Ollama returned an empty embedding"))
    } else {
        Ok(embedding)
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // No batch endpoint, one request per text
        texts.iter().map(|text| self.request(text)).collect()
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
