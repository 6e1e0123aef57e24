//! OpenAI-compatible embedding provider

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Embeddings from `POST {base_url}/embeddings`
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    /// Create a new embedder. The API key is resolved now but only required
    /// once a request is made.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::embedding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", config.base_url()),
            model: config.model().to_string(),
            api_key_env: config.api_key_env.clone(),
            api_key: config.api_key(),
            batch_size: config.batch_size.max(1),
        })
    }

    fn request_batch(&self, api_key: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .map_err(|e| Error::embedding(format!("Malformed embedding response: {}", e)))?;

        order_by_index(parsed.data, texts.len())
    }
}

/// Put embeddings back in input order and check there is exactly one per input
fn order_by_index(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(Error::embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(Error::embedding("Embedding response indices are not contiguous"));
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

impl EmbeddingProvider for OpenAiEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::embedding(format!("API key not set (expected in ${})", self.api_key_env))
        })?;

        let mut embeddings = Vec::with_capacity(texts.len());
        for (i, batch) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!("Embedding batch {} ({} texts)", i + 1, batch.len());
            embeddings.extend(self.request_batch(api_key, batch)?);
        }
        Ok(embeddings)
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
