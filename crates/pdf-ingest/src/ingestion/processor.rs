//! Pipeline orchestration

use std::path::Path;

use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{DocumentChunk, EmbeddedChunk, IngestReport, PdfDocument};

use super::chunker::TextChunker;
use super::cleaner::TextCleaner;
use super::parser::PdfReader;

/// Runs one PDF through parse, clean, chunk, embed and store, strictly in that order
#[derive(Debug, Clone, Default)]
pub struct IngestPipeline {
    cleaner: TextCleaner,
    chunker: TextChunker,
}

impl IngestPipeline {
    pub fn new(cleaner: TextCleaner, chunker: TextChunker) -> Self {
        Self { cleaner, chunker }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            TextCleaner::new(config.cleaning.steps.clone()),
            TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap),
        )
    }

    /// Parse and clean `path` without embedding anything
    pub fn prepare(&self, path: &Path) -> Result<PdfDocument> {
        let mut document = PdfReader::parse(path)?;
        let pages = self.cleaner.clean(std::mem::take(&mut document.pages));
        Ok(document.with_pages(pages))
    }

    /// Chunk a cleaned document
    pub fn create_chunks(&self, document: &PdfDocument) -> Vec<DocumentChunk> {
        self.chunker.text_to_chunks(document)
    }

    /// Ingest the PDF at `path` into `store`.
    ///
    /// Nothing reaches the store unless every earlier stage succeeded, and the
    /// store is persisted only after all chunks were embedded.
    pub fn run(
        &self,
        path: &Path,
        embedder: &dyn EmbeddingProvider,
        store: &mut dyn VectorStoreProvider,
    ) -> Result<IngestReport> {
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!("[{}] Parsing PDF...", label);
        let document = self.prepare(path)?;
        let total_pages = PdfReader::page_count(path)?;
        tracing::info!(
            "[{}] {} of {} pages with text, title '{}'",
            label,
            document.pages.len(),
            total_pages,
            document.title
        );

        let chunks = self.create_chunks(&document);
        let mut report = IngestReport {
            title: document.title.clone(),
            total_pages,
            pages: document.pages.len(),
            collection: store.collection_name().to_string(),
            ..Default::default()
        };

        if chunks.is_empty() {
            tracing::warn!("[{}] No text to ingest, nothing stored", label);
            return Ok(report);
        }
        tracing::info!("[{}] Created {} chunks, generating embeddings...", label, chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts)?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        report.dimensions = embeddings.first().map(Vec::len).unwrap_or(0);

        let records: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
            .collect();
        report.chunks = records.len();

        tracing::info!(
            "[{}] Storing {} vectors in collection '{}'",
            label,
            report.chunks,
            report.collection
        );
        store.add(records)?;
        report.persisted_to = Some(store.persist()?);

        tracing::info!("[{}] Ingestion complete", label);
        Ok(report)
    }
}
