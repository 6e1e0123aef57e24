//! Document, page and chunk types with source tracking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One extracted PDF page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    /// Zero-based index of the page in the original file
    pub num: u32,
    /// Page text. Non-empty when extracted, may become empty after cleaning.
    pub text: String,
}

impl PageData {
    /// Create a new page
    pub fn new(num: u32, text: impl Into<String>) -> Self {
        Self {
            num,
            text: text.into(),
        }
    }
}

/// A parsed PDF: document-info metadata plus the pages that had text.
///
/// `pages` is ordered by ascending `num` with no duplicates. Pages without
/// extractable text are absent, so numbering may have gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfDocument {
    pub title: String,
    pub author: String,
    pub creation_date: String,
    pub pages: Vec<PageData>,
}

impl PdfDocument {
    /// Replace the page list wholesale, e.g. with its cleaned version
    pub fn with_pages(self, pages: Vec<PageData>) -> Self {
        Self { pages, ..self }
    }

    /// Total characters across all pages
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Metadata attached to every chunk, copied by value when the chunk is made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Document title
    pub title: String,
    /// Document author
    #[serde(default)]
    pub author: String,
    /// Raw `CreationDate` string from the document info
    #[serde(default)]
    pub creation_date: String,
    /// Zero-based page the chunk came from
    pub page_number: u32,
    /// Index of the chunk within its page
    pub chunk_index: u32,
    /// Traceability key, `p{page}-{index}`
    pub source: String,
}

impl ChunkMetadata {
    /// Build metadata for chunk `chunk_index` of page `page_number`
    pub fn new(document: &PdfDocument, page_number: u32, chunk_index: u32) -> Self {
        Self {
            title: document.title.clone(),
            author: document.author.clone(),
            creation_date: document.creation_date.clone(),
            page_number,
            chunk_index,
            source: format!("p{}-{}", page_number, chunk_index),
        }
    }
}

/// A bounded slice of page text ready for embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Chunk text, trimmed
    pub content: String,
    /// Byte span of the untrimmed window inside the cleaned page text
    pub start: usize,
    pub end: usize,
    /// Source information
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Create a new chunk
    pub fn new(content: String, start: usize, end: usize, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            start,
            end,
            metadata,
        }
    }

    /// Convert to the flat metadata map stored next to the vector
    pub fn to_vector_metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut meta = HashMap::new();
        meta.insert("title".to_string(), serde_json::json!(self.metadata.title));
        meta.insert("page_number".to_string(), serde_json::json!(self.metadata.page_number));
        meta.insert("chunk".to_string(), serde_json::json!(self.metadata.chunk_index));
        meta.insert("source".to_string(), serde_json::json!(self.metadata.source));

        if !self.metadata.author.is_empty() {
            meta.insert("author".to_string(), serde_json::json!(self.metadata.author));
        }
        if !self.metadata.creation_date.is_empty() {
            meta.insert(
                "creation_date".to_string(),
                serde_json::json!(self.metadata.creation_date),
            );
        }

        meta
    }
}

/// A chunk paired with its embedding, the unit handed to the vector store
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}
