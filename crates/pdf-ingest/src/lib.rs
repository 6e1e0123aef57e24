//! pdf-ingest: one-shot PDF ingestion into a local vector collection
//!
//! A single PDF is read page by page, its text is cleaned and split into
//! overlapping chunks, each chunk is embedded through a remote embedding API,
//! and the result is persisted as a collection on disk for later retrieval.
//!
//! The whole run is sequential: parse, clean, chunk, embed, store. Any failure
//! aborts the run before anything is written.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod types;

pub use config::IngestConfig;
pub use error::{Error, Result};
pub use ingestion::{IngestPipeline, PdfReader, TextChunker, TextCleaner};
pub use types::{
    document::{ChunkMetadata, DocumentChunk, EmbeddedChunk, PageData, PdfDocument},
    report::IngestReport,
};
