//! Core types for the ingestion pipeline

pub mod document;
pub mod report;

pub use document::{ChunkMetadata, DocumentChunk, EmbeddedChunk, PageData, PdfDocument};
pub use report::IngestReport;
