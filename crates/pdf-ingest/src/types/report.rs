//! Summary of an ingestion run

use serde::Serialize;
use std::path::PathBuf;

/// What a successful run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Document title (may be empty)
    pub title: String,
    /// Pages in the file, with or without text
    pub total_pages: usize,
    /// Pages that carried extractable text
    pub pages: usize,
    /// Chunks embedded and stored
    pub chunks: usize,
    /// Embedding dimensions (0 when nothing was embedded)
    pub dimensions: usize,
    /// Target collection
    pub collection: String,
    /// Collection file written, if anything was persisted
    pub persisted_to: Option<PathBuf>,
}

impl IngestReport {
    /// True when the run stored nothing
    pub fn is_empty(&self) -> bool {
        self.chunks == 0
    }
}
