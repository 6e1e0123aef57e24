//! Vector store provider trait for persisting embedded chunks

use std::path::PathBuf;

use crate::error::Result;
use crate::types::EmbeddedChunk;

/// Trait for vector storage
///
/// Records are staged by `add` and only reach disk on `persist`, so a run
/// that fails before persisting leaves the stored collection untouched.
pub trait VectorStoreProvider {
    /// Stage embedded chunks for the collection
    fn add(&mut self, records: Vec<EmbeddedChunk>) -> Result<()>;

    /// Durably write staged records, returning where they were written
    fn persist(&mut self) -> Result<PathBuf>;

    /// Number of staged, not yet persisted records
    fn len(&self) -> usize;

    /// Check if nothing is staged
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Target collection name
    fn collection_name(&self) -> &str;
}
