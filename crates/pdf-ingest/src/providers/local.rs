//! Local vector store persisting each collection as a JSON file
//!
//! Layout: `<dir>/<collection>.json`. Records are staged in memory by `add`;
//! `persist` merges them into whatever the file already holds and replaces the
//! file atomically through a temporary file in the same directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::EmbeddedChunk;

use super::vector_store::VectorStoreProvider;

/// One stored vector with its text and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl From<EmbeddedChunk> for StoredRecord {
    fn from(embedded: EmbeddedChunk) -> Self {
        let metadata = embedded.chunk.to_vector_metadata();
        Self {
            id: embedded.chunk.id,
            content: embedded.chunk.content,
            embedding: embedded.embedding,
            metadata,
        }
    }
}

/// On-disk collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub dimensions: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub records: Vec<StoredRecord>,
}

impl Collection {
    fn new(name: &str, dimensions: usize) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            dimensions,
            created_at: now,
            updated_at: now,
            records: Vec::new(),
        }
    }
}

/// File path of collection `name` under `dir`
pub fn collection_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}

/// Read a persisted collection, `None` when it was never written
pub fn load_collection(dir: &Path, name: &str) -> Result<Option<Collection>> {
    let path = collection_path(dir, name);
    if !path.exists() {
        return Ok(None);
    }

    let file = std::fs::File::open(&path).map_err(|e| {
        Error::persistence(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let collection = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        Error::persistence(format!("Corrupt collection {}: {}", path.display(), e))
    })?;
    Ok(Some(collection))
}

/// Filesystem-backed vector store for a single collection
pub struct LocalVectorStore {
    dir: PathBuf,
    name: String,
    pending: Vec<StoredRecord>,
}

impl LocalVectorStore {
    /// Create a store handle. Nothing touches the disk until `persist`.
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            pending: Vec::new(),
        }
    }

    /// Where this collection is persisted
    pub fn path(&self) -> PathBuf {
        collection_path(&self.dir, &self.name)
    }

    fn pending_dimensions(&self) -> Option<usize> {
        self.pending.first().map(|r| r.embedding.len())
    }

    fn write_atomic(&self, collection: &Collection) -> Result<PathBuf> {
        let path = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::persistence(format!("Failed to create temp file: {}", e)))?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, collection)?;
            writer.flush()?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::persistence(format!("Failed to sync collection: {}", e)))?;

        tmp.persist(&path).map_err(|e| {
            Error::persistence(format!("Failed to write {}: {}", path.display(), e.error))
        })?;
        Ok(path)
    }
}

impl VectorStoreProvider for LocalVectorStore {
    fn add(&mut self, records: Vec<EmbeddedChunk>) -> Result<()> {
        let mut expected = self.pending_dimensions();

        for record in &records {
            let dims = record.embedding.len();
            if dims == 0 {
                return Err(Error::persistence(format!(
                    "Chunk {} has an empty embedding",
                    record.chunk.id
                )));
            }
            match expected {
                Some(expected) if expected != dims => {
                    return Err(Error::persistence(format!(
                        "Embedding dimension mismatch: expected {}, got {}",
                        expected, dims
                    )));
                }
                _ => expected = Some(dims),
            }
        }

        self.pending.extend(records.into_iter().map(StoredRecord::from));
        Ok(())
    }

    fn persist(&mut self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::persistence(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let dimensions = self.pending_dimensions().unwrap_or(0);
        let mut collection = match load_collection(&self.dir, &self.name)? {
            Some(existing) => existing,
            None => Collection::new(&self.name, dimensions),
        };

        if collection.dimensions == 0 {
            collection.dimensions = dimensions;
        } else if dimensions != 0 && collection.dimensions != dimensions {
            return Err(Error::persistence(format!(
                "Collection '{}' stores {}-dimensional vectors, got {}",
                self.name, collection.dimensions, dimensions
            )));
        }

        collection.records.extend(self.pending.iter().cloned());
        collection.updated_at = Utc::now();

        let path = self.write_atomic(&collection)?;
        tracing::debug!(
            "Persisted {} records ({} total) to {}",
            self.pending.len(),
            collection.records.len(),
            path.display()
        );

        self.pending.clear();
        Ok(path)
    }

    fn len(&self) -> usize {
        self.pending.len()
    }

    fn collection_name(&self) -> &str {
        &self.name
    }
}
