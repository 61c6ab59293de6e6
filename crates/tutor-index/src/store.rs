//! Append-only vector store with snapshot persistence

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::distance::cosine_similarity;
use crate::error::{Result, StoreError};
use crate::types::{SearchHit, StoreOptions, VectorEntry};

const SNAPSHOT_FILE: &str = "index.json";
const SNAPSHOT_TMP: &str = "index.json.tmp";

/// On-disk snapshot layout
#[derive(Serialize, Deserialize)]
struct Snapshot {
    dimensions: usize,
    entries: Vec<VectorEntry>,
}

/// Flat vector store.
///
/// Entries are appended, never updated in place. `flush` writes the full
/// snapshot to a temp file and renames it over the live one, so a reopened
/// store sees either the previous or the new snapshot, never a torn write.
#[derive(Debug)]
pub struct VectorStore {
    options: StoreOptions,
    entries: RwLock<Vec<VectorEntry>>,
}

impl VectorStore {
    /// Open a store, loading an existing snapshot if one is present.
    ///
    /// An unreadable snapshot or one written with different dimensions is an
    /// error; deciding whether to discard and recreate is the caller's call.
    pub fn open(options: StoreOptions) -> Result<Self> {
        fs::create_dir_all(&options.storage_dir)?;

        let path = options.storage_dir.join(SNAPSHOT_FILE);
        let entries = if path.exists() {
            Self::load_snapshot(&path, options.dimensions)?
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Vector store opened at {} ({} entries)",
            options.storage_dir.display(),
            entries.len()
        );

        Ok(Self {
            options,
            entries: RwLock::new(entries),
        })
    }

    fn load_snapshot(path: &Path, dimensions: usize) -> Result<Vec<VectorEntry>> {
        let data = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&data)
            .map_err(|e| StoreError::snapshot(path, e.to_string()))?;

        if snapshot.dimensions != dimensions {
            return Err(StoreError::snapshot(
                path,
                format!(
                    "snapshot has {} dimensions, store expects {}",
                    snapshot.dimensions, dimensions
                ),
            ));
        }

        for entry in &snapshot.entries {
            if entry.vector.len() != dimensions {
                return Err(StoreError::snapshot(
                    path,
                    format!("entry '{}' has a malformed vector", entry.id),
                ));
            }
        }

        Ok(snapshot.entries)
    }

    /// Append a single entry
    pub fn insert(&self, entry: VectorEntry) -> Result<()> {
        self.check_dimensions(entry.vector.len())?;
        self.entries.write().push(entry);
        Ok(())
    }

    /// Append a batch of entries
    pub fn insert_batch(&self, batch: Vec<VectorEntry>) -> Result<()> {
        for entry in &batch {
            self.check_dimensions(entry.vector.len())?;
        }
        self.entries.write().extend(batch);
        Ok(())
    }

    /// Persist the current entries to disk.
    ///
    /// Returns only after the snapshot has been written and renamed into
    /// place, so entries flushed here are visible to a store reopened at the
    /// same location.
    pub fn flush(&self) -> Result<()> {
        let snapshot = {
            let entries = self.entries.read();
            Snapshot {
                dimensions: self.options.dimensions,
                entries: entries.clone(),
            }
        };

        let tmp_path = self.options.storage_dir.join(SNAPSHOT_TMP);
        let live_path = self.options.storage_dir.join(SNAPSHOT_FILE);

        let data = serde_json::to_string(&snapshot)
            .map_err(|e| StoreError::snapshot(&live_path, e.to_string()))?;
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &live_path)?;

        tracing::debug!("Flushed {} entries to {}", snapshot.entries.len(), live_path.display());
        Ok(())
    }

    /// Return the `k` nearest entries to `vector`, best first.
    ///
    /// Scores are cosine similarities (higher = more relevant). An empty
    /// store yields an empty result.
    pub fn search(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        self.check_dimensions(vector.len())?;

        let entries = self.entries.read();
        let mut hits: Vec<SearchHit> = entries
            .iter()
            .map(|entry| SearchHit {
                id: entry.id.clone(),
                score: cosine_similarity(vector, &entry.vector),
                metadata: entry.metadata.clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);

        Ok(hits)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Path of the snapshot file inside a storage directory
    pub fn snapshot_path(storage_dir: &Path) -> PathBuf {
        storage_dir.join(SNAPSHOT_FILE)
    }

    fn check_dimensions(&self, actual: usize) -> Result<()> {
        if actual != self.options.dimensions {
            return Err(StoreError::DimensionMismatch {
                expected: self.options.dimensions,
                actual,
            });
        }
        Ok(())
    }
}
