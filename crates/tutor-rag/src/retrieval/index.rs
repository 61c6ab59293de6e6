//! Semantic index: chunking, embedding and nearest-neighbour search
//!
//! Composes the text chunker, the embedding provider and the durable vector
//! store. One provider instance serves both ingestion and queries so every
//! vector in the store lives in the same embedding space.

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use tutor_index::{SearchHit, StoreOptions, VectorEntry, VectorStore};

use crate::config::{ChunkingConfig, IndexConfig};
use crate::embeddings::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::ingestion::TextChunker;
use crate::types::{ExtractedDocument, FileType};

/// Back-reference from an indexed chunk to its source document
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChunkRef {
    /// Path of the source document
    pub source_path: String,
    /// Ordinal of the chunk within its document
    pub chunk_index: u32,
    /// File type of the source document
    pub file_type: FileType,
}

/// A retrieved chunk with its relevance score
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chunk text
    pub content: String,
    /// Source back-reference
    pub source: ChunkRef,
    /// Cosine similarity in [-1, 1]; higher is more relevant. Results are
    /// returned best-first.
    pub score: f32,
}

/// Durable semantic index over all ingested document text
pub struct SemanticIndex {
    store: VectorStore,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SemanticIndex {
    /// Open the index at its configured location.
    ///
    /// An unreadable store is discarded and recreated empty, once. If the
    /// recreation also fails the service cannot run, and this returns
    /// [`Error::IndexUnavailable`].
    pub fn open(
        index_config: &IndexConfig,
        chunking: &ChunkingConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let options = StoreOptions {
            dimensions: embedder.dimensions(),
            storage_dir: index_config.storage_dir.clone(),
        };

        let store = match VectorStore::open(options.clone()) {
            Ok(store) => store,
            Err(first) => {
                tracing::warn!(
                    "Vector store at {} is unreadable ({}), recreating",
                    options.storage_dir.display(),
                    first
                );

                if let Err(e) = std::fs::remove_dir_all(&options.storage_dir) {
                    tracing::warn!("Could not clear index directory: {}", e);
                }

                VectorStore::open(options).map_err(|second| {
                    Error::IndexUnavailable(format!(
                        "open failed ({}) and recreation failed ({})",
                        first, second
                    ))
                })?
            }
        };

        tracing::info!(
            "Semantic index ready at {} ({} chunks, {} embedder)",
            index_config.storage_dir.display(),
            store.len(),
            embedder.name()
        );

        Ok(Self {
            store,
            chunker: TextChunker::from_config(chunking),
            embedder,
        })
    }

    /// Chunk, embed and index a document, flushing before returning.
    ///
    /// Indexed chunks are visible to `search` immediately and survive a
    /// process restart. A document with no content is a no-op counted as
    /// zero chunks, not an error.
    pub async fn add(&self, doc: &ExtractedDocument) -> Result<usize> {
        if doc.content.trim().is_empty() {
            tracing::warn!("Document '{}' has no content, nothing to index", doc.file_name);
            return Ok(0);
        }

        let pieces = self.chunker.split(&doc.content);
        let embeddings = self.embedder.embed_batch(&pieces).await?;

        let source_path = doc.file_path.to_string_lossy().to_string();
        let entries: Vec<VectorEntry> = pieces
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (content, vector))| VectorEntry {
                id: Uuid::new_v4().to_string(),
                vector,
                metadata: chunk_metadata(&content, &source_path, i as u32, &doc.file_type),
            })
            .collect();

        let count = entries.len();
        self.store.insert_batch(entries)?;
        self.store.flush()?;

        tracing::info!("Indexed {} chunks from '{}'", count, doc.file_name);
        Ok(count)
    }

    /// Return the `k` most relevant chunks for `query`, best first.
    ///
    /// The query is embedded with the same provider used at ingestion. An
    /// index that has never been written to yields an empty result.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if self.store.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        let hits = self.store.search(&query_vector, k)?;

        Ok(hits.into_iter().map(hit_to_result).collect())
    }

    /// Number of chunks currently indexed
    pub fn chunk_count(&self) -> usize {
        self.store.len()
    }
}

fn chunk_metadata(
    content: &str,
    source_path: &str,
    chunk_index: u32,
    file_type: &FileType,
) -> HashMap<String, serde_json::Value> {
    let mut meta = HashMap::new();
    meta.insert("content".to_string(), json!(content));
    meta.insert("source_path".to_string(), json!(source_path));
    meta.insert("chunk_index".to_string(), json!(chunk_index));
    meta.insert("file_type".to_string(), json!(file_type));
    meta
}

fn hit_to_result(hit: SearchHit) -> SearchResult {
    let content = hit
        .metadata
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let source_path = hit
        .metadata
        .get("source_path")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let chunk_index = hit
        .metadata
        .get("chunk_index")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let file_type = hit
        .metadata
        .get("file_type")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or(FileType::Unsupported("unknown".to_string()));

    SearchResult {
        content,
        source: ChunkRef {
            source_path,
            chunk_index,
            file_type,
        },
        score: hit.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashedEmbedder;
    use chrono::Utc;
    use std::path::Path;

    fn test_doc(content: &str) -> ExtractedDocument {
        ExtractedDocument {
            id: Uuid::new_v4(),
            content: content.to_string(),
            file_name: "notes.txt".to_string(),
            file_extension: "txt".to_string(),
            file_path: Path::new("/tmp/notes.txt").to_path_buf(),
            file_type: FileType::Txt,
            file_size: content.len() as u64,
            content_hash: "test".to_string(),
            ingested_at: Utc::now(),
            metadata: crate::types::DocumentMetadata {
                file_name: "notes.txt".to_string(),
                file_extension: "txt".to_string(),
                file_size: content.len() as u64,
                file_path: Path::new("/tmp/notes.txt").to_path_buf(),
            },
        }
    }

    fn open_index(dir: &Path) -> SemanticIndex {
        SemanticIndex::open(
            &IndexConfig {
                storage_dir: dir.to_path_buf(),
            },
            &ChunkingConfig::default(),
            Arc::new(HashedEmbedder::new(384)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn empty_document_is_a_counted_noop() {
        let dir = tempfile::tempdir().unwrap();
        let index = open_index(dir.path());
        let count = index.add(&test_doc("   \n ")).await.unwrap();
        assert_eq!(count, 0);
        assert_eq!(index.chunk_count(), 0);
    }

    #[tokio::test]
    async fn search_before_any_add_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = open_index(dir.path());
        let results = index.search("anything", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn added_chunks_are_immediately_searchable() {
        let dir = tempfile::tempdir().unwrap();
        let index = open_index(dir.path());

        let count = index
            .add(&test_doc("Photosynthesis converts light into energy."))
            .await
            .unwrap();
        assert_eq!(count, 1);

        let results = index
            .search("What does photosynthesis convert?", 3)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].content,
            "Photosynthesis converts light into energy."
        );
        assert_eq!(results[0].source.chunk_index, 0);
        assert_eq!(results[0].source.file_type, FileType::Txt);
    }

    #[tokio::test]
    async fn results_are_sorted_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let index = open_index(dir.path());

        index.add(&test_doc("Mitochondria produce cellular energy.")).await.unwrap();
        index.add(&test_doc("Photosynthesis converts light into energy.")).await.unwrap();
        index.add(&test_doc("The French revolution began in 1789.")).await.unwrap();

        let results = index.search("photosynthesis light", 2).await.unwrap();
        assert!(results.len() <= 2);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(
            results[0].content,
            "Photosynthesis converts light into energy."
        );
    }

    #[tokio::test]
    async fn index_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let index = open_index(dir.path());
            index
                .add(&test_doc("Photosynthesis converts light into energy."))
                .await
                .unwrap();
        }

        let reopened = open_index(dir.path());
        assert_eq!(reopened.chunk_count(), 1);
        let results = reopened.search("photosynthesis", 3).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_store_is_recreated_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(VectorStore::snapshot_path(dir.path()), "garbage{{").unwrap();

        let index = open_index(dir.path());
        assert_eq!(index.chunk_count(), 0);

        // And the recreated index is usable.
        let count = index.add(&test_doc("Recovered and working.")).await.unwrap();
        assert_eq!(count, 1);
    }
}
