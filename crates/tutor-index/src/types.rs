//! Entry and query types for the vector store

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Options for opening a vector store
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Embedding dimensions every entry must match
    pub dimensions: usize,
    /// Directory the snapshot file lives in
    pub storage_dir: PathBuf,
}

/// A stored vector with its text payload carried as metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntry {
    /// Entry ID
    pub id: String,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Arbitrary metadata (chunk text, source path, ordinal, ...)
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A single search match
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Entry ID
    pub id: String,
    /// Cosine similarity in [-1, 1]; higher is more relevant
    pub score: f32,
    /// Metadata stored with the entry
    pub metadata: HashMap<String, serde_json::Value>,
}
