//! Semantic retrieval over ingested documents

pub mod index;

pub use index::{ChunkRef, SearchResult, SemanticIndex};
