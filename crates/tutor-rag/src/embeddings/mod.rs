//! Text embedding providers
//!
//! Ingestion and query embedding MUST go through the same provider instance:
//! vectors from different embedding functions are not comparable, and mixing
//! them corrupts every relevance ranking in the index.

pub mod hashed;
pub mod provider;

pub use hashed::HashedEmbedder;
pub use provider::EmbeddingProvider;
