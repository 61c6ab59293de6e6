//! Deterministic feature-hashing embedder
//!
//! Maps each token to a signed slot of a fixed-dimension vector via XxHash64
//! and L2-normalises the result. Fully offline and stable across runs and
//! machines, so vectors written at ingestion time stay comparable with query
//! vectors after any number of restarts.

use async_trait::async_trait;
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::error::Result;

use super::provider::EmbeddingProvider;

/// Feature-hashing embedder
pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    /// Create an embedder producing vectors of `dimensions` length
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];

        for token in tokenize(text) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let h = hasher.finish();

            let idx = (h as usize) % self.dimensions;
            // High bit picks the sign, which keeps colliding tokens from
            // always reinforcing each other.
            let sign = if h & (1u64 << 63) == 0 { 1.0 } else { -1.0 };
            v[idx] += sign;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }

        v
    }
}

/// Lower-cased alphanumeric tokens
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[async_trait]
impl EmbeddingProvider for HashedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_index::cosine_similarity;

    #[test]
    fn embedding_is_deterministic() {
        let embedder = HashedEmbedder::new(128);
        let a = embedder.embed_text("photosynthesis converts light");
        let b = embedder.embed_text("photosynthesis converts light");
        assert_eq!(a, b);
    }

    #[test]
    fn embedding_is_normalised() {
        let embedder = HashedEmbedder::new(128);
        let v = embedder.embed_text("some study material about cells");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_embeds_to_zero_vector() {
        let embedder = HashedEmbedder::new(64);
        let v = embedder.embed_text("   \n\t ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn shared_vocabulary_scores_higher_than_disjoint() {
        let embedder = HashedEmbedder::new(384);
        let doc = embedder.embed_text("Photosynthesis converts light into energy.");
        let near = embedder.embed_text("What does photosynthesis convert?");
        let far = embedder.embed_text("Quarterly revenue grew by twelve percent.");

        assert!(cosine_similarity(&doc, &near) > cosine_similarity(&doc, &far));
    }

    #[test]
    fn respects_configured_dimensions() {
        let embedder = HashedEmbedder::new(17);
        assert_eq!(embedder.embed_text("abc").len(), 17);
        assert_eq!(embedder.dimensions(), 17);
    }
}
