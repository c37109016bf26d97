use std::sync::Arc;

use crate::matching::embedder::{Embedder, Embedding, EmbeddingError};

/// Cosine similarity in [-1, 1]. A zero-norm input yields 0.0 instead of NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "embedding dimensions differ");

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Scores text pairs through a shared embedder.
#[derive(Clone)]
pub struct SimilarityScorer {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.embedder.embed(text)
    }

    /// Cosine similarity between the embeddings of `a` and `b`.
    #[allow(dead_code)]
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64, EmbeddingError> {
        let a = self.embedder.embed(a)?;
        let b = self.embedder.embed(b)?;
        Ok(cosine_similarity(&a, &b))
    }

    /// Same as `similarity`, reusing an already computed embedding for the
    /// reference side.
    pub fn similarity_to(&self, reference: &[f32], text: &str) -> Result<f64, EmbeddingError> {
        let embedding = self.embedder.embed(text)?;
        Ok(cosine_similarity(&embedding, reference))
    }
}
