use thiserror::Error;

/// Dense vector representation of a text.
pub type Embedding = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Tokenization failed: {0}")]
    Tokenizer(String),

    #[error("Model inference failed: {0}")]
    Model(#[from] candle_core::Error),
}

/// Maps text to a fixed-length vector. Implementations must be deterministic
/// for fixed weights and must accept the empty string.
///
/// Built once at startup and shared as `Arc<dyn Embedder>`.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}
